//! 纯文本处理模块
//!
//! 包括编码检测、章节序号解析与章节切分。

pub mod encoding;
pub mod numeral;
pub mod segmenter;

pub use encoding::{decode, DecodedText};
pub use numeral::parse_numeral;
pub use segmenter::{segment, HeadingKind, Segmentation};
