//! OPF（Open Packaging Format）模块
//!
//! 此模块提供EPUB包文件的生成与解析，包括元数据、清单、脊柱等信息。

mod manifest;
mod metadata;
mod package;
mod spine;

pub use manifest::{Manifest, ManifestItem, CSS_MEDIA_TYPE, NCX_MEDIA_TYPE, XHTML_MEDIA_TYPE};
pub use metadata::{Metadata, IDENTIFIER_ID};
pub use package::{GuideReference, Opf};
pub use spine::SpineItem;
