//! NCX（Navigation Control file for XML）模块
//!
//! 此模块提供EPUB导航控制文件的生成与解析。NCX文件定义了书籍的目录结构。

pub mod navigation;
pub mod parser;

pub use navigation::{NavMap, NavPoint, Ncx};
