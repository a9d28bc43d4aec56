pub mod book;
pub mod config;
pub mod convert;
pub mod cover;
pub mod epub;
pub mod error;
pub mod render;
pub mod text;

// === 核心API重新导出 ===

/// 转换入口
pub use convert::{convert, Conversion, ConversionRequest};

/// 错误处理
pub use error::{ConvertError, Result};

/// 配置
pub use config::ConvertConfig;

// === 数据结构 ===

/// 书籍、章节与封面
pub use book::{Book, Chapter, Cover};

/// 封面输入
pub use cover::CoverInput;

/// 标题类型与切分结果
pub use text::{DecodedText, HeadingKind, Segmentation};

// === 底层组件（高级用法） ===

/// EPUB读取器（用于检查生成的文件）
pub use epub::Epub;

/// 打包组件
pub use epub::{ChapterDocument, PackageAssembler, RenderedBook};

// === 库信息 ===

/// TxtForge库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// TxtForge库的描述
pub const DESCRIPTION: &str = "一个将TXT小说转换为EPUB电子书的Rust库";

// === 便捷函数 ===

/// 使用默认配置转换TXT文件
///
/// 这是 `convert` 的便捷包装函数，从磁盘读取TXT文件。
///
/// # 参数
/// * `path` - TXT文件路径
///
/// # 返回值
/// * `Result<Conversion>` - 转换结果
///
/// # 示例
///
/// ```no_run
/// let conversion = txtforge::convert_file("天地初开.txt")?;
/// std::fs::write(&conversion.file_name, &conversion.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convert_file<P: AsRef<std::path::Path>>(path: P) -> Result<Conversion> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    convert(&ConversionRequest::new(bytes, file_name), &ConvertConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_description() {
        assert!(!DESCRIPTION.is_empty());
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("测试.txt");
        std::fs::write(&path, "楔子\n开端\n第一章 起\n正文").unwrap();

        let conversion = convert_file(&path).unwrap();
        assert_eq!(conversion.file_name, "测试.epub");
        assert_eq!(conversion.chapter_count, 2);
    }

    #[test]
    fn test_convert_missing_file() {
        assert!(matches!(
            convert_file("/nonexistent/missing.txt"),
            Err(ConvertError::Io(_))
        ));
    }
}
