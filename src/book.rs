//! 书籍数据结构
//!
//! 一次转换中构建的书籍、章节与封面信息。

use crate::text::HeadingKind;
use std::path::Path;

/// 一本待打包的书
#[derive(Debug, Clone)]
pub struct Book {
    /// 书名
    pub title: String,
    /// 作者
    pub author: String,
    /// 语言代码
    pub language: String,
    /// 唯一标识符（urn:uuid:...）
    pub identifier: String,
    /// 按阅读顺序排列的章节，打包前不能为空
    pub chapters: Vec<Chapter>,
    /// 封面（可选）
    pub cover: Option<Cover>,
}

impl Book {
    /// 为一次转换生成新的唯一标识符
    pub fn generate_identifier() -> String {
        format!("urn:uuid:{}", uuid::Uuid::new_v4())
    }
}

/// 章节信息
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// 章节标题（标题行去除首尾空白后的内容）
    pub title: String,
    /// 是否为卷标题
    pub is_volume: bool,
    /// 标题类型
    pub kind: HeadingKind,
    /// 标题中的序号
    pub number: Option<u32>,
    /// 正文段落
    pub paragraphs: Vec<String>,
    /// 在原文中的出现顺序（从1开始）
    pub sequence_index: usize,
}

/// 封面图片
#[derive(Debug, Clone)]
pub struct Cover {
    /// 图片的二进制数据
    pub bytes: Vec<u8>,
    /// 媒体类型，例如 image/jpeg
    pub media_type: String,
    /// 像素宽度
    pub width: u32,
    /// 像素高度
    pub height: u32,
}

impl Cover {
    /// 封面在包内使用的文件扩展名（媒体类型的子类型）
    pub fn extension(&self) -> &str {
        self.media_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("img")
    }

    /// 封面图片在包内的文件名
    pub fn file_name(&self) -> String {
        format!("cover.{}", self.extension())
    }
}

/// 从TXT文件名推导书名
///
/// 文件名中含有《书名》时取书名号内的文字，否则取去掉扩展名的文件名。
pub fn title_from_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);

    if let Some(start) = base.find('《') {
        let rest = &base[start + '《'.len_utf8()..];
        if let Some(end) = rest.find('》') {
            let title = rest[..end].trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }

    let stem = Path::new(base)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(base)
        .trim();

    if stem.is_empty() {
        "未命名".to_string()
    } else {
        stem.to_string()
    }
}

/// 输出的EPUB文件名
pub fn epub_file_name(title: &str) -> String {
    format!("{}.epub", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_plain_file_name() {
        assert_eq!(title_from_file_name("天地初开.txt"), "天地初开");
        assert_eq!(title_from_file_name("/home/user/books/天地初开.TXT"), "天地初开");
        assert_eq!(title_from_file_name("no_extension"), "no_extension");
    }

    #[test]
    fn test_title_from_bracketed_file_name() {
        assert_eq!(title_from_file_name("《斗破苍穹》作者：天蚕土豆.txt"), "斗破苍穹");
        assert_eq!(title_from_file_name("《》.txt"), "《》");
    }

    #[test]
    fn test_epub_file_name() {
        assert_eq!(epub_file_name("天地初开"), "天地初开.epub");
    }

    #[test]
    fn test_cover_extension() {
        let cover = Cover {
            bytes: vec![],
            media_type: "image/jpeg".to_string(),
            width: 1,
            height: 1,
        };
        assert_eq!(cover.extension(), "jpeg");
        assert_eq!(cover.file_name(), "cover.jpeg");
    }

    #[test]
    fn test_identifiers_are_unique() {
        let a = Book::generate_identifier();
        let b = Book::generate_identifier();
        assert!(a.starts_with("urn:uuid:"));
        assert_ne!(a, b);
    }
}
