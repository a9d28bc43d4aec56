//! 元数据模块
//!
//! 提供OPF元数据块的结构定义与序列化。

use crate::render::escape_text;

/// 唯一标识符元素的ID，`package` 的 `unique-identifier` 属性引用它
pub const IDENTIFIER_ID: &str = "book-id";

/// OPF文件中的元数据信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// 书名
    pub title: String,
    /// 语言代码
    pub language: String,
    /// 作者
    pub creator: String,
    /// 唯一标识符
    pub identifier: String,
    /// 封面图片的清单ID（`<meta name="cover" content="..."/>`）
    pub cover: Option<String>,
}

impl Metadata {
    pub(crate) fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
        );
        xml.push_str(&format!("    <dc:title>{}</dc:title>\n", escape_text(&self.title)));
        xml.push_str(&format!("    <dc:language>{}</dc:language>\n", escape_text(&self.language)));
        xml.push_str(&format!(
            "    <dc:creator opf:role=\"aut\">{}</dc:creator>\n",
            escape_text(&self.creator)
        ));
        xml.push_str(&format!(
            "    <dc:identifier id=\"{}\" opf:scheme=\"UUID\">{}</dc:identifier>\n",
            IDENTIFIER_ID,
            escape_text(&self.identifier)
        ));
        if let Some(cover) = &self.cover {
            xml.push_str(&format!(
                "    <meta name=\"cover\" content=\"{}\"/>\n",
                escape_text(cover)
            ));
        }
        xml.push_str("  </metadata>\n");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(cover: Option<&str>) -> Metadata {
        Metadata {
            title: "天地 & 人".to_string(),
            language: "zh".to_string(),
            creator: "张三".to_string(),
            identifier: "urn:uuid:1234".to_string(),
            cover: cover.map(str::to_string),
        }
    }

    #[test]
    fn test_metadata_xml() {
        let xml = metadata(None).to_xml();
        assert!(xml.contains("<dc:title>天地 &amp; 人</dc:title>"));
        assert!(xml.contains("<dc:language>zh</dc:language>"));
        assert!(xml.contains(">张三</dc:creator>"));
        assert!(xml.contains(r#"<dc:identifier id="book-id" opf:scheme="UUID">urn:uuid:1234</dc:identifier>"#));
        assert!(!xml.contains("name=\"cover\""));
    }

    #[test]
    fn test_metadata_cover_reference() {
        let xml = metadata(Some("cover")).to_xml();
        assert!(xml.contains(r#"<meta name="cover" content="cover"/>"#));
    }
}
