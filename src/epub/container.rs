use crate::epub::xml::attribute;
use crate::error::{ConvertError, Result};
use crate::render::escape_text;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// container.xml在包内的路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// OPF文件的媒体类型
pub const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// Container.xml的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 创建指向单个OPF文件的container
    pub fn for_package(opf_path: &str) -> Self {
        Self {
            rootfiles: vec![RootFile {
                full_path: opf_path.to_string(),
                media_type: OPF_MEDIA_TYPE.to_string(),
            }],
        }
    }

    /// 序列化为container.xml
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
"#,
        );
        for rootfile in &self.rootfiles {
            xml.push_str(&format!(
                "    <rootfile full-path=\"{}\" media-type=\"{}\"/>\n",
                escape_text(&rootfile.full_path),
                escape_text(&rootfile.media_type)
            ));
        }
        xml.push_str("  </rootfiles>\n</container>\n");
        xml
    }

    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();
        let mut in_rootfiles = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"rootfiles" => {
                        in_rootfiles = true;
                    }
                    b"rootfile" if in_rootfiles => {
                        let full_path = attribute(e, b"full-path")?.unwrap_or_default();
                        let media_type = attribute(e, b"media-type")?.unwrap_or_default();

                        if !full_path.is_empty() && !media_type.is_empty() {
                            rootfiles.push(RootFile {
                                full_path,
                                media_type,
                            });
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"rootfiles" {
                        in_rootfiles = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(ConvertError::ParseError(
                "container.xml",
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取主要的OPF文件路径
    ///
    /// # 返回值
    /// * `Option<String>` - OPF文件的完整路径
    pub fn get_opf_path(&self) -> Option<String> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == OPF_MEDIA_TYPE)
            .or_else(|| self.rootfiles.first())
            .map(|rootfile| rootfile.full_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_container_parses_back() {
        let container = Container::for_package("OEBPS/content.opf");
        let xml = container.to_xml();
        assert!(xml.contains(r#"full-path="OEBPS/content.opf""#));

        let parsed = Container::parse_xml(&xml).unwrap();
        assert_eq!(parsed, container);
        assert_eq!(parsed.get_opf_path(), Some("OEBPS/content.opf".to_string()));
    }

    #[test]
    fn test_get_opf_path_prefers_package_media_type() {
        let container_xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/toc.ncx" media-type="application/x-dtbncx+xml"/>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.rootfiles.len(), 2);
        assert_eq!(container.get_opf_path(), Some("OEBPS/content.opf".to_string()));
    }

    #[test]
    fn test_container_without_rootfile() {
        let result = Container::parse_xml("<container><rootfiles></rootfiles></container>");
        assert!(matches!(result, Err(ConvertError::ParseError("container.xml", _))));
    }
}
