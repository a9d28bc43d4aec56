//! NCX解析器模块
//!
//! 提供NCX（Navigation Control file for XML）文件的XML解析功能。
//! 嵌套的导航点会按文档顺序展开为一层。

use crate::epub::ncx::{NavMap, NavPoint, Ncx};
use crate::epub::xml::{attribute, local_name};
use crate::error::{ConvertError, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

impl Ncx {
    /// 解析NCX文件内容
    ///
    /// # 参数
    /// * `xml_content` - NCX文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Ncx>` - 解析后的NCX信息
    pub fn parse_xml(xml_content: &str) -> Result<Ncx> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut found_root = false;
        let mut uid = String::new();
        let mut doc_title = String::new();
        let mut doc_author = None;
        let mut nav_map = NavMap::new();

        let mut buf = Vec::new();
        let mut current_section = String::new();
        let mut text_content = String::new();

        // 尚未闭合的导航点，嵌套时入栈
        let mut open_points: Vec<NavPoint> = Vec::new();
        let mut in_nav_label = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let name = local_name(e);
                    match name.as_str() {
                        "ncx" => found_root = true,
                        "head" | "docTitle" | "docAuthor" | "navMap" => {
                            current_section = name;
                            text_content.clear();
                        }
                        "meta" if current_section == "head" => {
                            if attribute(e, b"name")?.as_deref() == Some("dtb:uid") {
                                uid = attribute(e, b"content")?.unwrap_or_default();
                            }
                        }
                        "navPoint" if current_section == "navMap" => {
                            let play_order = attribute(e, b"playOrder")?
                                .map(|value| {
                                    value.trim().parse::<u32>().map_err(|_| {
                                        ConvertError::ParseError(
                                            "NCX",
                                            format!("无效的playOrder: {}", value),
                                        )
                                    })
                                })
                                .transpose()?
                                .unwrap_or(0);
                            open_points.push(NavPoint {
                                id: attribute(e, b"id")?.unwrap_or_default(),
                                play_order,
                                label: String::new(),
                                src: String::new(),
                            });
                        }
                        "navLabel" if current_section == "navMap" => {
                            in_nav_label = true;
                            text_content.clear();
                        }
                        "content" if current_section == "navMap" => {
                            if let Some(point) = open_points.last_mut() {
                                point.src = attribute(e, b"src")?.unwrap_or_default();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(e) => {
                    text_content.push_str(&e.unescape()?);
                }
                Event::End(ref e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    match name.as_str() {
                        "docTitle" => {
                            doc_title = text_content.trim().to_string();
                            current_section.clear();
                        }
                        "docAuthor" => {
                            doc_author = Some(text_content.trim().to_string());
                            current_section.clear();
                        }
                        "head" | "navMap" => current_section.clear(),
                        "navLabel" if in_nav_label => {
                            if let Some(point) = open_points.last_mut() {
                                point.label = text_content.trim().to_string();
                            }
                            in_nav_label = false;
                        }
                        "navPoint" => {
                            if let Some(point) = open_points.pop() {
                                nav_map.nav_points.push(point);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !found_root {
            return Err(ConvertError::ParseError("NCX", "缺少ncx根元素".to_string()));
        }

        nav_map.sort_by_play_order();

        Ok(Ncx {
            uid,
            doc_title,
            doc_author,
            nav_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ncx_parses_back() {
        let mut ncx = Ncx {
            uid: "urn:uuid:abc".to_string(),
            doc_title: "天地 & 初开".to_string(),
            doc_author: Some("张三".to_string()),
            nav_map: NavMap::new(),
        };
        ncx.nav_map.push("封面", "cover.xhtml");
        ncx.nav_map.push("第一卷 风起", "chapter1.xhtml");
        ncx.nav_map.push("第1章 开始", "chapter2.xhtml");

        let parsed = Ncx::parse_xml(&ncx.to_xml()).unwrap();
        assert_eq!(parsed, ncx);
    }

    #[test]
    fn test_parse_nested_nav_points() {
        let ncx_xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="book-id"/></head>
  <docTitle><text>测试</text></docTitle>
  <navMap>
    <navPoint id="v1" playOrder="1">
      <navLabel><text>第一卷</text></navLabel>
      <content src="v1.xhtml"/>
      <navPoint id="c1" playOrder="2">
        <navLabel><text>第一章</text></navLabel>
        <content src="c1.xhtml#top"/>
      </navPoint>
    </navPoint>
  </navMap>
</ncx>"#;

        let ncx = Ncx::parse_xml(ncx_xml).unwrap();
        assert_eq!(ncx.uid, "book-id");
        assert_eq!(ncx.doc_author, None);
        let labels: Vec<&str> = ncx.nav_map.nav_points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["第一卷", "第一章"]);
        assert_eq!(ncx.nav_map.nav_points[1].src, "c1.xhtml#top");
    }

    #[test]
    fn test_invalid_play_order() {
        let ncx_xml = r#"<ncx><navMap><navPoint id="a" playOrder="x"></navPoint></navMap></ncx>"#;
        assert!(matches!(Ncx::parse_xml(ncx_xml), Err(ConvertError::ParseError("NCX", _))));
    }

    #[test]
    fn test_missing_root() {
        assert!(Ncx::parse_xml("<html/>").is_err());
    }
}
