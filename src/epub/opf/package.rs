//! OPF包文件
//!
//! 提供OPF（Open Packaging Format）文档的生成与解析。

use crate::epub::opf::{
    manifest::{Manifest, ManifestItem},
    metadata::{Metadata, IDENTIFIER_ID},
    spine::SpineItem,
};
use crate::epub::xml::{attribute, local_name};
use crate::error::{ConvertError, Result};
use crate::render::escape_text;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// guide中的引用项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideReference {
    /// 引用类型，例如 cover
    pub kind: String,
    pub title: String,
    pub href: String,
}

/// OPF文件
#[derive(Debug, Clone, Default)]
pub struct Opf {
    /// EPUB版本
    pub version: String,
    /// 元数据
    pub metadata: Metadata,
    /// 清单项(文件列表)
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
    /// 脊柱的目录引用
    pub spine_toc: Option<String>,
    /// 导引
    pub guide: Vec<GuideReference>,
}

impl Opf {
    /// 序列化为OPF 2.0文档
    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="{}" version="{}">
"#,
            IDENTIFIER_ID,
            escape_text(&self.version)
        );

        xml.push_str(&self.metadata.to_xml());

        xml.push_str("  <manifest>\n");
        for item in self.manifest.items() {
            xml.push_str(&format!("    {}\n", item.to_xml()));
        }
        xml.push_str("  </manifest>\n");

        match &self.spine_toc {
            Some(toc) => xml.push_str(&format!("  <spine toc=\"{}\">\n", escape_text(toc))),
            None => xml.push_str("  <spine>\n"),
        }
        for item in &self.spine {
            xml.push_str(&format!("    {}\n", item.to_xml()));
        }
        xml.push_str("  </spine>\n");

        if !self.guide.is_empty() {
            xml.push_str("  <guide>\n");
            for reference in &self.guide {
                xml.push_str(&format!(
                    "    <reference type=\"{}\" title=\"{}\" href=\"{}\"/>\n",
                    escape_text(&reference.kind),
                    escape_text(&reference.title),
                    escape_text(&reference.href)
                ));
            }
            xml.push_str("  </guide>\n");
        }

        xml.push_str("</package>\n");
        xml
    }

    /// 解析OPF文件内容
    ///
    /// # 参数
    /// * `xml_content` - OPF文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Opf>` - 解析后的OPF信息
    pub fn parse_xml(xml_content: &str) -> Result<Opf> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut opf = Opf::default();
        let mut buf = Vec::new();
        let mut current_section = String::new();
        let mut current_element = String::new();
        let mut text_content = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let name = local_name(e);
                    match name.as_str() {
                        "package" => {
                            opf.version = attribute(e, b"version")?.unwrap_or_default();
                        }
                        "metadata" | "manifest" | "guide" => {
                            current_section = name.clone();
                        }
                        "spine" => {
                            current_section = name.clone();
                            opf.spine_toc = attribute(e, b"toc")?;
                        }
                        "item" if current_section == "manifest" => {
                            opf.manifest.push_unchecked(ManifestItem::new(
                                attribute(e, b"id")?.unwrap_or_default(),
                                attribute(e, b"href")?.unwrap_or_default(),
                                attribute(e, b"media-type")?.unwrap_or_default(),
                            ));
                        }
                        "itemref" if current_section == "spine" => {
                            let idref = attribute(e, b"idref")?.ok_or_else(|| {
                                ConvertError::ParseError("OPF", "itemref缺少idref属性".to_string())
                            })?;
                            let linear = attribute(e, b"linear")?.as_deref() != Some("no");
                            opf.spine.push(SpineItem::with_linear(idref, linear));
                        }
                        "reference" if current_section == "guide" => {
                            opf.guide.push(GuideReference {
                                kind: attribute(e, b"type")?.unwrap_or_default(),
                                title: attribute(e, b"title")?.unwrap_or_default(),
                                href: attribute(e, b"href")?.unwrap_or_default(),
                            });
                        }
                        "meta" if current_section == "metadata" => {
                            if attribute(e, b"name")?.as_deref() == Some("cover") {
                                opf.metadata.cover = attribute(e, b"content")?;
                            }
                        }
                        _ if current_section == "metadata" => {
                            current_element = name;
                            text_content.clear();
                        }
                        _ => {}
                    }
                }
                Event::Text(e) => {
                    text_content.push_str(&e.unescape()?);
                }
                Event::End(ref e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if name == current_section {
                        current_section.clear();
                    } else if name == current_element {
                        let value = text_content.trim().to_string();
                        match name.as_str() {
                            "title" => opf.metadata.title = value,
                            "language" => opf.metadata.language = value,
                            "creator" => opf.metadata.creator = value,
                            "identifier" => opf.metadata.identifier = value,
                            _ => {}
                        }
                        current_element.clear();
                        text_content.clear();
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if opf.version.is_empty() {
            return Err(ConvertError::ParseError("OPF", "缺少package元素".to_string()));
        }

        Ok(opf)
    }

    /// 获取NCX文件路径
    pub fn get_ncx_path(&self) -> Option<String> {
        self.spine_toc
            .as_deref()
            .and_then(|id| self.manifest.get(id))
            .map(|item| item.href.clone())
    }

    /// 按阅读顺序获取所有XHTML文档路径
    pub fn get_chapter_paths(&self) -> Vec<String> {
        self.spine
            .iter()
            .filter_map(|item| self.manifest.get(&item.idref))
            .filter(|item| item.is_xhtml())
            .map(|item| item.href.clone())
            .collect()
    }

    /// 获取封面图片路径
    pub fn get_cover_path(&self) -> Option<String> {
        self.metadata
            .cover
            .as_deref()
            .and_then(|id| self.manifest.get(id))
            .filter(|item| item.is_image())
            .map(|item| item.href.clone())
    }

    /// 检查清单完整性
    ///
    /// # 参数
    /// * `nav_srcs` - 导航文件中引用的文档路径
    ///
    /// # 返回值
    /// * `Vec<String>` - 发现的问题，为空表示所有引用都恰好在清单中出现一次
    pub fn check_references<'a, I>(&self, nav_srcs: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut problems = Vec::new();

        let mut duplicated: Vec<&str> = Vec::new();
        for item in self.manifest.items() {
            if self.manifest.count_id(&item.id) > 1 && !duplicated.contains(&item.id.as_str()) {
                duplicated.push(&item.id);
                problems.push(format!("清单ID重复: {}", item.id));
            }
        }

        let mut seen = Vec::new();
        for item in &self.spine {
            match self.manifest.count_id(&item.idref) {
                0 => problems.push(format!("脊柱引用了不存在的清单项: {}", item.idref)),
                1 => {}
                _ => problems.push(format!("脊柱引用的清单项不唯一: {}", item.idref)),
            }
            if seen.contains(&item.idref.as_str()) {
                problems.push(format!("脊柱项重复: {}", item.idref));
            }
            seen.push(item.idref.as_str());
        }

        if let Some(toc) = &self.spine_toc {
            if self.manifest.count_id(toc) != 1 {
                problems.push(format!("目录引用无效: {}", toc));
            }
        }

        for src in nav_srcs {
            let href = src.split('#').next().unwrap_or(src);
            if self.manifest.find_by_href(href).is_none() {
                problems.push(format!("导航引用了不存在的文档: {}", src));
            }
        }

        problems
    }
}
