//! NCX导航元素数据结构定义
//!
//! 卷与章按阅读顺序排成一层，导航深度固定为1。

use crate::render::escape_text;

/// 导航点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    /// 唯一标识符
    pub id: String,
    /// 播放顺序（从1开始）
    pub play_order: u32,
    /// 导航标签文本
    pub label: String,
    /// 内容文件路径
    pub src: String,
}

impl NavPoint {
    /// 创建新的导航点
    pub fn new(play_order: u32, label: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: format!("navPoint-{}", play_order),
            play_order,
            label: label.into(),
            src: src.into(),
        }
    }

    fn to_xml(&self) -> String {
        format!(
            r#"    <navPoint id="{}" playOrder="{}">
      <navLabel>
        <text>{}</text>
      </navLabel>
      <content src="{}"/>
    </navPoint>
"#,
            escape_text(&self.id),
            self.play_order,
            escape_text(&self.label),
            escape_text(&self.src)
        )
    }
}

/// 导航地图
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavMap {
    /// 导航点列表
    pub nav_points: Vec<NavPoint>,
}

impl NavMap {
    /// 创建新的导航地图
    pub fn new() -> Self {
        Self::default()
    }

    /// 按阅读顺序追加导航点，playOrder自动递增
    pub fn push(&mut self, label: impl Into<String>, src: impl Into<String>) -> &NavPoint {
        let play_order = self.nav_points.len() as u32 + 1;
        self.nav_points.push(NavPoint::new(play_order, label, src));
        &self.nav_points[self.nav_points.len() - 1]
    }

    /// 按playOrder排序
    pub fn sort_by_play_order(&mut self) {
        self.nav_points.sort_by_key(|point| point.play_order);
    }

    pub fn len(&self) -> usize {
        self.nav_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nav_points.is_empty()
    }
}

/// NCX文件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ncx {
    /// 唯一标识符（dtb:uid），与OPF中的标识符一致
    pub uid: String,
    /// 文档标题
    pub doc_title: String,
    /// 文档作者
    pub doc_author: Option<String>,
    /// 导航地图
    pub nav_map: NavMap,
}

impl Ncx {
    /// 序列化为NCX文档
    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>{}</text>
  </docTitle>
"#,
            escape_text(&self.uid),
            escape_text(&self.doc_title)
        );

        if let Some(author) = &self.doc_author {
            xml.push_str(&format!(
                "  <docAuthor>\n    <text>{}</text>\n  </docAuthor>\n",
                escape_text(author)
            ));
        }

        xml.push_str("  <navMap>\n");
        for point in &self.nav_map.nav_points {
            xml.push_str(&point.to_xml());
        }
        xml.push_str("  </navMap>\n</ncx>\n");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_play_order() {
        let mut nav_map = NavMap::new();
        nav_map.push("封面", "cover.xhtml");
        nav_map.push("第1章 开始", "chapter1.xhtml");

        assert_eq!(nav_map.len(), 2);
        assert_eq!(nav_map.nav_points[0].play_order, 1);
        assert_eq!(nav_map.nav_points[1].play_order, 2);
        assert_eq!(nav_map.nav_points[1].id, "navPoint-2");
        assert_eq!(nav_map.nav_points[0].label, "封面");
    }

    #[test]
    fn test_ncx_xml() {
        let mut ncx = Ncx {
            uid: "urn:uuid:abc".to_string(),
            doc_title: "书 <1>".to_string(),
            doc_author: Some("张三".to_string()),
            nav_map: NavMap::new(),
        };
        ncx.nav_map.push("第1章 开始", "chapter1.xhtml");

        let xml = ncx.to_xml();
        assert!(xml.contains(r#"<meta name="dtb:uid" content="urn:uuid:abc"/>"#));
        assert!(xml.contains("<text>书 &lt;1&gt;</text>"));
        assert!(xml.contains("<docAuthor>"));
        assert!(xml.contains(r#"<navPoint id="navPoint-1" playOrder="1">"#));
        assert!(xml.contains(r#"<content src="chapter1.xhtml"/>"#));
    }
}
