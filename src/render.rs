//! XHTML文档渲染模块
//!
//! 把章节与封面渲染为XHTML文档。此模块只负责内容格式，不决定文件在包中的位置。

use crate::book::{Chapter, Cover};
use quick_xml::escape::escape;

/// 章节与封面页共享的样式表文件名
pub const STYLESHEET_HREF: &str = "style.css";

/// 封面页文件名
pub const COVER_PAGE_HREF: &str = "cover.xhtml";

/// 清除XML 1.0中不允许出现的控制字符后再转义
pub fn escape_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n'))
        .collect();
    escape(cleaned.as_str()).into_owned()
}

/// 章节文档的文件名
pub fn chapter_href(chapter: &Chapter) -> String {
    format!("chapter{}.xhtml", chapter.sequence_index)
}

/// 渲染单个章节
///
/// 卷标题使用 `<h1>`，其他标题使用 `<h2>`，每个正文段落对应一个 `<p>`。
pub fn render_chapter(chapter: &Chapter, language: &str) -> String {
    let title = escape_text(&chapter.title);
    let heading = if chapter.is_volume { "h1" } else { "h2" };

    let mut body = format!("    <{0}>{1}</{0}>\n", heading, title);
    for paragraph in &chapter.paragraphs {
        body.push_str(&format!("    <p>{}</p>\n", escape_text(paragraph)));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}" lang="{lang}">
  <head>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="{css}"/>
  </head>
  <body>
{body}  </body>
</html>
"#,
        lang = escape_text(language),
        title = title,
        css = STYLESHEET_HREF,
        body = body,
    )
}

/// 渲染封面页
///
/// SVG的 viewBox 与图片尺寸使用封面的真实像素尺寸，保证阅读器按原始比例缩放。
pub fn render_cover_page(cover: &Cover, title: &str, language: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}" lang="{lang}">
  <head>
    <title>{title}</title>
    <style type="text/css">html, body {{ margin: 0; padding: 0; height: 100%; text-align: center; }}</style>
  </head>
  <body>
    <div>
      <svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="100%" height="100%" viewBox="0 0 {width} {height}" preserveAspectRatio="xMidYMid meet">
        <image width="{width}" height="{height}" xlink:href="{href}"/>
      </svg>
    </div>
  </body>
</html>
"#,
        lang = escape_text(language),
        title = escape_text(title),
        width = cover.width,
        height = cover.height,
        href = escape_text(&cover.file_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::HeadingKind;
    use scraper::{Html, Selector};

    fn chapter(title: &str, is_volume: bool, paragraphs: &[&str]) -> Chapter {
        Chapter {
            title: title.to_string(),
            is_volume,
            kind: if is_volume { HeadingKind::Volume } else { HeadingKind::Chapter },
            number: Some(1),
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
            sequence_index: 3,
        }
    }

    fn texts(document: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_render_chapter() {
        let xhtml = render_chapter(&chapter("第1章 开始", false, &["第一段", "第二段"]), "zh");
        let document = Html::parse_document(&xhtml);

        assert_eq!(texts(&document, "title"), vec!["第1章 开始"]);
        assert_eq!(texts(&document, "h2"), vec!["第1章 开始"]);
        assert!(texts(&document, "h1").is_empty());
        assert_eq!(texts(&document, "p"), vec!["第一段", "第二段"]);
        assert!(xhtml.contains(r#"href="style.css""#));
    }

    #[test]
    fn test_render_volume_uses_h1() {
        let xhtml = render_chapter(&chapter("第一卷 风起", true, &[]), "zh");
        let document = Html::parse_document(&xhtml);

        assert_eq!(texts(&document, "h1"), vec!["第一卷 风起"]);
        assert!(texts(&document, "h2").is_empty());
        assert!(texts(&document, "p").is_empty());
    }

    #[test]
    fn test_escaping_and_control_characters() {
        let xhtml = render_chapter(&chapter("第1章 <A&B>", false, &["他说\u{0}：\"走\u{7}\""]), "zh");
        assert!(xhtml.contains("第1章 &lt;A&amp;B&gt;"));
        assert!(!xhtml.contains('\u{0}'));
        assert!(!xhtml.contains('\u{7}'));

        let document = Html::parse_document(&xhtml);
        assert_eq!(texts(&document, "p"), vec!["他说：\"走\""]);
    }

    #[test]
    fn test_render_cover_page() {
        let cover = Cover {
            bytes: vec![],
            media_type: "image/png".to_string(),
            width: 600,
            height: 800,
        };
        let xhtml = render_cover_page(&cover, "封面", "zh");

        assert!(xhtml.contains(r#"viewBox="0 0 600 800""#));
        assert!(xhtml.contains(r#"<image width="600" height="800" xlink:href="cover.png"/>"#));
        assert!(xhtml.contains("<title>封面</title>"));
    }

    #[test]
    fn test_chapter_href() {
        assert_eq!(chapter_href(&chapter("第1章", false, &[])), "chapter3.xhtml");
    }
}
