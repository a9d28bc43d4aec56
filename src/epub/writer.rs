//! EPUB打包模块
//!
//! 根据书籍信息与渲染好的文档生成container.xml、OPF与NCX，
//! 并把所有文件打包为zip。mimetype必须是第一个条目且不压缩。

use crate::book::Book;
use crate::epub::container::{Container, CONTAINER_PATH};
use crate::epub::ncx::{NavMap, Ncx};
use crate::epub::opf::{
    GuideReference, Manifest, ManifestItem, Metadata, Opf, SpineItem, CSS_MEDIA_TYPE,
    NCX_MEDIA_TYPE, XHTML_MEDIA_TYPE,
};
use crate::error::{ConvertError, Result};
use crate::render::{COVER_PAGE_HREF, STYLESHEET_HREF};
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// mimetype文件的内容
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// 内容文件所在目录
pub const CONTENT_DIR: &str = "OEBPS";

const STYLESHEET_ID: &str = "style";
const COVER_IMAGE_ID: &str = "cover";
const COVER_PAGE_ID: &str = "coverPage";
const NCX_ID: &str = "ncx";
const NCX_HREF: &str = "toc.ncx";

/// 渲染好的章节文档
#[derive(Debug, Clone)]
pub struct ChapterDocument {
    /// 章节标题，用作目录标签
    pub title: String,
    /// 文件名（相对于OPF文件）
    pub href: String,
    /// XHTML内容
    pub xhtml: String,
}

/// 渲染阶段的全部产物
#[derive(Debug, Clone)]
pub struct RenderedBook {
    /// 按阅读顺序排列的章节文档
    pub chapters: Vec<ChapterDocument>,
    /// 封面页（有封面时存在）
    pub cover_page: Option<String>,
    /// 共享样式表
    pub stylesheet: String,
}

/// 包中的一个文件
struct PackageEntry<'a> {
    item: ManifestItem,
    data: &'a [u8],
}

/// EPUB打包器
pub struct PackageAssembler<'a> {
    book: &'a Book,
    rendered: &'a RenderedBook,
    cover_label: String,
}

impl<'a> PackageAssembler<'a> {
    pub fn new(book: &'a Book, rendered: &'a RenderedBook) -> Self {
        Self {
            book,
            rendered,
            cover_label: "封面".to_string(),
        }
    }

    /// 设置目录中封面条目的标签
    pub fn with_cover_label(mut self, label: impl Into<String>) -> Self {
        self.cover_label = label.into();
        self
    }

    /// 生成OPF、NCX并打包
    ///
    /// # 返回值
    /// * `Result<Vec<u8>>` - EPUB文件的字节
    pub fn assemble(&self) -> Result<Vec<u8>> {
        if self.rendered.chapters.is_empty() {
            return Err(ConvertError::Packaging("没有可打包的章节".to_string()));
        }

        let cover_page = match (&self.book.cover, &self.rendered.cover_page) {
            (Some(cover), Some(page)) => Some((cover, page)),
            (None, None) => None,
            _ => {
                return Err(ConvertError::Packaging(
                    "封面图片与封面页必须同时存在".to_string(),
                ));
            }
        };

        let mut entries = vec![PackageEntry {
            item: ManifestItem::new(STYLESHEET_ID, STYLESHEET_HREF, CSS_MEDIA_TYPE),
            data: self.rendered.stylesheet.as_bytes(),
        }];
        let mut spine = Vec::new();
        let mut nav_map = NavMap::new();
        let mut guide = Vec::new();

        if let Some((cover, page)) = cover_page {
            entries.push(PackageEntry {
                item: ManifestItem::new(COVER_IMAGE_ID, cover.file_name(), cover.media_type.clone()),
                data: &cover.bytes,
            });
            entries.push(PackageEntry {
                item: ManifestItem::new(COVER_PAGE_ID, COVER_PAGE_HREF, XHTML_MEDIA_TYPE),
                data: page.as_bytes(),
            });
            spine.push(SpineItem::new(COVER_PAGE_ID));
            nav_map.push(self.cover_label.clone(), COVER_PAGE_HREF);
            guide.push(GuideReference {
                kind: "cover".to_string(),
                title: self.cover_label.clone(),
                href: COVER_PAGE_HREF.to_string(),
            });
        }

        for (index, chapter) in self.rendered.chapters.iter().enumerate() {
            let id = format!("chap{}", index + 1);
            entries.push(PackageEntry {
                item: ManifestItem::new(id.clone(), chapter.href.clone(), XHTML_MEDIA_TYPE),
                data: chapter.xhtml.as_bytes(),
            });
            spine.push(SpineItem::new(id));
            nav_map.push(chapter.title.clone(), chapter.href.clone());
        }

        let mut manifest = Manifest::new();
        for entry in &entries {
            manifest.add(entry.item.clone())?;
        }
        manifest.add(ManifestItem::new(NCX_ID, NCX_HREF, NCX_MEDIA_TYPE))?;

        let opf = Opf {
            version: "2.0".to_string(),
            metadata: Metadata {
                title: self.book.title.clone(),
                language: self.book.language.clone(),
                creator: self.book.author.clone(),
                identifier: self.book.identifier.clone(),
                cover: cover_page.map(|_| COVER_IMAGE_ID.to_string()),
            },
            manifest,
            spine,
            spine_toc: Some(NCX_ID.to_string()),
            guide,
        };

        let ncx = Ncx {
            uid: self.book.identifier.clone(),
            doc_title: self.book.title.clone(),
            doc_author: Some(self.book.author.clone()),
            nav_map,
        };

        let opf_path = format!("{}/content.opf", CONTENT_DIR);
        let container = Container::for_package(&opf_path);

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file("mimetype", stored)?;
        zip.write_all(EPUB_MIMETYPE.as_bytes())?;

        zip.start_file(CONTAINER_PATH, deflated)?;
        zip.write_all(container.to_xml().as_bytes())?;

        zip.start_file(opf_path.as_str(), deflated)?;
        zip.write_all(opf.to_xml().as_bytes())?;

        zip.start_file(format!("{}/{}", CONTENT_DIR, NCX_HREF), deflated)?;
        zip.write_all(ncx.to_xml().as_bytes())?;

        for entry in &entries {
            // 图片本身已经压缩过
            let options = if entry.item.is_image() { stored } else { deflated };
            zip.start_file(format!("{}/{}", CONTENT_DIR, entry.item.href), options)?;
            zip.write_all(entry.data)?;
        }

        let bytes = zip.finish()?.into_inner();

        debug!(
            manifest_items = opf.manifest.len(),
            spine_items = opf.spine.len(),
            nav_points = ncx.nav_map.len(),
            bytes = bytes.len(),
            "EPUB打包完成"
        );

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Cover;
    use crate::epub::Epub;

    fn book(cover: Option<Cover>) -> Book {
        Book {
            title: "测试书籍".to_string(),
            author: "测试作者".to_string(),
            language: "zh".to_string(),
            identifier: "urn:uuid:test".to_string(),
            chapters: Vec::new(),
            cover,
        }
    }

    fn rendered(chapters: usize, cover_page: Option<&str>) -> RenderedBook {
        RenderedBook {
            chapters: (1..=chapters)
                .map(|i| ChapterDocument {
                    title: format!("第{}章", i),
                    href: format!("chapter{}.xhtml", i),
                    xhtml: format!("<html><body><h2>第{}章</h2></body></html>", i),
                })
                .collect(),
            cover_page: cover_page.map(str::to_string),
            stylesheet: "p { text-indent: 2em; }".to_string(),
        }
    }

    fn cover() -> Cover {
        Cover {
            bytes: vec![1, 2, 3],
            media_type: "image/jpeg".to_string(),
            width: 10,
            height: 20,
        }
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let book = book(None);
        let rendered = rendered(2, None);
        let bytes = PackageAssembler::new(&book, &rendered).assemble().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        let mut epub = Epub::from_bytes(bytes).unwrap();
        assert!(epub.check().unwrap().is_empty());
        let ncx = epub.parse_ncx().unwrap();
        assert_eq!(ncx.uid, "urn:uuid:test");
        assert_eq!(ncx.doc_author.as_deref(), Some("测试作者"));
    }

    #[test]
    fn test_cover_entries_and_label() {
        let book = book(Some(cover()));
        let rendered = rendered(1, Some("<html/>"));
        let bytes = PackageAssembler::new(&book, &rendered)
            .with_cover_label("Cover")
            .assemble()
            .unwrap();

        let mut epub = Epub::from_bytes(bytes).unwrap();
        assert!(epub.check().unwrap().is_empty());

        let opf = epub.parse_opf().unwrap();
        let cover_item = opf.manifest.get("cover").unwrap();
        assert_eq!(cover_item.href, "cover.jpeg");
        assert_eq!(cover_item.media_type, "image/jpeg");
        assert_eq!(opf.manifest.count_id("coverPage"), 1);
        assert_eq!(opf.guide[0].title, "Cover");

        let ncx = epub.parse_ncx().unwrap();
        assert_eq!(ncx.nav_map.nav_points[0].label, "Cover");
        assert_eq!(ncx.nav_map.nav_points[1].play_order, 2);
    }

    #[test]
    fn test_empty_chapters_rejected() {
        let book = book(None);
        let rendered = rendered(0, None);
        let result = PackageAssembler::new(&book, &rendered).assemble();
        assert!(matches!(result, Err(ConvertError::Packaging(_))));
    }

    #[test]
    fn test_cover_without_cover_page_rejected() {
        let book = book(Some(cover()));
        let rendered = rendered(1, None);
        let result = PackageAssembler::new(&book, &rendered).assemble();
        assert!(matches!(result, Err(ConvertError::Packaging(_))));
    }

    #[test]
    fn test_duplicate_chapter_href_rejected() {
        let book = book(None);
        let mut rendered = rendered(2, None);
        rendered.chapters[1].href = "chapter1.xhtml".to_string();
        let result = PackageAssembler::new(&book, &rendered).assemble();
        assert!(matches!(result, Err(ConvertError::Packaging(_))));
    }
}
