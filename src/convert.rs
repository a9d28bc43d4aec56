//! TXT到EPUB的转换流程
//!
//! 解码 → 切分章节 → 处理封面 → 渲染文档 → 打包。
//! 整个流程是一个纯函数，不依赖也不修改任何全局状态。

use crate::book::{epub_file_name, title_from_file_name, Book};
use crate::config::ConvertConfig;
use crate::cover::{self, CoverInput};
use crate::epub::{ChapterDocument, PackageAssembler, RenderedBook};
use crate::error::{ConvertError, Result};
use crate::render;
use crate::text;
use tracing::{debug, info};

/// 一次转换的输入
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// TXT文件的原始字节
    pub txt_bytes: Vec<u8>,
    /// TXT文件名，用于推导书名
    pub txt_file_name: String,
    /// 封面（可选）
    pub cover: Option<CoverInput>,
    /// 调用方指定的作者，文本中声明的作者优先
    pub author: Option<String>,
}

impl ConversionRequest {
    pub fn new(txt_bytes: Vec<u8>, txt_file_name: impl Into<String>) -> Self {
        Self {
            txt_bytes,
            txt_file_name: txt_file_name.into(),
            cover: None,
            author: None,
        }
    }

    pub fn with_cover(mut self, cover: CoverInput) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// 转换结果
#[derive(Debug, Clone)]
pub struct Conversion {
    /// 输出文件名（书名 + .epub）
    pub file_name: String,
    /// 书名
    pub title: String,
    /// 作者
    pub author: String,
    /// 检测到的TXT编码
    pub encoding: &'static str,
    /// 章节数（包括卷）
    pub chapter_count: usize,
    /// 是否包含封面
    pub has_cover: bool,
    /// EPUB文件的字节
    pub bytes: Vec<u8>,
}

/// 把TXT转换为EPUB
///
/// # 参数
/// * `request` - 转换输入
/// * `config` - 转换配置
///
/// # 返回值
/// * `Result<Conversion>` - 任一步骤失败时整个转换失败，不会返回不完整的文件
pub fn convert(request: &ConversionRequest, config: &ConvertConfig) -> Result<Conversion> {
    if request.txt_bytes.is_empty() {
        return Err(ConvertError::MissingInput);
    }

    let decoded = text::decode(&request.txt_bytes)?;
    let segmentation = text::segment(&decoded.text)?;

    let author = segmentation
        .author
        .or_else(|| {
            request
                .author
                .as_deref()
                .map(str::trim)
                .filter(|author| !author.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| config.default_author.clone());

    let book = Book {
        title: title_from_file_name(&request.txt_file_name),
        author,
        language: config.language.clone(),
        identifier: Book::generate_identifier(),
        chapters: segmentation.chapters,
        cover: cover::process(request.cover.as_ref())?,
    };

    debug!(title = %book.title, author = %book.author, "书籍信息");

    let rendered = render_book(&book, config);
    let bytes = PackageAssembler::new(&book, &rendered)
        .with_cover_label(config.cover_label.clone())
        .assemble()?;

    info!(
        title = %book.title,
        encoding = decoded.encoding_name(),
        chapters = book.chapters.len(),
        cover = book.cover.is_some(),
        bytes = bytes.len(),
        "转换完成"
    );

    Ok(Conversion {
        file_name: epub_file_name(&book.title),
        title: book.title,
        author: book.author,
        encoding: decoded.encoding_name(),
        chapter_count: book.chapters.len(),
        has_cover: book.cover.is_some(),
        bytes,
    })
}

/// 渲染全部章节与封面页
fn render_book(book: &Book, config: &ConvertConfig) -> RenderedBook {
    let chapters = book
        .chapters
        .iter()
        .map(|chapter| ChapterDocument {
            title: chapter.title.clone(),
            href: render::chapter_href(chapter),
            xhtml: render::render_chapter(chapter, &book.language),
        })
        .collect();

    RenderedBook {
        chapters,
        cover_page: book
            .cover
            .as_ref()
            .map(|cover| render::render_cover_page(cover, &config.cover_label, &book.language)),
        stylesheet: config.stylesheet.clone(),
    }
}
