//! 章节切分模块
//!
//! 按行扫描解码后的文本，依次用卷、章、序言三类标题匹配器测试每一行，
//! 把文本切分为（标题，正文）对。第一个标题之前的内容会被丢弃。

use crate::book::Chapter;
use crate::error::{ConvertError, Result};
use crate::text::numeral::parse_numeral;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

const NUMERAL_CLASS: &str = "[0-9０-９零〇一二两三四五六七八九十百千万]+";

static VOLUME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^第({})卷", NUMERAL_CLASS)).expect("卷标题正则无效"));

static CHAPTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^第({})章", NUMERAL_CLASS)).expect("章标题正则无效"));

static PROLOGUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^(楔子|引言|序章)").expect("序言标题正则无效"));

static AUTHOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"作者[:：][ \t\x{3000}]*([^\r\n]*)").expect("作者正则无效"));

/// 标题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    /// 第X卷
    Volume,
    /// 第X章
    Chapter,
    /// 楔子、引言、序章
    Prologue,
}

/// 按优先级排列的标题匹配器
fn matchers() -> [(HeadingKind, &'static Regex); 3] {
    [
        (HeadingKind::Volume, &*VOLUME_PATTERN),
        (HeadingKind::Chapter, &*CHAPTER_PATTERN),
        (HeadingKind::Prologue, &*PROLOGUE_PATTERN),
    ]
}

/// 识别出的标题行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub kind: HeadingKind,
    /// 从标题中解析出的序号（序言类标题没有序号）
    pub number: Option<u32>,
}

/// 切分结果
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// 文本中声明的作者
    pub author: Option<String>,
    /// 按出现顺序排列的章节
    pub chapters: Vec<Chapter>,
}

/// 测试一行（已去除首尾空白）是否为标题
pub fn match_heading(line: &str) -> Option<Heading> {
    matchers().into_iter().find_map(|(kind, pattern)| {
        pattern.captures(line).map(|caps| Heading {
            kind,
            number: caps.get(1).and_then(|m| {
                if kind == HeadingKind::Prologue {
                    None
                } else {
                    parse_numeral(m.as_str())
                }
            }),
        })
    })
}

/// 标题是否为卷标题
pub fn is_volume_title(title: &str) -> bool {
    VOLUME_PATTERN.is_match(title)
}

/// 查找文本中声明的作者（“作者:”或“作者：”）
pub fn detect_author(text: &str) -> Option<String> {
    AUTHOR_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .find(|author| !author.is_empty())
}

/// 找出章节序号不连续的章节，返回其 `sequence_index`
///
/// 卷标题之后重新计数，序言和无法解析序号的标题不参与比较。
pub fn numbering_gaps(chapters: &[Chapter]) -> Vec<usize> {
    let mut gaps = Vec::new();
    let mut previous: Option<u32> = None;

    for chapter in chapters {
        match chapter.kind {
            HeadingKind::Volume => previous = None,
            HeadingKind::Chapter => {
                if let (Some(prev), Some(number)) = (previous, chapter.number) {
                    if number != prev + 1 {
                        gaps.push(chapter.sequence_index);
                    }
                }
                previous = chapter.number.or(previous);
            }
            HeadingKind::Prologue => {}
        }
    }

    gaps
}

/// 把文本切分为章节
///
/// # 参数
/// * `text` - 解码后的完整文本
///
/// # 返回值
/// * `Result<Segmentation>` - 没有任何标题时返回 `NoChaptersDetected`
pub fn segment(text: &str) -> Result<Segmentation> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut chapters: Vec<Chapter> = Vec::new();
    let mut discarded_lines = 0usize;

    for line in text.lines() {
        let line = line.trim();

        if let Some(heading) = match_heading(line) {
            let title = line.to_string();
            chapters.push(Chapter {
                is_volume: is_volume_title(&title),
                title,
                kind: heading.kind,
                number: heading.number,
                paragraphs: Vec::new(),
                sequence_index: chapters.len() + 1,
            });
            continue;
        }

        if line.is_empty() {
            continue;
        }

        match chapters.last_mut() {
            Some(chapter) => chapter.paragraphs.push(line.to_string()),
            None => discarded_lines += 1,
        }
    }

    if chapters.is_empty() {
        return Err(ConvertError::NoChaptersDetected);
    }

    debug!(
        chapters = chapters.len(),
        volumes = chapters.iter().filter(|c| c.kind == HeadingKind::Volume).count(),
        prologues = chapters.iter().filter(|c| c.kind == HeadingKind::Prologue).count(),
        discarded_lines,
        "章节切分完成"
    );

    let gaps = numbering_gaps(&chapters);
    if !gaps.is_empty() {
        warn!(?gaps, "章节序号不连续");
    }

    Ok(Segmentation {
        author: detect_author(text),
        chapters,
    })
}
