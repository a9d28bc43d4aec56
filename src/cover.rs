//! 封面处理模块
//!
//! 解码封面图片头部以获取精确的像素尺寸，封面页的SVG需要它来避免图片变形。

use crate::book::Cover;
use crate::error::{ConvertError, Result};
use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

/// 调用方提供的封面输入
#[derive(Debug, Clone)]
pub struct CoverInput {
    /// 图片的二进制数据
    pub bytes: Vec<u8>,
    /// 声明的媒体类型，未声明时根据图片签名推断
    pub media_type: Option<String>,
}

impl CoverInput {
    pub fn new(bytes: Vec<u8>, media_type: Option<String>) -> Self {
        Self { bytes, media_type }
    }
}

/// 根据文件扩展名猜测图片的媒体类型
pub fn media_type_from_extension(path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

fn media_type_from_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

/// 处理封面图片
///
/// # 参数
/// * `input` - 封面输入，`None` 表示没有封面
///
/// # 返回值
/// * `Result<Option<Cover>>` - 无法解码图片尺寸时返回 `ImageDecode`
pub fn process(input: Option<&CoverInput>) -> Result<Option<Cover>> {
    let Some(input) = input else {
        return Ok(None);
    };

    if input.bytes.is_empty() {
        return Err(ConvertError::ImageDecode("封面图片为空".to_string()));
    }

    let reader = image::io::Reader::new(Cursor::new(&input.bytes)).with_guessed_format()?;
    let detected = reader.format();
    let (width, height) = reader.into_dimensions()?;

    if width == 0 || height == 0 {
        return Err(ConvertError::ImageDecode(format!(
            "封面尺寸无效: {}x{}",
            width, height
        )));
    }

    let declared = input
        .media_type
        .as_deref()
        .map(str::trim)
        .filter(|declared| !declared.is_empty());
    let detected = detected.and_then(media_type_from_format);

    let media_type = match (declared, detected) {
        (Some(declared), _) if !declared.to_ascii_lowercase().starts_with("image/") => {
            return Err(ConvertError::ImageDecode(format!(
                "封面媒体类型不是图片: {}",
                declared
            )));
        }
        // 声明与图片签名不一致时以签名为准
        (Some(declared), Some(detected)) if !declared.eq_ignore_ascii_case(detected) => {
            debug!(declared, detected, "封面声明的媒体类型与图片签名不一致");
            detected.to_string()
        }
        (Some(declared), _) => declared.to_string(),
        (None, Some(detected)) => detected.to_string(),
        (None, None) => {
            return Err(ConvertError::ImageDecode("无法确定封面的媒体类型".to_string()));
        }
    };

    debug!(%media_type, width, height, "封面解码成功");

    Ok(Some(Cover {
        bytes: input.bytes.clone(),
        media_type,
        width,
        height,
    }))
}
