use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// 转换过程中的错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("没有提供TXT文件内容")]
    MissingInput,

    #[error("无法识别的文本编码（已尝试 UTF-8 与 GB18030）")]
    UnsupportedEncoding,

    #[error("没有检测到章节，请确认文本中包含类似“第1章 天地初开”的标记")]
    NoChaptersDetected,

    #[error("封面图片解码失败: {0}")]
    ImageDecode(String),

    #[error("EPUB打包错误: {0}")]
    Packaging(String),

    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML解析错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("文件不是有效的EPUB格式: {0}")]
    InvalidEpub(String),

    #[error("缺少mimetype文件")]
    MissingMimetype,

    #[error("无效的mimetype: {expected}, 找到: {found}")]
    InvalidMimetype { expected: String, found: String },

    #[error("{0}解析错误: {1}")]
    ParseError(&'static str, String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl From<image::ImageError> for ConvertError {
    fn from(err: image::ImageError) -> Self {
        ConvertError::ImageDecode(err.to_string())
    }
}
