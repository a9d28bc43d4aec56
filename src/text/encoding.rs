//! 文本编码检测模块
//!
//! 先按严格模式尝试 UTF-8，失败后回退到 GB18030（兼容 GBK/GB2312）。

use crate::error::{ConvertError, Result};
use encoding_rs::{Encoding, GB18030, UTF_8};
use tracing::debug;

/// 解码后的文本及其使用的编码
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// 解码后的文本（保留可能存在的 BOM）
    pub text: String,
    /// 检测到的编码
    pub encoding: &'static Encoding,
}

impl DecodedText {
    /// 编码名称，例如 `UTF-8` 或 `gb18030`
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// 使用检测到的编码重新编码文本
    pub fn encode(&self) -> Vec<u8> {
        let (bytes, _, _) = self.encoding.encode(&self.text);
        bytes.into_owned()
    }
}

/// 检测字节缓冲区的编码并解码
///
/// # 参数
/// * `bytes` - 原始字节
///
/// # 返回值
/// * `Result<DecodedText>` - 两种编码都无法严格解码时返回 `UnsupportedEncoding`
pub fn decode(bytes: &[u8]) -> Result<DecodedText> {
    for encoding in [UTF_8, GB18030] {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            debug!(encoding = encoding.name(), bytes = bytes.len(), "文本解码成功");
            return Ok(DecodedText {
                text: text.into_owned(),
                encoding,
            });
        }
        debug!(encoding = encoding.name(), "严格解码失败，尝试下一个编码");
    }

    Err(ConvertError::UnsupportedEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        let decoded = decode("第1章 开始".as_bytes()).unwrap();
        assert_eq!(decoded.text, "第1章 开始");
        assert_eq!(decoded.encoding, UTF_8);
    }

    #[test]
    fn test_utf8_round_trip_keeps_bom() {
        let original = "\u{feff}作者：李四\r\n第一卷 风起\n正文".as_bytes().to_vec();
        let decoded = decode(&original).unwrap();
        assert!(decoded.text.starts_with('\u{feff}'));
        assert_eq!(decoded.encode(), original);
    }

    #[test]
    fn test_fallback_to_gb18030() {
        let (bytes, _, _) = GB18030.encode("第二章 继续\n第二段内容。");
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.encoding, GB18030);
        assert_eq!(decoded.text, "第二章 继续\n第二段内容。");
        assert_eq!(decoded.encode(), bytes.into_owned());
    }

    #[test]
    fn test_unsupported_encoding() {
        // 0xFF 在两种编码中都不是合法的字节
        let result = decode(&[0xFF, 0xFE, 0xFF]);
        assert!(matches!(result, Err(ConvertError::UnsupportedEncoding)));
    }

    #[test]
    fn test_empty_input_decodes() {
        let decoded = decode(b"").unwrap();
        assert!(decoded.text.is_empty());
    }
}
