//! quick-xml 读取辅助函数

use crate::error::{ConvertError, Result};
use quick_xml::events::BytesStart;

/// 读取元素的属性值（按本地名匹配，忽略命名空间前缀）
pub(crate) fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| ConvertError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
        }
    }
    Ok(None)
}

/// 元素的本地名
pub(crate) fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}
