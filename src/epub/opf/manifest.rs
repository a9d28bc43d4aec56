//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。清单按插入顺序保存，ID在包内唯一。

use crate::error::{ConvertError, Result};
use crate::render::escape_text;

/// XHTML文档的媒体类型
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
/// NCX文件的媒体类型
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";
/// CSS文件的媒体类型
pub const CSS_MEDIA_TYPE: &str = "text/css";

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: impl Into<String>, href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
        }
    }

    /// 检查是否为图片文件
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// 检查是否为XHTML文件
    pub fn is_xhtml(&self) -> bool {
        self.media_type == XHTML_MEDIA_TYPE
    }

    pub(crate) fn to_xml(&self) -> String {
        format!(
            r#"<item id="{}" href="{}" media-type="{}"/>"#,
            escape_text(&self.id),
            escape_text(&self.href),
            escape_text(&self.media_type)
        )
    }
}

/// 有序清单
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: Vec<ManifestItem>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加清单项，ID或路径重复时返回 `Packaging` 错误
    pub fn add(&mut self, item: ManifestItem) -> Result<()> {
        if self.get(&item.id).is_some() {
            return Err(ConvertError::Packaging(format!("清单ID重复: {}", item.id)));
        }
        if self.find_by_href(&item.href).is_some() {
            return Err(ConvertError::Packaging(format!("清单路径重复: {}", item.href)));
        }
        self.items.push(item);
        Ok(())
    }

    /// 根据ID查找清单项
    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// 根据路径查找清单项
    pub fn find_by_href(&self, href: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.href == href)
    }

    /// ID出现的次数
    pub fn count_id(&self, id: &str) -> usize {
        self.items.iter().filter(|item| item.id == id).count()
    }

    pub fn items(&self) -> &[ManifestItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 解析时使用：允许重复项以便检查引用完整性
    pub(crate) fn push_unchecked(&mut self, item: ManifestItem) {
        self.items.push(item);
    }
}
