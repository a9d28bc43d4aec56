//! 转换配置模块
//!
//! 提供转换参数的配置管理功能，支持从YAML文件加载配置。

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "txtforge.yaml";

/// 默认样式表：正文段落首行缩进两个字符
pub const DEFAULT_STYLESHEET: &str = "body { font-family: Arial, sans-serif; line-height: 1.6; }
p { text-indent: 2em; margin: 0; }
";

/// 转换配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// 书籍语言代码
    pub language: String,
    /// 文本与调用方都没有提供作者时使用的占位作者
    pub default_author: String,
    /// 所有章节共享的样式表
    pub stylesheet: String,
    /// 目录中封面条目的标签
    pub cover_label: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            language: "zh".to_string(),
            default_author: "Unknown".to_string(),
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            cover_label: "封面".to_string(),
        }
    }
}

impl ConvertConfig {
    /// 从YAML配置文件加载配置
    ///
    /// 文件中缺失的字段使用默认值。
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConvertError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// 从YAML字符串解析配置
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| ConvertError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 生成默认配置文件
    ///
    /// # 参数
    /// * `path` - 要写入的配置文件路径
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default())
            .map_err(|e| ConvertError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# TXT转EPUB配置文件\n# language: 书籍语言代码\n# default_author: 未检测到作者时使用的占位作者\n# stylesheet: 章节共享样式表\n# cover_label: 目录中封面条目的标签\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| ConvertError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 如果提供了路径则从文件加载，否则使用默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.language, "zh");
        assert_eq!(config.default_author, "Unknown");
        assert!(config.stylesheet.contains("text-indent: 2em"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ConvertConfig::from_yaml("default_author: 佚名\n").unwrap();
        assert_eq!(config.default_author, "佚名");
        assert_eq!(config.language, "zh");
        assert_eq!(config.cover_label, "封面");
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ConvertConfig::from_yaml("language: [zh");
        assert!(matches!(result, Err(ConvertError::ConfigError(_))));
    }

    #[test]
    fn test_generate_and_load_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);

        ConvertConfig::generate_default_config(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# TXT转EPUB配置文件"));

        let config = ConvertConfig::load(Some(&path)).unwrap();
        assert_eq!(config, ConvertConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConvertConfig::from_file("/nonexistent/txtforge.yaml");
        assert!(matches!(result, Err(ConvertError::ConfigError(_))));
    }
}
