use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;
use zip::{CompressionMethod, ZipArchive};

use crate::epub::container::{Container, CONTAINER_PATH};
use crate::epub::ncx::Ncx;
use crate::epub::opf::Opf;
use crate::epub::writer::EPUB_MIMETYPE;
use crate::error::{ConvertError, Result};

/// 已生成的EPUB文件，用于回读检查
pub struct Epub {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Epub {
    /// 从文件路径创建Epub实例
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    ///
    /// # 返回值
    /// * `Result<Epub>` - 成功返回Epub实例，失败返回错误
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Epub> {
        Self::from_bytes(fs::read(path)?)
    }

    /// 从内存中的字节创建Epub实例
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Epub> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;

        let mut epub = Epub { archive };
        epub.validate()?;

        Ok(epub)
    }

    /// 验证EPUB文件的合法性
    ///
    /// 检查步骤：
    /// 1. 第一个条目必须是mimetype文件
    /// 2. mimetype文件不能压缩
    /// 3. mimetype文件的内容必须是"application/epub+zip"
    fn validate(&mut self) -> Result<()> {
        if self.archive.is_empty() {
            return Err(ConvertError::MissingMimetype);
        }

        let (first_name, compression) = {
            let first = self.archive.by_index(0)?;
            (first.name().to_string(), first.compression())
        };

        if first_name != "mimetype" {
            return Err(if self.archive_has_mimetype() {
                ConvertError::InvalidEpub("mimetype不是第一个条目".to_string())
            } else {
                ConvertError::MissingMimetype
            });
        }

        if compression != CompressionMethod::Stored {
            return Err(ConvertError::InvalidEpub("mimetype文件不能被压缩".to_string()));
        }

        let content = self.extract_file("mimetype")?;

        if content != EPUB_MIMETYPE {
            return Err(ConvertError::InvalidMimetype {
                expected: EPUB_MIMETYPE.to_string(),
                found: content,
            });
        }

        debug!("EPUB验证成功: mimetype文件正确");
        Ok(())
    }

    fn archive_has_mimetype(&self) -> bool {
        self.archive.file_names().any(|name| name == "mimetype")
    }

    /// 列出EPUB文件中的所有条目（按包内顺序）
    pub fn list_files(&mut self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            files.push(file.name().to_string());
        }

        Ok(files)
    }

    /// 提取指定文件的内容
    ///
    /// # 参数
    /// * `filename` - 要提取的文件名
    ///
    /// # 返回值
    /// * `Result<String>` - 文件内容
    pub fn extract_file(&mut self, filename: &str) -> Result<String> {
        let mut file = self.archive.by_name(filename)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// 提取指定文件的二进制内容
    pub fn extract_binary_file(&mut self, filename: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(filename)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// 解析container.xml文件
    pub fn parse_container(&mut self) -> Result<Container> {
        let container_content = self.extract_file(CONTAINER_PATH)?;
        Container::parse_xml(&container_content)
    }

    /// 获取主要的OPF文件路径
    pub fn get_opf_path(&mut self) -> Result<String> {
        let container = self.parse_container()?;

        container.get_opf_path().ok_or_else(|| {
            ConvertError::ParseError(
                "container.xml",
                "没有找到有效的rootfile".to_string(),
            )
        })
    }

    /// 获取OPF文件所在的目录
    pub fn get_opf_directory(&mut self) -> Result<String> {
        let opf_path = self.get_opf_path()?;

        Ok(Path::new(&opf_path)
            .parent()
            .map(|parent| parent.to_string_lossy().to_string())
            .unwrap_or_default())
    }

    /// 把相对于OPF文件的路径转换为包内完整路径
    pub fn resolve_path(&mut self, href: &str) -> Result<String> {
        let opf_dir = self.get_opf_directory()?;
        Ok(if opf_dir.is_empty() {
            href.to_string()
        } else {
            format!("{}/{}", opf_dir, href)
        })
    }

    /// 解析OPF文件
    pub fn parse_opf(&mut self) -> Result<Opf> {
        let opf_path = self.get_opf_path()?;
        let opf_content = self.extract_file(&opf_path)?;
        Opf::parse_xml(&opf_content)
    }

    /// 解析NCX文件
    pub fn parse_ncx(&mut self) -> Result<Ncx> {
        let opf = self.parse_opf()?;
        let ncx_href = opf
            .get_ncx_path()
            .ok_or_else(|| ConvertError::ParseError("OPF", "没有找到NCX文件".to_string()))?;
        let ncx_path = self.resolve_path(&ncx_href)?;
        let ncx_content = self.extract_file(&ncx_path)?;
        Ncx::parse_xml(&ncx_content)
    }

    /// 获取所有章节内容（按脊柱顺序）
    ///
    /// # 返回值
    /// * `Result<Vec<(String, String)>>` - (文件路径, 内容)的列表
    pub fn get_chapters(&mut self) -> Result<Vec<(String, String)>> {
        let opf = self.parse_opf()?;

        let mut chapters = Vec::new();
        for href in opf.get_chapter_paths() {
            let full_path = self.resolve_path(&href)?;
            let content = self.extract_file(&full_path)?;
            chapters.push((href, content));
        }

        Ok(chapters)
    }

    /// 检查包的引用完整性：脊柱和导航引用的文档都恰好在清单中出现一次，
    /// 且清单中的每个文件都存在于包内
    ///
    /// # 返回值
    /// * `Result<Vec<String>>` - 发现的问题列表
    pub fn check(&mut self) -> Result<Vec<String>> {
        let opf = self.parse_opf()?;
        let ncx = self.parse_ncx()?;

        let mut problems =
            opf.check_references(ncx.nav_map.nav_points.iter().map(|point| point.src.as_str()));

        if ncx.uid != opf.metadata.identifier {
            problems.push(format!(
                "NCX标识符与OPF不一致: {} != {}",
                ncx.uid, opf.metadata.identifier
            ));
        }

        let files = self.list_files()?;
        for item in opf.manifest.items() {
            let full_path = self.resolve_path(&item.href)?;
            if !files.contains(&full_path) {
                problems.push(format!("清单中的文件不存在: {}", full_path));
            }
        }

        Ok(problems)
    }
}
