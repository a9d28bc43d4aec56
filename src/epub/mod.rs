pub mod container;
pub mod ncx;
pub mod opf;
pub mod reader;
pub mod writer;
mod xml;

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出EPUB打包与读取
pub use reader::Epub;
pub use writer::{ChapterDocument, PackageAssembler, RenderedBook, EPUB_MIMETYPE};

// 重新导出OPF相关
pub use opf::{GuideReference, Manifest, ManifestItem, Metadata, Opf, SpineItem};

// 重新导出NCX相关
pub use ncx::{NavMap, NavPoint, Ncx};
