use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use txtforge::config::DEFAULT_CONFIG_PATH;
use txtforge::cover::media_type_from_extension;
use txtforge::{convert, ConversionRequest, ConvertConfig, ConvertError, CoverInput, Epub, Result};

/// 📚 TxtForge - TXT小说转EPUB工具
#[derive(Parser)]
#[command(name = "txtforge")]
#[command(about = "一个将TXT小说转换为EPUB电子书的Rust工具")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 把TXT文件转换为EPUB
    Convert {
        /// TXT文件路径
        #[arg(help = "要转换的TXT文件路径")]
        txt_file: PathBuf,

        /// 封面图片路径
        #[arg(long, help = "封面图片路径（jpg/png/gif/webp/bmp）")]
        cover: Option<PathBuf>,

        /// 封面媒体类型
        #[arg(long, help = "封面的媒体类型，默认根据扩展名推断")]
        cover_type: Option<String>,

        /// 作者
        #[arg(short, long, help = "作者（文本中声明的“作者：”优先）")]
        author: Option<String>,

        /// 输出目录
        #[arg(short, long, help = "EPUB输出目录，默认与TXT文件相同")]
        output: Option<PathBuf>,

        /// 配置文件
        #[arg(short, long, help = "YAML配置文件路径")]
        config: Option<PathBuf>,
    },

    /// 检查生成的EPUB文件
    Inspect {
        /// EPUB文件路径
        #[arg(help = "要检查的EPUB文件路径")]
        epub_file: PathBuf,

        /// 显示目录
        #[arg(short, long, help = "显示NCX目录")]
        toc: bool,
    },

    /// 生成默认配置文件
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_PATH, help = "配置文件路径")]
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("📚 TxtForge - TXT转EPUB工具");

    let result = match args.command {
        Command::Convert {
            txt_file,
            cover,
            cover_type,
            author,
            output,
            config,
        } => run_convert(&txt_file, cover.as_deref(), cover_type, author, output.as_deref(), config.as_deref()),
        Command::Inspect { epub_file, toc } => run_inspect(&epub_file, toc),
        Command::InitConfig { path } => ConvertConfig::generate_default_config(&path).map(|_| {
            println!("📝 已生成配置文件: {}", path.display());
        }),
    };

    if let Err(e) = result {
        eprintln!("❌ 错误: {}", e);
        std::process::exit(1);
    }
}

fn run_convert(
    txt_file: &Path,
    cover: Option<&Path>,
    cover_type: Option<String>,
    author: Option<String>,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let config = ConvertConfig::load(config)?;

    println!("正在读取TXT文件: {}", txt_file.display());
    let txt_bytes = fs::read(txt_file)?;
    let file_name = txt_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or(ConvertError::MissingInput)?;

    let mut request = ConversionRequest::new(txt_bytes, file_name);

    if let Some(author) = author {
        request = request.with_author(author);
    }

    if let Some(cover_path) = cover {
        println!("🖼️  封面: {}", cover_path.display());
        let media_type = cover_type.or_else(|| {
            media_type_from_extension(&cover_path.to_string_lossy()).map(str::to_string)
        });
        request = request.with_cover(CoverInput::new(fs::read(cover_path)?, media_type));
    }

    let conversion = convert(&request, &config)?;

    let output_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => txt_file.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    fs::create_dir_all(&output_dir)?;
    let output_path = output_dir.join(&conversion.file_name);
    fs::write(&output_path, &conversion.bytes)?;

    println!("  📖 书名: {}", conversion.title);
    println!("  ✍️  作者: {}", conversion.author);
    println!("  🔤 编码: {}", conversion.encoding);
    println!("  📑 章节数: {}", conversion.chapter_count);
    println!("  🖼️  封面: {}", if conversion.has_cover { "有" } else { "无" });
    println!("🎉 已生成: {}", output_path.display());

    Ok(())
}

fn run_inspect(epub_file: &Path, show_toc: bool) -> Result<()> {
    println!("正在检查EPUB文件: {}", epub_file.display());
    let mut epub = Epub::new(epub_file)?;

    let files = epub.list_files()?;
    println!("\n📁 EPUB文件内容: 共 {} 个文件", files.len());

    let opf = epub.parse_opf()?;
    println!("\n📊 元数据:");
    println!("  📖 书名: {}", opf.metadata.title);
    println!("  ✍️  作者: {}", opf.metadata.creator);
    println!("  🌐 语言: {}", opf.metadata.language);
    println!("  🆔 标识符: {}", opf.metadata.identifier);
    println!("  📋 清单项: {}", opf.manifest.len());
    println!("  📑 脊柱项: {}", opf.spine.len());
    if let Some(cover) = opf.get_cover_path() {
        println!("  🖼️  封面: {}", cover);
    }

    if show_toc {
        let ncx = epub.parse_ncx()?;
        println!("\n🌳 目录:");
        for point in &ncx.nav_map.nav_points {
            println!("  {}. {} ({})", point.play_order, point.label, point.src);
        }
    }

    let problems = epub.check()?;
    if problems.is_empty() {
        println!("\n✅ 引用检查通过");
    } else {
        println!("\n⚠️  发现 {} 个问题:", problems.len());
        for problem in &problems {
            println!("  - {}", problem);
        }
    }

    Ok(())
}
