//! FireTools CLI - Command-line tool for PAK containers and Phyre archives.
//!
//! This is the main entry point for the FireTools command-line application.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use firetools::phyre::ArchiveHeader;
use firetools::prelude::*;

/// FireTools - PAK container and Phyre archive extraction tool
#[derive(Parser)]
#[command(name = "firetools")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pages and files of a PAK container
    PakList {
        /// Path to the PAK file
        #[arg(short, long, env = "FIRETOOLS_PAK")]
        pak: PathBuf,

        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Show offsets and class names
        #[arg(short, long)]
        detailed: bool,
    },

    /// Export VRAM_DESC textures of a PAK container as DDS files
    PakTextures {
        /// Path to the PAK file
        #[arg(short, long, env = "FIRETOOLS_PAK")]
        pak: PathBuf,

        /// Output directory
        #[arg(short, long, env = "FIRETOOLS_OUTPUT")]
        output: PathBuf,

        /// Filter pattern for resource names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the header, classes and instance lists of a Phyre archive
    PhyreInfo {
        /// Path to the Phyre file
        #[arg(short, long, env = "FIRETOOLS_INPUT")]
        input: PathBuf,

        /// Print class declarations
        #[arg(short, long)]
        classes: bool,

        /// Dump the class graph as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time()
                .compact(),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()?;

    match cli.command {
        Commands::PakList { pak, filter, detailed } => {
            cmd_pak_list(&pak, filter.as_deref(), detailed)?;
        }
        Commands::PakTextures { pak, output, filter } => {
            cmd_pak_textures(&pak, &output, filter.as_deref())?;
        }
        Commands::PhyreInfo { input, classes, json } => {
            cmd_phyre_info(&input, classes, json)?;
        }
    }

    Ok(())
}

fn cmd_pak_list(pak_path: &Path, filter: Option<&str>, detailed: bool) -> Result<()> {
    let pattern = filter.map(Pattern::new).transpose().context("Invalid filter pattern")?;
    let archive = PakArchive::open(pak_path)
        .with_context(|| format!("Failed to open PAK container {}", pak_path.display()))?;

    println!("Path: {}", pak_path.display());
    println!("Page count: {}", archive.pages().len());

    let mut count = 0;
    for page in archive.pages() {
        println!(
            "Page {}: offset {:#x}, {} files, {} bytes",
            page.index(),
            page.offset(),
            page.files_count(),
            page.total_files_size()
        );

        for file in page.files() {
            if !glob_match(pattern.as_ref(), file.name()) {
                continue;
            }

            if detailed {
                println!(
                    "  {:>4} {:>12} {:#010x} {:#010x} {:<16} {}",
                    file.index(),
                    file.size(),
                    file.header_global_offset(),
                    file.payload_global_offset(),
                    file.class_name(),
                    file.name()
                );
            } else {
                println!("  {:>12} {}", file.size(), file.name());
            }
            count += 1;
        }
    }

    println!("\nTotal: {} files", count);

    Ok(())
}

fn cmd_pak_textures(pak_path: &Path, output: &Path, filter: Option<&str>) -> Result<()> {
    let pattern = filter.map(Pattern::new).transpose().context("Invalid filter pattern")?;

    let start = Instant::now();
    let archive = PakArchive::open(pak_path)
        .with_context(|| format!("Failed to open PAK container {}", pak_path.display()))?;
    info!(
        pages = archive.pages().len(),
        files = archive.total_files_count(),
        elapsed = ?start.elapsed(),
        "loaded container"
    );

    let resources: Vec<ResourceDescriptor> = archive
        .resources()
        .collect::<firetools::pak::Result<Vec<_>>>()
        .context("Failed to read resource descriptors")?
        .into_iter()
        .filter(|desc| glob_match(pattern.as_ref(), &desc.name))
        .collect();

    info!(count = resources.len(), output = %output.display(), "exporting textures");

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let pb = ProgressBar::new(resources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut exported = 0;
    let mut errors = 0;

    for desc in &resources {
        let output_path = output.join(texture_file_name(desc));

        match export_texture(&archive, desc, &output_path) {
            Ok(()) => exported += 1,
            Err(e) => {
                pb.suspend(|| warn!(texture = %desc.name, "export failed: {e:#}"));
                errors += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    info!(exported, errors, elapsed = ?start.elapsed(), "export finished");

    Ok(())
}

fn export_texture(archive: &PakArchive, desc: &ResourceDescriptor, output_path: &Path) -> Result<()> {
    let format = TextureFormat::from_code(desc.format_code());
    if let TextureFormat::Unknown(code) = format {
        warn!(texture = %desc.name, code, "unknown texture format, exporting as DXT1");
    }

    let raw = archive.read_resource(desc)?;
    let linear = format
        .linearize(raw, desc.width(), desc.height(), desc.mip_count())
        .context("Failed to untile texture")?;

    let texture = DdsTexture {
        width: desc.width(),
        height: desc.height(),
        mip_count: desc.mip_count(),
        format,
        data: &linear,
    };

    let file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    texture.write_to(std::io::BufWriter::new(file))?;

    Ok(())
}

/// `<dir>.<w>_<h>_page<p>_file<f>_fmt<code>.dds`, where `<dir>` is the last
/// directory component of the resource name.
fn texture_file_name(desc: &ResourceDescriptor) -> String {
    let mut components = desc.name.rsplit(['/', '\\']).filter(|c| !c.is_empty());
    let file_name = components.next().unwrap_or("texture");
    let dir_name = components.next().unwrap_or_else(|| file_stem(file_name));

    format!(
        "{}.{}_{}_page{}_file{}_fmt{}.dds",
        dir_name,
        desc.width(),
        desc.height(),
        desc.page,
        desc.file,
        desc.format_code()
    )
}

fn file_stem(name: &str) -> &str {
    name.split('.').next().filter(|s| !s.is_empty()).unwrap_or("texture")
}

fn cmd_phyre_info(input: &Path, classes: bool, json: bool) -> Result<()> {
    let archive = PhyreArchive::open(input)
        .with_context(|| format!("Failed to open Phyre archive {}", input.display()))?;
    let graph = archive.type_graph();

    if json {
        let dump = serde_json::to_string_pretty(graph).context("Failed to serialize class graph")?;
        println!("{dump}");
        return Ok(());
    }

    let header = archive.header();
    let base = header.base();
    let variant = match header {
        ArchiveHeader::Base(_) => "base",
        ArchiveHeader::Dx11(_) => "DX11",
    };

    println!("Path: {}", input.display());
    println!("Platform: {} ({} header, {} bytes)", header.platform(), variant, base.size.get());
    println!("Objects table size: {}", base.objects_table_size.get());
    println!("Total data size: {}", base.total_data_size.get());
    if let ArchiveHeader::Dx11(dx11) = header {
        println!(
            "Index buffer: {}, vertex buffer: {}, max texture mip buffer: {}",
            dx11.index_buffer_size.get(),
            dx11.vertex_buffer_size.get(),
            dx11.max_texture_mip_buffer_size.get()
        );
    }
    println!("Types: {}, classes: {}", graph.types().len(), graph.classes().len());

    for diagnostic in archive.diagnostics() {
        println!("Warning: {diagnostic}");
    }

    if classes {
        println!();
        print!("{}", ClassDeclarationWriter::new(graph).write_all());
    }

    println!("\nInstance lists: {}", archive.instance_lists().len());
    for list in archive.instance_lists() {
        let class_name = match archive.instance_class(list) {
            Ok(id) => graph.classes()[id.0].name.as_str(),
            Err(_) => "?",
        };
        println!(
            "  {:>8} x {:<32} objects {} bytes, arrays {} bytes",
            list.count.get(),
            class_name,
            list.objects_size.get(),
            list.arrays_size.get()
        );
    }

    Ok(())
}

/// Case-insensitive glob filtering; no pattern matches everything.
fn glob_match(pattern: Option<&Pattern>, name: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    pattern.map_or(true, |p| p.matches_with(name, options))
}
