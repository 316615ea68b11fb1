use crate::config::{DEFAULT_DEST, DEFAULT_DPI, DEFAULT_IMAGES_DIR, DEFAULT_RANGES, DEFAULT_SOURCE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-splitter")]
#[command(about = "Split a PDF by page ranges and render its pages to PNG")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory that relative paths are resolved against [default: current directory]
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// PDF file to split and render
    #[arg(long, global = true, default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Existing directory that receives the split PDFs
    #[arg(long, global = true, default_value = DEFAULT_DEST)]
    pub dest: PathBuf,

    /// Existing directory that receives the PNG images
    #[arg(long, global = true, default_value = DEFAULT_IMAGES_DIR)]
    pub images_dir: PathBuf,

    /// Page ranges per output file, zero-based and end-exclusive (e.g., "0-3,3-5" or "0:0-3,1:3-5")
    #[arg(long, global = true, default_value = DEFAULT_RANGES)]
    pub ranges: String,

    /// JSON file mapping output index to [start, end); overrides --ranges
    #[arg(long, global = true)]
    pub mapping_file: Option<PathBuf>,

    /// Rendering resolution
    #[arg(long, global = true, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: u32,

    /// Directory containing the PDFium library
    #[arg(long, global = true)]
    pub pdfium_dir: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Exit with a failure status if any stage fails
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Split the source, list the destination, then render the source (default)
    Run,

    /// Only split the source into page-range PDFs
    #[command(alias = "burst")]
    Split,

    /// Only render the source pages to PNG images
    #[command(alias = "images")]
    Render,
}
