use crate::cli::Cli;
use crate::page_range::PageRangeMap;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "source/nominees.pdf";
pub const DEFAULT_DEST: &str = "dest";
pub const DEFAULT_IMAGES_DIR: &str = "images_dir";
pub const DEFAULT_RANGES: &str = "0-1,1-2,2-3,3-4,4-5";
pub const DEFAULT_DPI: u32 = 500;

/// Where the source is read from and where outputs go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub images_dir: PathBuf,
}

impl Layout {
    /// Resolve relative paths against `base`; absolute paths are kept
    pub fn resolve(base: &Path, source: &Path, dest: &Path, images_dir: &Path) -> Self {
        Layout {
            source: base.join(source),
            dest: base.join(dest),
            images_dir: base.join(images_dir),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub layout: Layout,
    pub mapping: PageRangeMap,
    pub dpi: u32,
    pub pdfium_dir: Option<PathBuf>,
    pub json: bool,
    pub strict: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base = match &cli.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let layout = Layout::resolve(&base, &cli.source, &cli.dest, &cli.images_dir);

        let mapping = match &cli.mapping_file {
            Some(file) => PageRangeMap::from_json_file(base.join(file))?,
            None => PageRangeMap::parse(&cli.ranges)
                .with_context(|| format!("Invalid --ranges value: {}", cli.ranges))?,
        };

        Ok(Config {
            layout,
            mapping,
            dpi: cli.dpi,
            pdfium_dir: cli.pdfium_dir.as_ref().map(|dir| base.join(dir)),
            json: cli.json,
            strict: cli.strict,
        })
    }
}
