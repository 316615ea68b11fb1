use crate::pdf::Rasterizer;
use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    pub images: Vec<PathBuf>,
}

pub fn image_file_name(index: u32) -> String {
    format!("page_{}.png", index)
}

/// Render every page of `source` to `images_dir/page_{i}.png`.
///
/// Existing files with the same names are overwritten.
pub fn convert_pdf_to_images(
    rasterizer: &dyn Rasterizer,
    source: &Path,
    images_dir: &Path,
    dpi: u32,
) -> Result<ConvertSummary> {
    if !images_dir.is_dir() {
        anyhow::bail!("Images directory does not exist: {}", images_dir.display());
    }

    let mut images = Vec::new();
    rasterizer
        .rasterize(source, dpi as f32, &mut |index: u32, image: DynamicImage| -> Result<()> {
            let path = images_dir.join(image_file_name(index));
            image
                .save_with_format(&path, ImageFormat::Png)
                .with_context(|| format!("Failed to write image: {}", path.display()))?;
            println!("[+] Image {} saved.", index);
            images.push(path);
            Ok(())
        })
        .with_context(|| format!("Failed to convert {} to images", source.display()))?;

    println!("[+] All images saved.");
    Ok(ConvertSummary { images })
}
