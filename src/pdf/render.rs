use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// PDF user space has 72 units per inch
const POINTS_PER_INCH: f32 = 72.0;

/// Renders the pages of a PDF file to bitmaps.
///
/// Pages are handed to `on_page` one at a time, in page order, with their
/// zero-based index. Returns the number of pages rendered.
pub trait Rasterizer {
    fn rasterize(
        &self,
        path: &Path,
        dpi: f32,
        on_page: &mut dyn FnMut(u32, DynamicImage) -> Result<()>,
    ) -> Result<u32>;
}

/// Rasterizer backed by the PDFium library
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to PDFium, trying `lib_dir` first, then `./`, `/opt/pdfium/lib`
    /// and finally the system library path.
    pub fn bind(lib_dir: Option<&Path>) -> Result<Self> {
        let mut candidates: Vec<PathBuf> = lib_dir.map(Path::to_path_buf).into_iter().collect();
        candidates.push(PathBuf::from("./"));
        candidates.push(PathBuf::from("/opt/pdfium/lib"));

        let bindings = match candidates.iter().find_map(|dir| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)).ok()
        }) {
            Some(bindings) => bindings,
            None => Pdfium::bind_to_system_library()
                .map_err(|e| anyhow!("Failed to initialize PDFium: {}", e))?,
        };

        tracing::debug!("bound PDFium library");
        Ok(PdfiumRasterizer {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        path: &Path,
        dpi: f32,
        on_page: &mut dyn FnMut(u32, DynamicImage) -> Result<()>,
    ) -> Result<u32> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| anyhow!("Failed to load PDF {}: {}", path.display(), e))?;

        let config = PdfRenderConfig::new()
            .scale_page_by_factor(dpi / POINTS_PER_INCH)
            .render_form_data(true)
            .render_annotations(true);

        let mut rendered = 0;
        for (index, page) in document.pages().iter().enumerate() {
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| anyhow!("Failed to render page {}: {}", index, e))?;
            let image = bitmap.as_image();
            tracing::debug!(
                page = index,
                width = image.width(),
                height = image.height(),
                "rendered page"
            );

            on_page(index as u32, image)
                .with_context(|| format!("Failed to handle rendered page {}", index))?;
            rendered += 1;
        }

        Ok(rendered)
    }
}
