pub mod document;
pub mod render;

#[cfg(test)]
pub mod fixtures;

pub use document::PdfDocument;
pub use render::{PdfiumRasterizer, Rasterizer};
