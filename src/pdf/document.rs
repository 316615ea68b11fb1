use anyhow::{Context, Result};
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page object IDs in page order (lopdf numbers pages from 1)
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Extension of the source file including the dot, or "" if it has none
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Build a new document holding the zero-based pages in `indices`.
    ///
    /// An empty slice yields a valid document with no pages.
    pub fn extract_pages(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();

        for &index in indices {
            if index >= total {
                anyhow::bail!("Page index {} is out of range (0-{})", index, total);
            }
        }

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .iter()
            .map(|(num, _)| *num)
            .filter(|num| !indices.contains(&(num - 1)))
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }
        new_doc.prune_objects();

        Ok(new_doc)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}
