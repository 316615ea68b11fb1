use crate::page_range::PageRangeMap;
use crate::pdf::PdfDocument;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct SplitOutput {
    pub index: u32,
    pub path: PathBuf,
    /// Zero-based source pages, in order
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub outputs: Vec<SplitOutput>,
    /// Index of the last output written
    pub last_index: u32,
}

impl SplitSummary {
    pub fn page_total(&self) -> usize {
        self.outputs.iter().map(|output| output.pages.len()).sum()
    }
}

pub fn output_file_name(index: u32, extension: &str) -> String {
    format!("page_{}{}", index, extension)
}

/// Split `doc` into one PDF per mapping entry inside `output_dir`.
///
/// The mapping is checked against the page count before anything is
/// written. Every entry produces a file, including empty ranges.
pub fn split_pdf(doc: &PdfDocument, mapping: &PageRangeMap, output_dir: &Path) -> Result<SplitSummary> {
    if !output_dir.is_dir() {
        anyhow::bail!(
            "Destination directory does not exist: {}",
            output_dir.display()
        );
    }

    let total_pages = doc.page_count();
    mapping
        .validate(total_pages)
        .with_context(|| format!("Page range mapping does not fit {}", doc.path.display()))?;

    // One page list per output, allocated before any page is placed
    let mut assignments: Vec<Vec<u32>> = vec![Vec::new(); mapping.len()];
    for page in 0..total_pages {
        let index = mapping
            .target_of(page)
            .ok_or_else(|| anyhow!("Page {} is not covered by the page range mapping", page))?;
        assignments[(index - mapping.first_index()) as usize].push(page);
        tracing::debug!(page, output = index, "assigned page");
        println!("Page {} added to PDF {}", page, index);
    }

    let extension = doc.extension();
    let mut outputs = Vec::with_capacity(mapping.len());

    for ((index, span), pages) in mapping.iter().zip(assignments) {
        if span.is_empty() {
            tracing::warn!(output = index, "empty page range, writing a PDF with no pages");
        }

        let file_name = output_file_name(index, &extension);
        let path = output_dir.join(&file_name);

        let mut new_doc = doc.extract_pages(&pages)?;
        PdfDocument::save(&mut new_doc, &path)?;
        println!("[+] PDF {} saved to {}", index, file_name);

        outputs.push(SplitOutput { index, path, pages });
    }

    Ok(SplitSummary {
        outputs,
        last_index: mapping.last_index(),
    })
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    mapping: &PageRangeMap,
    output_dir: Q,
) -> Result<SplitSummary> {
    let output_dir = output_dir.as_ref();
    let doc = PdfDocument::open(&input)?;
    let summary = split_pdf(&doc, mapping, output_dir)?;

    println!(
        "Split {} pages into {} file(s) in {}",
        summary.page_total(),
        summary.outputs.len(),
        output_dir.display()
    );

    Ok(summary)
}
