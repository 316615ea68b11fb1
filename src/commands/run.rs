use crate::commands::{render, split};
use crate::config::Layout;
use crate::page_range::PageRangeMap;
use crate::pdf::Rasterizer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stages {
    All,
    SplitOnly,
    RenderOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Completed { detail: String },
    Failed { error: String },
    Skipped,
}

impl StageOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub split: StageOutcome,
    pub listing: StageOutcome,
    pub convert: StageOutcome,
}

impl Default for PipelineReport {
    fn default() -> Self {
        PipelineReport {
            split: StageOutcome::Skipped,
            listing: StageOutcome::Skipped,
            convert: StageOutcome::Skipped,
        }
    }
}

impl PipelineReport {
    pub fn has_failure(&self) -> bool {
        self.stages().iter().any(|(_, outcome)| outcome.is_failed())
    }

    fn stages(&self) -> [(&'static str, &StageOutcome); 3] {
        [
            ("split", &self.split),
            ("listing", &self.listing),
            ("convert", &self.convert),
        ]
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }

        for (name, outcome) in self.stages() {
            match outcome {
                StageOutcome::Completed { detail } => println!("[+] {}: {}", name, detail),
                StageOutcome::Failed { error } => println!("[-] {}: failed: {}", name, error),
                StageOutcome::Skipped => println!("[ ] {}: skipped", name),
            }
        }
        Ok(())
    }
}

fn run_stage<F>(name: &str, stage: F) -> StageOutcome
where
    F: FnOnce() -> Result<String>,
{
    tracing::info!(stage = name, "starting");
    match stage() {
        Ok(detail) => StageOutcome::Completed { detail },
        Err(err) => {
            let error = format!("{:#}", err);
            tracing::error!(stage = name, %error, "stage failed");
            println!("[-] Error: {}", error);
            StageOutcome::Failed { error }
        }
    }
}

/// Names of the entries directly inside `dir`, sorted
pub fn list_outputs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Run the selected stages. The rasterizer is only bound when the convert
/// stage is reached.
///
/// A failing stage is logged once and the stages after it are skipped; the
/// error is recorded in the returned report rather than propagated.
pub fn run<R, F>(
    layout: &Layout,
    mapping: &PageRangeMap,
    dpi: u32,
    stages: Stages,
    bind_rasterizer: F,
) -> PipelineReport
where
    R: Rasterizer,
    F: FnOnce() -> Result<R>,
{
    let mut report = PipelineReport::default();

    if stages != Stages::RenderOnly {
        report.split = run_stage("split", || {
            let summary = split::run(&layout.source, mapping, &layout.dest)?;
            Ok(format!(
                "{} file(s), {} page(s)",
                summary.outputs.len(),
                summary.page_total()
            ))
        });

        if stages == Stages::SplitOnly || !report.split.is_completed() {
            return report;
        }

        report.listing = run_stage("listing", || {
            let names = list_outputs(&layout.dest)?;
            tracing::debug!(files = ?names, "destination contents");
            Ok(format!("{} file(s) in {}", names.len(), layout.dest.display()))
        });

        if !report.listing.is_completed() {
            return report;
        }
    }

    report.convert = run_stage("convert", || {
        let rasterizer = bind_rasterizer()?;
        let summary =
            render::convert_pdf_to_images(&rasterizer, &layout.source, &layout.images_dir, dpi)?;
        Ok(format!("{} image(s)", summary.images.len()))
    });

    report
}
