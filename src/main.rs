mod cli;
mod commands;
mod config;
mod page_range;
mod pdf;

use clap::Parser;
use cli::{Cli, Commands};
use commands::run::Stages;
use config::Config;
use pdf::PdfiumRasterizer;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_splitter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let strict = cli.strict;

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), "invalid configuration");
            println!("[-] Error: {:#}", err);
            return exit_code(strict, true);
        }
    };

    let stages = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => Stages::All,
        Commands::Split => Stages::SplitOnly,
        Commands::Render => Stages::RenderOnly,
    };

    let report = commands::run::run(
        &config.layout,
        &config.mapping,
        config.dpi,
        stages,
        || PdfiumRasterizer::bind(config.pdfium_dir.as_deref()),
    );

    if let Err(err) = report.print(config.json) {
        tracing::error!(error = %err, "failed to print report");
    }

    exit_code(config.strict, report.has_failure())
}

fn exit_code(strict: bool, failed: bool) -> ExitCode {
    ExitCode::from(exit_status(strict, failed))
}

/// Failures only change the exit status in strict mode
fn exit_status(strict: bool, failed: bool) -> u8 {
    if strict && failed {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_stage_exits_zero_by_default() {
        assert_eq!(exit_status(false, true), 0);
        assert_eq!(exit_status(false, false), 0);
    }

    #[test]
    fn test_strict_failed_stage_exits_one() {
        assert_eq!(exit_status(true, true), 1);
        assert_eq!(exit_status(true, false), 0);
    }

    #[test]
    fn test_missing_destination_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("source")).unwrap();
        pdf::fixtures::write_marked_pdf(&dir.path().join("source"), "nominees.pdf", 5);
        let cli = Cli::try_parse_from([
            "pdf-splitter",
            "--base-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = Config::from_cli(&cli).unwrap();

        let report = commands::run::run(
            &config.layout,
            &config.mapping,
            config.dpi,
            Stages::All,
            || Ok(pdf::fixtures::FakeRasterizer),
        );

        assert!(report.has_failure());
        assert_eq!(exit_status(config.strict, report.has_failure()), 0);
        assert_eq!(exit_status(true, report.has_failure()), 1);
    }
}
