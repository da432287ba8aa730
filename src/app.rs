//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments (with a default-subcommand rewrite)
//! - resolves the input CSV (argument or interactive picker)
//! - runs the filter + threshold pipeline
//! - prints the readings table and summary
//! - writes optional exports and waits on the background save

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, picker};
use crate::domain::{AnalyzeConfig, HourWindow};
use crate::error::AppError;
use crate::store::{self, NoopStore};

pub mod pipeline;

/// Entry point for the `dma` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dma export.csv` and bare `dma` to behave like `dma analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the one-argument UX meter operators are used to.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args, OutputMode::Full),
        Command::Summary(args) => handle_analyze(args, OutputMode::SummaryOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    SummaryOnly,
}

fn handle_analyze(args: AnalyzeArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analyze_config_from_args(&args)?;
    let run = pipeline::run_analysis(&config)?;

    // Start the save while the report renders; it must never block output.
    let save = store::spawn_save(NoopStore, run.ingest.readings.clone());

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_readings_table(&run.ingest.readings));
    }
    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.summary, &config)
    );

    // Optional exports.
    if let Some(path) = &config.export_readings {
        crate::io::export::write_readings_csv(path, &run.ingest.readings)?;
    }
    if let Some(path) = &config.export_summary {
        crate::io::export::write_summary_json(
            path,
            &run.summary,
            &config,
            run.ingest.rows_read,
            run.ingest.rows_kept,
        )?;
    }

    // A failed save never alters the computed summary or the exit code, but
    // it is reported rather than silently discarded.
    if let Err(err) = save.wait() {
        eprintln!("warning: failed to save readings: {err}");
    }

    Ok(())
}

/// Resolve CLI arguments into a validated run configuration.
pub fn analyze_config_from_args(args: &AnalyzeArgs) -> Result<AnalyzeConfig, AppError> {
    let window = window_from_args(args.window_start, args.window_end)?;

    let csv_path = match &args.file {
        Some(path) => picker::validate_csv_path(path)?,
        None => picker::prompt_for_csv_path()?,
    };

    Ok(AnalyzeConfig {
        csv_path,
        window,
        export_readings: args.export.clone(),
        export_summary: args.export_summary.clone(),
    })
}

fn window_from_args(start: u32, end: u32) -> Result<HourWindow, AppError> {
    if start > 23 || end > 23 {
        return Err(AppError::new(
            2,
            format!("Window hours must be 0-23 (got {start}-{end})."),
        ));
    }
    if start > end {
        return Err(AppError::new(
            2,
            format!("Window start must not exceed window end (got {start}-{end})."),
        ));
    }
    Ok(HourWindow { start, end })
}

/// Insert the default `analyze` subcommand when the user omitted one.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "summary");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "analyze".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_analyze() {
        assert_eq!(rewrite_args(argv(&["dma"])), argv(&["dma", "analyze"]));
    }

    #[test]
    fn file_argument_gets_analyze_inserted() {
        assert_eq!(
            rewrite_args(argv(&["dma", "export.csv"])),
            argv(&["dma", "analyze", "export.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["dma", "summary", "export.csv"])),
            argv(&["dma", "summary", "export.csv"])
        );
        assert_eq!(rewrite_args(argv(&["dma", "--help"])), argv(&["dma", "--help"]));
    }

    #[test]
    fn window_validation_rejects_bad_ranges() {
        assert!(window_from_args(1, 4).is_ok());
        assert!(window_from_args(0, 23).is_ok());
        assert!(window_from_args(5, 4).is_err());
        assert!(window_from_args(1, 24).is_err());
    }
}
