//! Command-line parsing for the DMA night-flow analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the filtering/statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dma", version, about = "DMA Night-Flow Leak Threshold Analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter a meter-export CSV, print the readings table and the threshold summary.
    Analyze(AnalyzeArgs),
    /// Print the threshold summary only (useful for scripting).
    Summary(AnalyzeArgs),
}

/// Common options for analysis.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Meter-export CSV. When omitted, an interactive picker lists CSV files
    /// found under the current directory.
    pub file: Option<PathBuf>,

    /// First hour (0-23) of the sampling window, inclusive.
    #[arg(long, default_value_t = 1)]
    pub window_start: u32,

    /// Last hour (0-23) of the sampling window, inclusive.
    #[arg(long, default_value_t = 4)]
    pub window_end: u32,

    /// Export the filtered readings to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the threshold summary to JSON.
    #[arg(long = "export-summary")]
    pub export_summary: Option<PathBuf>,
}
