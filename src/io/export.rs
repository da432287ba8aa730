//! Export filtered readings and the threshold summary.
//!
//! The readings CSV is meant to be easy to consume in spreadsheets; the
//! summary JSON is the portable record of one analysis run.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{AnalyzeConfig, FlowReading, HourWindow, ThresholdSummary};
use crate::error::AppError;

/// Write the filtered readings to a CSV file.
pub fn write_readings_csv(path: &Path, readings: &[FlowReading]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "timestamp,flow_m3h")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in readings {
        writeln!(file, "{},{}", r.timestamp, r.flow)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// On-disk schema of the summary JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryFile<'a> {
    pub tool: &'static str,
    pub source_csv: String,
    pub window: HourWindow,
    pub rows_read: usize,
    pub rows_kept: usize,
    #[serde(flatten)]
    pub summary: &'a ThresholdSummary,
}

/// Write the threshold summary (plus run metadata) as pretty JSON.
pub fn write_summary_json(
    path: &Path,
    summary: &ThresholdSummary,
    config: &AnalyzeConfig,
    rows_read: usize,
    rows_kept: usize,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display()))
    })?;

    let out = SummaryFile {
        tool: "dma",
        source_csv: config.csv_path.display().to_string(),
        window: config.window,
        rows_read,
        rows_kept,
        summary,
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
