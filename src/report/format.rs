//! Formatted terminal output for an analysis run.
//!
//! We keep formatting code in one place so:
//! - the filter/statistics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AnalyzeConfig, FlowReading, ThresholdSummary};
use crate::io::ingest::{FilteredData, RowError};

/// Max skipped-row notes echoed in the summary before eliding the rest.
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Format the full run summary (ingest stats + per-day minima + threshold).
pub fn format_run_summary(
    ingest: &FilteredData,
    summary: &ThresholdSummary,
    config: &AnalyzeConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== dma - Night-Flow Leak Threshold ===\n");
    out.push_str(&format!("File: {}\n", config.csv_path.display()));
    out.push_str(&format!("Window: {}\n", config.window.display_label()));
    out.push_str(&format!(
        "Rows: read={} | kept={} | skipped={}\n",
        ingest.rows_read,
        ingest.rows_kept,
        ingest.row_errors.len()
    ));

    if let Some(stats) = &ingest.stats {
        out.push_str(&format!(
            "Flow: n={} | [{:.2}, {:.2}] m3/h\n",
            stats.n_readings, stats.flow_min, stats.flow_max
        ));
    }

    if !ingest.row_errors.is_empty() {
        out.push('\n');
        out.push_str(&format_row_errors(&ingest.row_errors));
    }

    out.push_str("\nDaily minimums:\n");
    for d in &summary.daily_minimums {
        out.push_str(&format!("  {}  {:>8.2} m3/h\n", d.date, d.min_flow));
    }

    out.push('\n');
    out.push_str(&format!(
        "Mean of daily minimums: {:.2} m3/h\n",
        summary.mean_of_daily_minimums
    ));
    out.push_str(&format!(
        "Leak threshold (130%):  {:.2} m3/h\n",
        summary.threshold
    ));
    out.push_str(&format!("Computed at: {}\n", summary.computed_at));

    out
}

/// Format the filtered readings as a two-column table.
pub fn format_readings_table(readings: &[FlowReading]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<18} {:>10}\n", "Timestamp", "Flow m3/h"));
    out.push_str(&format!("{:-<18} {:->10}\n", "", ""));
    for r in readings {
        out.push_str(&format!("{:<18} {:>10.2}\n", r.timestamp, r.flow));
    }

    out
}

/// Format skipped-row notes, eliding after `MAX_ROW_ERRORS_SHOWN`.
pub fn format_row_errors(row_errors: &[RowError]) -> String {
    let mut out = String::new();

    for e in row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
        out.push_str(&format!("  (skipped line {}) {}\n", e.line, e.message));
    }
    if row_errors.len() > MAX_ROW_ERRORS_SHOWN {
        out.push_str(&format!(
            "  ... and {} more skipped row(s)\n",
            row_errors.len() - MAX_ROW_ERRORS_SHOWN
        ));
    }

    out
}
