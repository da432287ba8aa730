//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during threshold computation
//! - exported to JSON/CSV
//! - rendered by the terminal report

use std::path::PathBuf;

use serde::Serialize;

/// A single validated meter reading that passed the overnight-window filter.
///
/// `timestamp` is kept as the raw `DD/MM/YYYY HH:mm` text from the CSV so
/// that downstream display and grouping operate on exactly what the meter
/// export contained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReading {
    /// Raw timestamp text, exactly as it appeared in the CSV.
    pub timestamp: String,
    /// Flow in m³/h. Always finite and non-NaN.
    pub flow: f64,
}

/// The lowest flow recorded on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMinimum {
    /// Date key (`DD/MM/YYYY`), taken literally from the reading timestamps.
    pub date: String,
    pub min_flow: f64,
}

/// Output of the threshold calculation.
///
/// `mean_of_daily_minimums` and `threshold` are rounded to 2 decimal places
/// for reporting; the threshold is derived from the unrounded mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSummary {
    pub mean_of_daily_minimums: f64,
    /// Leak-alert boundary: 130% of the mean of daily minimums.
    pub threshold: f64,
    /// One entry per distinct date, in first-seen order.
    pub daily_minimums: Vec<DailyMinimum>,
    /// Wall-clock stamp of when the summary was computed (display string).
    pub computed_at: String,
}

/// Inclusive hour range selecting the low-usage sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    /// The standard overnight window: 01:00 through 04:59.
    pub const OVERNIGHT: HourWindow = HourWindow { start: 1, end: 4 };

    /// Whether `hour` falls inside the window (inclusive on both ends).
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour <= self.end
    }

    /// Human-readable label, e.g. `01:00-04:59`.
    pub fn display_label(&self) -> String {
        format!("{:02}:00-{:02}:59", self.start, self.end)
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        HourWindow::OVERNIGHT
    }
}

/// Resolved configuration for a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub csv_path: PathBuf,
    pub window: HourWindow,
    /// Export the filtered readings to CSV.
    pub export_readings: Option<PathBuf>,
    /// Export the threshold summary to JSON.
    pub export_summary: Option<PathBuf>,
}
