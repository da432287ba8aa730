//! CSV ingest and overnight-window filtering.
//!
//! This module turns a raw meter-export CSV into the clean `FlowReading`
//! sequence the threshold calculation consumes.
//!
//! Design goals:
//! - **Tolerant rows, strict stream**: a CSV that cannot be tokenized at all
//!   is a hard error (exit code 2); individual malformed rows are skipped and
//!   reported, never fatal
//! - **Positional schema**: column 0 is the timestamp, column 2 the flow;
//!   anything else (including extra trailing columns) is ignored
//! - **No reformatting**: kept readings carry the original timestamp text
//! - **Separation of concerns**: no statistics here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{FlowReading, HourWindow};
use crate::error::AppError;

/// A row-level defect encountered during ingest.
///
/// These are informational: the offending row is skipped, the run continues.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based CSV line number (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Min/max flow over the kept readings.
#[derive(Debug, Clone, Copy)]
pub struct ReadingStats {
    pub n_readings: usize,
    pub flow_min: f64,
    pub flow_max: f64,
}

/// Ingest output: filtered readings + row-level diagnostics.
#[derive(Debug, Clone)]
pub struct FilteredData {
    /// Readings inside the window, in original row order.
    pub readings: Vec<FlowReading>,
    pub row_errors: Vec<RowError>,
    /// Data rows seen (header excluded).
    pub rows_read: usize,
    pub rows_kept: usize,
    /// `None` when no readings were kept.
    pub stats: Option<ReadingStats>,
}

/// Open `path` and filter its readings down to the given hour window.
pub fn filter_csv_file(path: &Path, window: &HourWindow) -> Result<FilteredData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    filter_readings(file, window)
}

/// Filter readings from any byte stream.
///
/// An empty result is not an error at this layer; the caller decides whether
/// "no rows in window" should abort the run.
pub fn filter_readings<R: Read>(reader: R, window: &HourWindow) -> Result<FilteredData, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Force the header read up front: a stream the tokenizer cannot segment
    // at all should fail the run, not dribble out as per-row errors.
    csv_reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV header: {e}")))?;

    let mut readings = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // +2: records() starts after the header, CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match classify_row(&record, window) {
            Ok(Some(reading)) => readings.push(reading),
            Ok(None) => {} // outside the window
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_kept = readings.len();
    let stats = compute_stats(&readings);

    Ok(FilteredData {
        readings,
        row_errors,
        rows_read,
        rows_kept,
        stats,
    })
}

/// Validate one data row against the positional schema and hour window.
///
/// `Ok(None)` means the row is well-formed but outside the window;
/// `Err` describes a defect (the row will be skipped and reported).
fn classify_row(record: &StringRecord, window: &HourWindow) -> Result<Option<FlowReading>, String> {
    if record.len() < 3 {
        return Err(format!("Expected at least 3 columns, got {}.", record.len()));
    }

    let timestamp = get_field(record, 0).ok_or("Missing timestamp (column 1).")?;
    let flow_text = get_field(record, 2).ok_or("Missing flow value (column 3).")?;

    let stamp = parse_timestamp(timestamp)?;
    if !window.contains(stamp.hour) {
        return Ok(None);
    }

    let flow: f64 = flow_text
        .parse()
        .map_err(|_| format!("Invalid flow value '{flow_text}'."))?;
    if !flow.is_finite() {
        return Err(format!("Non-finite flow value '{flow_text}'."));
    }

    Ok(Some(FlowReading {
        timestamp: timestamp.to_string(),
        flow,
    }))
}

/// Bounds-checked positional accessor; empty fields count as absent.
fn get_field<'a>(record: &'a StringRecord, idx: usize) -> Option<&'a str> {
    record.get(idx).filter(|s| !s.is_empty())
}

/// Components of a `DD/MM/YYYY HH:mm` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimestampParts {
    day: u32,
    month: u32,
    year: u32,
    hour: u32,
    minute: u32,
}

/// Parse a `DD/MM/YYYY HH:mm` timestamp into its numeric components.
///
/// Deliberately permissive: components may be unpadded, and calendar
/// validity is NOT checked (31/02 passes through, matching the upstream
/// meter-export behavior). Only numeric-ness and basic ranges are enforced:
/// day 1-31, month 1-12, hour 0-23, minute 0-59.
fn parse_timestamp(text: &str) -> Result<TimestampParts, String> {
    let (date_part, time_part) = text
        .split_once(' ')
        .ok_or_else(|| format!("Invalid timestamp '{text}': expected 'DD/MM/YYYY HH:mm'."))?;

    let mut date_fields = date_part.splitn(3, '/');
    let day = parse_component(date_fields.next(), "day", text)?;
    let month = parse_component(date_fields.next(), "month", text)?;
    let year = parse_component(date_fields.next(), "year", text)?;

    let (hour_text, minute_text) = time_part
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("Invalid timestamp '{text}': missing ':' in time."))?;
    let hour = parse_component(Some(hour_text), "hour", text)?;
    let minute = parse_component(Some(minute_text), "minute", text)?;

    if !(1..=31).contains(&day) {
        return Err(format!("Invalid timestamp '{text}': day out of range."));
    }
    if !(1..=12).contains(&month) {
        return Err(format!("Invalid timestamp '{text}': month out of range."));
    }
    if hour > 23 {
        return Err(format!("Invalid timestamp '{text}': hour out of range."));
    }
    if minute > 59 {
        return Err(format!("Invalid timestamp '{text}': minute out of range."));
    }

    Ok(TimestampParts {
        day,
        month,
        year,
        hour,
        minute,
    })
}

fn parse_component(field: Option<&str>, name: &str, text: &str) -> Result<u32, String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| format!("Invalid timestamp '{text}': non-numeric {name}."))
}

fn compute_stats(readings: &[FlowReading]) -> Option<ReadingStats> {
    let first = readings.first()?;
    let mut flow_min = first.flow;
    let mut flow_max = first.flow;

    for r in readings {
        flow_min = flow_min.min(r.flow);
        flow_max = flow_max.max(r.flow);
    }

    Some(ReadingStats {
        n_readings: readings.len(),
        flow_min,
        flow_max,
    })
}
