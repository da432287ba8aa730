//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run configuration (`AnalyzeConfig`, `HourWindow`)
//! - validated meter readings (`FlowReading`)
//! - threshold outputs (`DailyMinimum`, `ThresholdSummary`)

pub mod types;

pub use types::*;
