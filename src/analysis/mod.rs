//! Threshold statistics over filtered readings.

pub mod threshold;

pub use threshold::*;
