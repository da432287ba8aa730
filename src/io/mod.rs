//! Input/output helpers.
//!
//! - CSV ingest + overnight-window filtering (`ingest`)
//! - readings CSV / summary JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
