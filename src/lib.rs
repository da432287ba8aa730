//! `dma-watch` library crate.
//!
//! The binary (`dma`) is a thin wrapper around this library so that:
//!
//! - core logic (CSV filtering, threshold statistics) is testable without
//!   spawning processes
//! - modules are reusable (e.g., a future web front-end or daemon)
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod store;
