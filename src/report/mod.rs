// src/report/mod.rs

//! End-of-run reporting.
//!
//! - [`summary`] aggregates the finished job list into the run's canonical
//!   result (total, zero-exit count, worst exit code, wall-clock time).
//! - [`writer`] renders the optional per-job report and re-run files.

pub mod summary;
pub mod writer;

pub use summary::RunSummary;
pub use writer::{render_report, render_rerun_file, write_report, write_rerun_file};
