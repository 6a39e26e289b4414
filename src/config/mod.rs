// src/config/mod.rs

//! Configuration loading and validation for jobman.
//!
//! Responsibilities:
//! - Define the run options data model (`model.rs`).
//! - Turn CLI flags into options and read job definitions (`loader.rs`).
//! - Validate option invariants like a positive poll interval (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_forest, load_forest_from_files, load_forest_from_reader};
pub use model::{
    ForestOptions, OutputOptions, RawRunConfig, RunConfig, RunnerOptions, SchedulerOptions,
};
pub use validate::validate_raw_config;
