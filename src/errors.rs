// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Everything in [`JobmanError`] is a configuration-time failure: it is
//! raised before any job starts. Job failures are not errors; they live in
//! the job state model.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobmanError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("line {line}: dependency at depth {depth} has no preceding job at depth {}", .depth - 1)]
    DanglingDependency { line: usize, depth: usize },

    #[error("line {line}: dependency depth {depth} exceeds the supported maximum of {max}")]
    DepthExceeded { line: usize, depth: usize, max: usize },

    #[error("line {line}: job definition has no command")]
    EmptyCommand { line: usize },

    #[error("cannot read job definitions from {path:?}: {source}")]
    InputError {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobmanError>;
