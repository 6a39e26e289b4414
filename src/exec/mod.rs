// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually starting the job commands and
//! answering "has it exited yet?" without blocking the run loop.
//!
//! - [`backend`] provides the `ProcessLauncher` / `ProcessHandle` traits that
//!   the scheduler talks to, and which tests replace with a fake.
//! - [`shell`] contains `ShellLauncher`, the production implementation built
//!   on `tokio::process::Command`.

pub mod backend;
pub mod shell;

pub use backend::{ProcessHandle, ProcessLauncher};
pub use shell::{ShellLauncher, ShellProcess};

/// Exit code recorded for a job whose command could not be started, or
/// whose status could not be polled. Matches the shell's "command not
/// found" status.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 127;
