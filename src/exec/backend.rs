// src/exec/backend.rs

//! Pluggable process launching.
//!
//! The scheduler talks to a [`ProcessLauncher`] instead of spawning
//! processes itself. This makes it easy to swap in a fake launcher in tests
//! while keeping the production implementation in [`shell`](super::shell).
//!
//! - A launcher starts one command and hands back a [`ProcessHandle`].
//! - A handle is polled without blocking until it reports an exit code.

use std::fmt::Debug;

use anyhow::Result;

use crate::forest::JobId;

/// Handle to one launched job process.
///
/// Owned by the job while it is running and dropped once an exit code has
/// been observed.
pub trait ProcessHandle: Send + Debug {
    /// OS process id, if the backend has one.
    fn pid(&self) -> Option<u32>;

    /// Non-blocking completion check.
    ///
    /// Returns `Ok(None)` while the process is still running and
    /// `Ok(Some(code))` once it has terminated.
    fn try_exit_code(&mut self) -> Result<Option<i32>>;
}

/// Trait abstracting how job commands are started.
///
/// Production code uses [`ShellLauncher`](super::ShellLauncher); tests can
/// provide their own implementation that doesn't spawn real processes.
pub trait ProcessLauncher {
    /// Start `command` for job `id`.
    ///
    /// An `Err` means the command could not be started at all; the scheduler
    /// records the job as failed with [`LAUNCH_FAILURE_EXIT_CODE`](super::LAUNCH_FAILURE_EXIT_CODE).
    fn launch(&mut self, id: JobId, command: &str) -> Result<Box<dyn ProcessHandle>>;
}
