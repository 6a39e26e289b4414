// src/exec/shell.rs

//! Production launcher: runs each job command through the platform shell.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::exec::backend::{ProcessHandle, ProcessLauncher};
use crate::forest::JobId;

/// Exit code reported when a process terminated without a code or a signal.
const UNKNOWN_EXIT_CODE: i32 = 1;

/// Launches job commands with `sh -c` (or `cmd /C` on Windows).
///
/// Children inherit stdout/stderr so job output reaches the terminal
/// directly; stdin is closed because job definitions may have been read
/// from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLauncher;

impl ShellLauncher {
    pub fn new() -> Self {
        ShellLauncher
    }
}

impl ProcessLauncher for ShellLauncher {
    fn launch(&mut self, id: JobId, command: &str) -> Result<Box<dyn ProcessHandle>> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd
            .spawn()
            .with_context(|| format!("spawning shell for job {id}: {command}"))?;

        debug!(job = %id, pid = child.id(), "spawned job process");

        Ok(Box::new(ShellProcess { child }))
    }
}

/// A running `sh -c` child.
#[derive(Debug)]
pub struct ShellProcess {
    child: Child,
}

impl ProcessHandle for ShellProcess {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    fn try_exit_code(&mut self) -> Result<Option<i32>> {
        let status = self
            .child
            .try_wait()
            .context("polling job process status")?;
        Ok(status.map(exit_code_of))
    }
}

/// Map an exit status to a single integer the way shells do: a process
/// killed by signal N reports `128 + N`.
fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(UNKNOWN_EXIT_CODE)
}
