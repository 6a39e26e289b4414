use std::collections::{HashMap, HashSet};

use anyhow::bail;
use jobman::exec::{ProcessHandle, ProcessLauncher};
use jobman::forest::JobId;

/// Scripted behaviour for one command.
#[derive(Debug, Clone, Copy)]
struct Script {
    exit_code: i32,
    /// Completion polls that still report "running" before the exit code.
    polls: usize,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            exit_code: 0,
            polls: 0,
        }
    }
}

/// A fake launcher that:
/// - records which jobs were started, in order
/// - hands out processes that exit with a scripted code after a scripted
///   number of polls (default: code 0 on the first poll)
/// - can refuse to start selected commands
#[derive(Debug, Default)]
pub struct FakeLauncher {
    scripts: HashMap<String, Script>,
    unlaunchable: HashSet<String>,
    launched: Vec<(JobId, String)>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `command` exits with `code`.
    pub fn exit_code(mut self, command: &str, code: i32) -> Self {
        self.scripts.entry(command.to_string()).or_default().exit_code = code;
        self
    }

    /// `command` keeps running for `polls` completion checks.
    pub fn polls(mut self, command: &str, polls: usize) -> Self {
        self.scripts.entry(command.to_string()).or_default().polls = polls;
        self
    }

    /// `command` cannot be started at all.
    pub fn unlaunchable(mut self, command: &str) -> Self {
        self.unlaunchable.insert(command.to_string());
        self
    }

    pub fn launched_commands(&self) -> Vec<&str> {
        self.launched.iter().map(|(_, cmd)| cmd.as_str()).collect()
    }

    pub fn launched_ids(&self) -> Vec<JobId> {
        self.launched.iter().map(|(id, _)| *id).collect()
    }

    pub fn was_launched(&self, command: &str) -> bool {
        self.launched.iter().any(|(_, cmd)| cmd == command)
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&mut self, id: JobId, command: &str) -> anyhow::Result<Box<dyn ProcessHandle>> {
        if self.unlaunchable.contains(command) {
            bail!("cannot start '{command}': no such file or directory");
        }
        self.launched.push((id, command.to_string()));
        let script = self.scripts.get(command).copied().unwrap_or_default();
        Ok(Box::new(FakeProcess {
            remaining_polls: script.polls,
            exit_code: script.exit_code,
        }))
    }
}

#[derive(Debug)]
struct FakeProcess {
    remaining_polls: usize,
    exit_code: i32,
}

impl ProcessHandle for FakeProcess {
    fn pid(&self) -> Option<u32> {
        None
    }

    fn try_exit_code(&mut self) -> anyhow::Result<Option<i32>> {
        if self.remaining_polls == 0 {
            return Ok(Some(self.exit_code));
        }
        self.remaining_polls -= 1;
        Ok(None)
    }
}
