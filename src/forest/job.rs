// src/forest/job.rs

//! Job identity, lifecycle status and per-job outcome.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::exec::{LAUNCH_FAILURE_EXIT_CODE, ProcessHandle};

/// Sequential job identity.
///
/// Stored as a zero-based index into the flat job list and displayed as
/// the 1-based job number used in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(usize);

impl JobId {
    pub fn from_index(index: usize) -> Self {
        JobId(index)
    }

    /// Build an id from a 1-based job number. `0` is not a job number.
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).map(JobId)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.number())
    }
}

/// Lifecycle status of a job.
///
/// ```text
/// Held -> Ready -> Running -> Done | Failed
/// Held -> Invalid            (strict policy cascade only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Waiting on an unfinished parent.
    Held,
    /// Eligible to run as soon as a concurrency slot is free.
    Ready,
    /// Process launched and not yet observed to exit.
    Running,
    /// Exited with code 0.
    Done,
    /// Exited nonzero, or could not be launched.
    Failed,
    /// Never run because an ancestor failed under the strict policy.
    Invalid,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed | JobStatus::Invalid)
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_become(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Held, Ready) | (Held, Invalid) | (Ready, Running) | (Running, Done) | (Running, Failed)
        )
    }

    /// Single-character symbol used by the progress digest.
    pub fn symbol(self) -> char {
        match self {
            JobStatus::Held => 'w',
            JobStatus::Ready => '.',
            JobStatus::Running => 'R',
            JobStatus::Done => '*',
            JobStatus::Failed => '!',
            JobStatus::Invalid => '?',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Held => "held",
            JobStatus::Ready => "ready",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
            JobStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schedulable unit wrapping a single shell command.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    label: String,
    command: String,
    depth: usize,
    parent: Option<JobId>,
    status: JobStatus,
    exit_code: Option<i32>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    /// Jobs gated directly by this one, in registration order.
    dependents: Vec<JobId>,
    /// Present only while `status == Running`.
    process: Option<Box<dyn ProcessHandle>>,
}

impl Job {
    pub(crate) fn new(id: JobId, command: String, depth: usize, parent: Option<JobId>) -> Self {
        let label = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let status = if parent.is_some() {
            JobStatus::Held
        } else {
            JobStatus::Ready
        };

        Self {
            id,
            label,
            command,
            depth,
            parent,
            status,
            exit_code: None,
            started_at: None,
            finished_at: None,
            dependents: Vec::new(),
            process: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    /// Human-readable label; the first token of the command.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<JobId> {
        self.parent
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Exit code, set once the job is `Done` or `Failed`.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn dependents(&self) -> &[JobId] {
        &self.dependents
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end.saturating_duration_since(start)),
            _ => None,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|p| p.pid())
    }

    pub(crate) fn add_dependent(&mut self, dependent: JobId) {
        self.dependents.push(dependent);
    }

    fn transition(&mut self, next: JobStatus) -> bool {
        if !self.status.can_become(next) {
            warn!(
                job = %self.id,
                from = %self.status,
                to = %next,
                "ignoring illegal job status transition"
            );
            return false;
        }
        debug!(job = %self.id, from = %self.status, to = %next, "job status change");
        self.status = next;
        true
    }

    /// `Held -> Ready`.
    pub(crate) fn release(&mut self) -> bool {
        self.transition(JobStatus::Ready)
    }

    /// `Held -> Invalid`.
    pub(crate) fn invalidate(&mut self) -> bool {
        self.transition(JobStatus::Invalid)
    }

    /// `Ready -> Running`, taking ownership of the live process handle.
    pub(crate) fn start(&mut self, process: Box<dyn ProcessHandle>, now: Instant) -> bool {
        if !self.transition(JobStatus::Running) {
            return false;
        }
        self.started_at = Some(now);
        self.process = Some(process);
        true
    }

    /// `Ready -> Running -> Failed` for a command that could not be started.
    pub(crate) fn fail_to_launch(&mut self, now: Instant) -> bool {
        if !self.transition(JobStatus::Running) {
            return false;
        }
        self.started_at = Some(now);
        self.finish(LAUNCH_FAILURE_EXIT_CODE, now)
    }

    /// Non-blocking check of the running process.
    ///
    /// Returns the exit code once the process has terminated. A handle that
    /// cannot be polled is treated as a failed launch.
    pub(crate) fn poll_exit(&mut self) -> Option<i32> {
        let process = self.process.as_mut()?;
        match process.try_exit_code() {
            Ok(code) => code,
            Err(err) => {
                warn!(
                    job = %self.id,
                    error = %err,
                    "failed to poll job process; treating it as failed"
                );
                Some(LAUNCH_FAILURE_EXIT_CODE)
            }
        }
    }

    /// `Running -> Done | Failed`. Releases the process handle.
    pub(crate) fn finish(&mut self, exit_code: i32, now: Instant) -> bool {
        let next = if exit_code == 0 {
            JobStatus::Done
        } else {
            JobStatus::Failed
        };
        if !self.transition(next) {
            return false;
        }
        self.exit_code = Some(exit_code);
        self.finished_at = Some(now);
        self.process = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ExitsWith(Option<i32>);

    impl ProcessHandle for ExitsWith {
        fn pid(&self) -> Option<u32> {
            Some(42)
        }

        fn try_exit_code(&mut self) -> anyhow::Result<Option<i32>> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct Unpollable;

    impl ProcessHandle for Unpollable {
        fn pid(&self) -> Option<u32> {
            None
        }

        fn try_exit_code(&mut self) -> anyhow::Result<Option<i32>> {
            Err(anyhow::anyhow!("no such process"))
        }
    }

    fn root(cmd: &str) -> Job {
        Job::new(JobId::from_index(0), cmd.to_string(), 0, None)
    }

    #[test]
    fn job_numbers_are_one_based() {
        let id = JobId::from_index(0);
        assert_eq!(id.number(), 1);
        assert_eq!(id.to_string(), "#1");
        assert_eq!(JobId::from_number(3), Some(JobId::from_index(2)));
        assert_eq!(JobId::from_number(0), None);
    }

    #[test]
    fn initial_status_depends_on_parent() {
        let parent = root("make all");
        assert_eq!(parent.status(), JobStatus::Ready);
        assert_eq!(parent.label(), "make");

        let child = Job::new(JobId::from_index(1), "make test".into(), 1, Some(parent.id()));
        assert_eq!(child.status(), JobStatus::Held);
    }

    #[test]
    fn only_state_machine_edges_are_allowed() {
        use JobStatus::*;
        let all = [Held, Ready, Running, Done, Failed, Invalid];
        let legal = [
            (Held, Ready),
            (Held, Invalid),
            (Ready, Running),
            (Running, Done),
            (Running, Failed),
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_become(to),
                    legal.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
        for terminal in [Done, Failed, Invalid] {
            assert!(terminal.is_terminal());
            assert!(all.iter().all(|&to| !terminal.can_become(to)));
        }
    }

    #[test]
    fn running_job_records_outcome_and_drops_handle() {
        let mut job = root("true");
        let start = Instant::now();
        assert!(job.start(Box::new(ExitsWith(Some(0))), start));
        assert_eq!(job.status(), JobStatus::Running);
        assert_eq!(job.pid(), Some(42));

        let code = job.poll_exit();
        assert_eq!(code, Some(0));
        assert!(job.finish(0, start + Duration::from_millis(250)));

        assert_eq!(job.status(), JobStatus::Done);
        assert_eq!(job.exit_code(), Some(0));
        assert_eq!(job.elapsed(), Some(Duration::from_millis(250)));
        assert_eq!(job.pid(), None);
    }

    #[test]
    fn nonzero_exit_is_failed() {
        let mut job = root("false");
        let now = Instant::now();
        job.start(Box::new(ExitsWith(Some(1))), now);
        assert!(job.finish(1, now));
        assert_eq!(job.status(), JobStatus::Failed);
        assert_eq!(job.exit_code(), Some(1));
    }

    #[test]
    fn still_running_process_reports_nothing() {
        let mut job = root("sleep 10");
        job.start(Box::new(ExitsWith(None)), Instant::now());
        assert_eq!(job.poll_exit(), None);
        assert_eq!(job.status(), JobStatus::Running);
    }

    #[test]
    fn unpollable_process_counts_as_launch_failure() {
        let mut job = root("ghost");
        job.start(Box::new(Unpollable), Instant::now());
        assert_eq!(job.poll_exit(), Some(LAUNCH_FAILURE_EXIT_CODE));
    }

    #[test]
    fn launch_failure_goes_straight_to_failed() {
        let mut job = root("missing-binary");
        let now = Instant::now();
        assert!(job.fail_to_launch(now));
        assert_eq!(job.status(), JobStatus::Failed);
        assert_eq!(job.exit_code(), Some(LAUNCH_FAILURE_EXIT_CODE));
        assert_eq!(job.elapsed(), Some(Duration::ZERO));
    }

    #[test]
    fn terminal_jobs_cannot_be_restarted() {
        let mut job = root("true");
        let now = Instant::now();
        job.start(Box::new(ExitsWith(Some(0))), now);
        job.finish(0, now);

        assert!(!job.start(Box::new(ExitsWith(Some(0))), now));
        assert!(!job.release());
        assert!(!job.invalidate());
        assert_eq!(job.status(), JobStatus::Done);
    }

    #[test]
    fn invalid_job_has_no_outcome() {
        let mut job = Job::new(JobId::from_index(1), "echo".into(), 1, Some(JobId::from_index(0)));
        assert!(job.invalidate());
        assert_eq!(job.status(), JobStatus::Invalid);
        assert_eq!(job.exit_code(), None);
        assert_eq!(job.elapsed(), None);
    }
}
