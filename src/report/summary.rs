// src/report/summary.rs

use std::time::Duration;

use crate::forest::{Job, JobStatus};

/// Aggregate result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of registered jobs.
    pub total: usize,
    /// Jobs that exited with code 0.
    pub succeeded: usize,
    /// Jobs that exited nonzero or could not be launched.
    pub failed: usize,
    /// Jobs skipped because an ancestor failed under the strict policy.
    pub invalid: usize,
    /// Highest exit code among jobs that ran; 0 if none failed or none ran.
    pub worst_exit_code: i32,
    /// Wall-clock time from the first poll round to the last.
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn from_jobs(jobs: &[Job], elapsed: Duration) -> Self {
        let mut summary = RunSummary {
            total: jobs.len(),
            succeeded: 0,
            failed: 0,
            invalid: 0,
            worst_exit_code: 0,
            elapsed,
        };

        for job in jobs {
            match job.status() {
                JobStatus::Done => summary.succeeded += 1,
                JobStatus::Failed => summary.failed += 1,
                JobStatus::Invalid => summary.invalid += 1,
                JobStatus::Held | JobStatus::Ready | JobStatus::Running => {}
            }
            if let Some(code) = job.exit_code() {
                summary.worst_exit_code = summary.worst_exit_code.max(code);
            }
        }

        summary
    }

    /// `total<TAB>succeeded<TAB>elapsed_seconds`, printed on stdout.
    pub fn stdout_line(&self) -> String {
        format!(
            "{}\t{}\t{:.3}",
            self.total,
            self.succeeded,
            self.elapsed.as_secs_f64()
        )
    }

    /// Worst exit code, clamped to what a process status can carry.
    pub fn process_exit_code(&self) -> i32 {
        self.worst_exit_code.clamp(0, 255)
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}
