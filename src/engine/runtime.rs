// src/engine/runtime.rs

use std::fmt;
use std::io::Write;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::RunnerOptions;
use crate::exec::ProcessLauncher;
use crate::forest::Job;
use crate::report::RunSummary;

use super::digest::ProgressDigest;
use super::scheduler::Scheduler;

/// Final state of a run: every job in a terminal state, plus the summary.
#[derive(Debug)]
pub struct CompletedRun {
    pub jobs: Vec<Job>,
    pub summary: RunSummary,
    /// Number of poll rounds it took.
    pub rounds: u64,
}

/// Drives the [`Scheduler`] in fixed-interval poll rounds until every job
/// has finished, and delegates process starts to a [`ProcessLauncher`].
///
/// This is a thin async shell: all scheduling semantics live in the
/// scheduler. The only await point is the sleep between two rounds.
pub struct Runner<L: ProcessLauncher> {
    scheduler: Scheduler,
    launcher: L,
    options: RunnerOptions,
    progress_out: Box<dyn Write + Send>,
}

impl<L: ProcessLauncher> fmt::Debug for Runner<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("scheduler", &self.scheduler)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<L: ProcessLauncher> Runner<L> {
    pub fn new(scheduler: Scheduler, launcher: L, options: RunnerOptions) -> Self {
        Self {
            scheduler,
            launcher,
            options,
            progress_out: Box::new(std::io::stderr()),
        }
    }

    /// Send progress digests somewhere other than stderr.
    pub fn with_progress_writer(mut self, out: Box<dyn Write + Send>) -> Self {
        self.progress_out = out;
        self
    }

    /// Main poll loop.
    ///
    /// - Runs one scheduler round (complete, then dispatch).
    /// - Emits the progress digest if it changed.
    /// - Stops once every job is finished, otherwise sleeps.
    pub async fn run(mut self) -> CompletedRun {
        let started = Instant::now();
        let sched_opts = self.scheduler.options();
        info!(
            jobs = self.scheduler.total(),
            max_jobs = %sched_opts.max_running,
            policy = %sched_opts.failure_policy,
            poll_interval_ms = self.options.poll_interval.as_millis() as u64,
            "run started"
        );

        let mut digest = ProgressDigest::new();
        let mut rounds: u64 = 0;

        loop {
            rounds += 1;
            let step = self.scheduler.poll_round(&mut self.launcher);

            if !step.is_quiet() {
                debug!(
                    round = rounds,
                    completed = step.completed.len(),
                    released = step.released.len(),
                    invalidated = step.invalidated.len(),
                    dispatched = step.dispatched.len(),
                    running = self.scheduler.running_count(),
                    finished = self.scheduler.finished_count(),
                    "poll round"
                );
            }

            if self.options.show_progress {
                if let Some(line) = digest.observe(self.scheduler.digest()) {
                    if let Err(err) = writeln!(self.progress_out, "{line}") {
                        debug!(error = %err, "could not write progress digest");
                    }
                }
            }

            if step.run_finished {
                info!(rounds, "all jobs terminated");
                break;
            }

            tokio::time::sleep(self.options.poll_interval).await;
        }

        let elapsed = started.elapsed();
        let jobs = self.scheduler.into_forest().into_jobs();
        let summary = RunSummary::from_jobs(&jobs, elapsed);

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            invalid = summary.invalid,
            worst_exit_code = summary.worst_exit_code,
            "run finished"
        );

        CompletedRun {
            jobs,
            summary,
            rounds,
        }
    }
}
