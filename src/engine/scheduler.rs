// src/engine/scheduler.rs

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::SchedulerOptions;
use crate::engine::propagation::Propagator;
use crate::engine::scheduler_step::SchedulerStep;
use crate::exec::{LAUNCH_FAILURE_EXIT_CODE, ProcessLauncher};
use crate::forest::{Forest, Job, JobId, JobStatus};

/// Scheduler owns the job forest plus the per-run counters.
///
/// It is responsible for:
/// - noticing when running jobs exit (completion pass)
/// - releasing or invalidating dependents of finished jobs
/// - starting ready jobs while a concurrency slot is free (dispatch pass)
///
/// It performs no waiting of its own: each call to [`poll_round`] does one
/// completion pass followed by one dispatch pass and returns immediately.
///
/// [`poll_round`]: Scheduler::poll_round
#[derive(Debug)]
pub struct Scheduler {
    forest: Forest,
    options: SchedulerOptions,
    /// Jobs currently `Running`.
    running: usize,
    /// Jobs in a terminal state.
    finished: usize,
}

impl Scheduler {
    pub fn new(forest: Forest, options: SchedulerOptions) -> Self {
        Self {
            forest,
            options,
            running: 0,
            finished: 0,
        }
    }

    pub fn options(&self) -> SchedulerOptions {
        self.options
    }

    pub fn total(&self) -> usize {
        self.forest.len()
    }

    pub fn running_count(&self) -> usize {
        self.running
    }

    pub fn finished_count(&self) -> usize {
        self.finished
    }

    /// True once every job is `Done`, `Failed` or `Invalid`.
    pub fn is_finished(&self) -> bool {
        self.finished == self.forest.len()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn jobs(&self) -> &[Job] {
        self.forest.jobs()
    }

    pub fn status_of(&self, id: JobId) -> Option<JobStatus> {
        self.forest.get(id).map(Job::status)
    }

    /// One status symbol per job, in registration order.
    pub fn digest(&self) -> String {
        self.forest
            .jobs()
            .iter()
            .map(|job| job.status().symbol())
            .collect()
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }

    /// Run one poll round: complete, propagate, then dispatch.
    ///
    /// Completion of every running job is observed before anything is
    /// dispatched, so a job released this round can start this round.
    pub fn poll_round<L>(&mut self, launcher: &mut L) -> SchedulerStep
    where
        L: ProcessLauncher + ?Sized,
    {
        let mut step = SchedulerStep::default();

        self.completion_pass(&mut step);
        self.dispatch_pass(launcher, &mut step);

        step.run_finished = self.is_finished();
        step
    }

    fn completion_pass(&mut self, step: &mut SchedulerStep) {
        for index in 0..self.forest.len() {
            let id = JobId::from_index(index);
            let Some(job) = self.forest.get_mut(id) else {
                continue;
            };
            if job.status() != JobStatus::Running {
                continue;
            }
            let Some(exit_code) = job.poll_exit() else {
                continue;
            };
            if !job.finish(exit_code, Instant::now()) {
                continue;
            }

            info!(
                job = %id,
                label = %job.label(),
                exit_code,
                elapsed_ms = job.elapsed().map(|d| d.as_millis() as u64).unwrap_or_default(),
                "job terminated"
            );

            self.running = self.running.saturating_sub(1);
            self.finished += 1;
            step.completed.push(id);
            self.propagate(id, exit_code, step);
        }
    }

    fn dispatch_pass<L>(&mut self, launcher: &mut L, step: &mut SchedulerStep)
    where
        L: ProcessLauncher + ?Sized,
    {
        // Jobs released during this pass always have a higher index than
        // their parent, so a single forward sweep reaches them.
        for index in 0..self.forest.len() {
            if !self.options.max_running.has_room(self.running) {
                debug!(
                    running = self.running,
                    cap = %self.options.max_running,
                    "no free job slot; deferring remaining ready jobs"
                );
                break;
            }

            let id = JobId::from_index(index);
            let Some(job) = self.forest.get_mut(id) else {
                continue;
            };
            if job.status() != JobStatus::Ready {
                continue;
            }

            let now = Instant::now();
            match launcher.launch(id, job.command()) {
                Ok(process) => {
                    job.start(process, now);
                    info!(job = %id, pid = job.pid(), command = %job.command(), "job started");
                    self.running += 1;
                    step.dispatched.push(id);
                }
                Err(err) => {
                    error!(
                        job = %id,
                        command = %job.command(),
                        error = %format!("{err:#}"),
                        "failed to launch job"
                    );
                    job.fail_to_launch(now);
                    self.finished += 1;
                    step.launch_failed.push(id);
                    step.completed.push(id);
                    self.propagate(id, LAUNCH_FAILURE_EXIT_CODE, step);
                }
            }
        }
    }

    /// Apply the failure policy to the dependents of a job that just left
    /// `Running`.
    fn propagate(&mut self, id: JobId, exit_code: i32, step: &mut SchedulerStep) {
        let strict = self.options.failure_policy.is_strict();
        let mut propagator = Propagator::new(&mut self.forest);

        if exit_code != 0 && strict {
            let invalidated = propagator.invalidate_subtree(id);
            if !invalidated.is_empty() {
                warn!(
                    job = %id,
                    exit_code,
                    invalidated = invalidated.len(),
                    "job failed; dependent subtree will not run"
                );
            }
            self.finished += invalidated.len();
            step.invalidated.extend(invalidated);
        } else {
            if exit_code != 0 {
                debug!(job = %id, exit_code, "job failed; releasing dependents anyway");
            }
            let released = propagator.release_dependents(id);
            step.released.extend(released);
        }
    }
}
