use jobman::config::{ForestOptions, SchedulerOptions};
use jobman::engine::{Scheduler, SchedulerStep};
use jobman::forest::{Forest, ForestBuilder, JobStatus};
use jobman::types::{ConcurrencyCap, FailurePolicy};

use crate::fake_launcher::FakeLauncher;

/// Upper bound on rounds before a test run is considered stuck.
const MAX_ROUNDS: usize = 10_000;

/// Build a forest with default options, panicking on malformed input.
pub fn forest_from_lines(lines: &[&str]) -> Forest {
    ForestBuilder::build(ForestOptions::default(), lines.iter().copied())
        .expect("test forest should be well-formed")
}

/// Scheduler over `lines` with the given cap (0 = unbounded) and policy.
pub fn scheduler_for(lines: &[&str], max_jobs: usize, strict: bool) -> Scheduler {
    Scheduler::new(
        forest_from_lines(lines),
        SchedulerOptions {
            max_running: ConcurrencyCap::new(max_jobs),
            failure_policy: FailurePolicy::from_strict_flag(strict),
        },
    )
}

/// What happened while driving a scheduler round by round.
#[derive(Debug, Default)]
pub struct RoundTrace {
    pub steps: Vec<SchedulerStep>,
    /// Progress digest after every round.
    pub digests: Vec<String>,
    /// Highest number of simultaneously running jobs seen after a round.
    pub peak_running: usize,
}

impl RoundTrace {
    pub fn rounds(&self) -> usize {
        self.steps.len()
    }
}

/// Call `poll_round` until the scheduler reports completion.
///
/// Checks after every round that the running counter agrees with the job
/// statuses.
pub fn drive_to_completion(scheduler: &mut Scheduler, launcher: &mut FakeLauncher) -> RoundTrace {
    let mut trace = RoundTrace::default();

    loop {
        let step = scheduler.poll_round(launcher);

        let running = scheduler
            .jobs()
            .iter()
            .filter(|job| job.status() == JobStatus::Running)
            .count();
        assert_eq!(running, scheduler.running_count(), "running counter drifted");
        trace.peak_running = trace.peak_running.max(running);
        trace.digests.push(scheduler.digest());

        let finished = step.run_finished;
        trace.steps.push(step);
        if finished {
            return trace;
        }
        assert!(trace.rounds() < MAX_ROUNDS, "scheduler did not finish");
    }
}
