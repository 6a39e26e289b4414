// src/engine/scheduler_step.rs

//! Result type for a single scheduler poll round.

use crate::forest::JobId;

/// Structured result of one poll round.
///
/// Useful for tests that step the scheduler manually and make assertions
/// about what changed, and for round-level logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStep {
    /// Jobs that reached `Done` or `Failed` this round, including launch
    /// failures, in the order they were observed.
    pub completed: Vec<JobId>,
    /// Jobs whose command could not be started at all.
    pub launch_failed: Vec<JobId>,
    /// Jobs moved from `Held` to `Ready` by a parent's completion.
    pub released: Vec<JobId>,
    /// Jobs marked `Invalid` by a strict-policy cascade.
    pub invalidated: Vec<JobId>,
    /// Jobs moved to `Running` this round, in dispatch order.
    pub dispatched: Vec<JobId>,
    /// Whether every job is now in a terminal state.
    pub run_finished: bool,
}

impl SchedulerStep {
    /// True when the round changed nothing.
    pub fn is_quiet(&self) -> bool {
        self.completed.is_empty()
            && self.released.is_empty()
            && self.invalidated.is_empty()
            && self.dispatched.is_empty()
    }
}
