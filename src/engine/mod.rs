// src/engine/mod.rs

//! Scheduling engine for jobman.
//!
//! This module ties together:
//! - the synchronous scheduler that owns every job and advances them one
//!   poll round at a time
//! - completion propagation (release or strict-policy invalidation)
//! - the async runner that repeats rounds with a sleep in between
//!
//! The round logic lives in [`scheduler`]; the polling shell is
//! implemented in [`runtime`].

pub mod digest;
pub mod propagation;
pub mod runtime;
pub mod scheduler;
pub mod scheduler_step;

pub use digest::ProgressDigest;
pub use propagation::Propagator;
pub use runtime::{CompletedRun, Runner};
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use crate::types::{ConcurrencyCap, FailurePolicy};
