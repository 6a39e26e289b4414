// src/forest/mod.rs

//! Dependency forest of jobs.
//!
//! - [`job`] holds the per-job state machine.
//! - [`builder`] turns `+`-prefixed definition lines into a [`Forest`].
//!
//! The forest is a flat arena: jobs are stored in registration order and
//! refer to each other by [`JobId`]. Every job has at most one parent, so
//! the parent→dependents edges form a set of trees.

pub mod builder;
pub mod job;

pub use builder::ForestBuilder;
pub use job::{Job, JobId, JobStatus};

use std::fmt::Write as _;

/// Ordered flat list of jobs plus their parent→dependents edges.
#[derive(Debug, Default)]
pub struct Forest {
    jobs: Vec<Job>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job and link it under `parent`, if any.
    ///
    /// Returns the id assigned to the job.
    pub(crate) fn register(&mut self, command: String, depth: usize, parent: Option<JobId>) -> JobId {
        let id = JobId::from_index(self.jobs.len());
        self.jobs.push(Job::new(id, command, depth, parent));
        if let Some(parent) = parent {
            if let Some(parent_job) = self.jobs.get_mut(parent.index()) {
                parent_job.add_dependent(id);
            }
        }
        id
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(id.index())
    }

    /// All jobs in registration order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Jobs without a parent, in registration order.
    pub fn roots(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| job.parent().is_none())
    }

    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }

    /// Render every tree depth-first, one job per line, in the input
    /// notation followed by the job's current status.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<JobId> = self.roots().map(Job::id).collect();
        stack.reverse();

        while let Some(id) = stack.pop() {
            let Some(job) = self.get(id) else { continue };
            let _ = writeln!(
                out,
                "{}{} ({})",
                "+".repeat(job.depth()),
                job.command(),
                job.status()
            );
            stack.extend(job.dependents().iter().rev().copied());
        }

        out
    }
}
