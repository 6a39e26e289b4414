// src/engine/propagation.rs

//! Completion propagation from a finished job to its dependents.

use tracing::debug;

use crate::forest::{Forest, JobId};

/// Applies a finished job's outcome to its dependents.
pub struct Propagator<'a> {
    forest: &'a mut Forest,
}

impl<'a> Propagator<'a> {
    pub fn new(forest: &'a mut Forest) -> Self {
        Self { forest }
    }

    /// Move every direct dependent of `parent` from `Held` to `Ready`.
    ///
    /// Returns the jobs that were released, in registration order.
    pub fn release_dependents(&mut self, parent: JobId) -> Vec<JobId> {
        let dependents = self.dependents_of(parent);
        let mut released = Vec::with_capacity(dependents.len());

        for id in dependents {
            if let Some(job) = self.forest.get_mut(id) {
                if job.release() {
                    debug!(job = %id, parent = %parent, "dependent released");
                    released.push(id);
                }
            }
        }

        released
    }

    /// Mark every descendant of `failed` as `Invalid`, depth-first.
    ///
    /// Uses an explicit stack so arbitrarily deep trees cannot exhaust the
    /// call stack. A descendant that is not `Held` is left alone together
    /// with its own subtree.
    pub fn invalidate_subtree(&mut self, failed: JobId) -> Vec<JobId> {
        let mut stack: Vec<JobId> = self.dependents_of(failed);
        stack.reverse();
        let mut invalidated = Vec::new();

        while let Some(id) = stack.pop() {
            let Some(job) = self.forest.get_mut(id) else {
                continue;
            };
            if !job.invalidate() {
                continue;
            }
            debug!(job = %id, failed_ancestor = %failed, "dependent invalidated");
            invalidated.push(id);
            stack.extend(job.dependents().iter().rev().copied());
        }

        invalidated
    }

    fn dependents_of(&self, id: JobId) -> Vec<JobId> {
        self.forest
            .get(id)
            .map(|job| job.dependents().to_vec())
            .unwrap_or_default()
    }
}
