// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::types::{ConcurrencyCap, FailurePolicy};

/// Default inter-round poll interval, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 1.0;

/// Run options as given on the command line, before validation.
///
/// This is a direct mapping of the flags:
///
/// ```text
/// jobman -d 2 -m 4 -x -r report.tsv -u rerun.txt jobs.txt
/// ```
///
/// Use `RunConfig::try_from` to obtain the validated form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRunConfig {
    /// Poll interval in (possibly fractional) seconds.
    pub delay_secs: f64,
    pub max_jobs: ConcurrencyCap,
    pub strict: bool,
    pub quiet: bool,
    pub max_depth: Option<usize>,
    pub report: Option<PathBuf>,
    pub rerun: Option<PathBuf>,
}

impl Default for RawRunConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_jobs: ConcurrencyCap::UNBOUNDED,
            strict: false,
            quiet: false,
            max_depth: None,
            report: None,
            rerun: None,
        }
    }
}

/// How definition lines are turned into a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestOptions {
    /// Character whose leading run gives a line's dependency depth.
    pub marker: char,
    /// Lines starting with this character are ignored.
    pub comment: char,
    /// Deepest dependency level accepted; `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            marker: '+',
            comment: '#',
            max_depth: None,
        }
    }
}

/// Policy knobs for the synchronous scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerOptions {
    pub max_running: ConcurrencyCap,
    pub failure_policy: FailurePolicy,
}

/// Options for the async loop that drives the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Sleep between two poll rounds.
    pub poll_interval: Duration,
    /// Print the one-character-per-job digest to stderr when it changes.
    pub show_progress: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs_f64(DEFAULT_POLL_INTERVAL_SECS),
            show_progress: true,
        }
    }
}

/// Where final per-job results are written, besides stdout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputOptions {
    /// Tab-separated `job  exit_code  elapsed` lines.
    pub report: Option<PathBuf>,
    /// Commands of failed jobs, one per line.
    pub rerun: Option<PathBuf>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub forest: ForestOptions,
    pub scheduler: SchedulerOptions,
    pub runner: RunnerOptions,
    pub output: OutputOptions,
}

impl RunConfig {
    /// Build without validation. Prefer `RunConfig::try_from(raw)`.
    pub(crate) fn new_unchecked(raw: RawRunConfig) -> Self {
        Self {
            forest: ForestOptions {
                max_depth: raw.max_depth,
                ..ForestOptions::default()
            },
            scheduler: SchedulerOptions {
                max_running: raw.max_jobs,
                failure_policy: FailurePolicy::from_strict_flag(raw.strict),
            },
            runner: RunnerOptions {
                poll_interval: Duration::from_secs_f64(raw.delay_secs),
                show_progress: !raw.quiet,
            },
            output: OutputOptions {
                report: raw.report,
                rerun: raw.rerun,
            },
        }
    }
}
