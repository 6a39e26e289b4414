// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::model::DEFAULT_POLL_INTERVAL_SECS;
use crate::types::ConcurrencyCap;

const AFTER_HELP: &str = "\
Each line of input is one shell command. Prefix a command with one or more
'+' characters to run it after the nearest preceding command that has one
'+' fewer:

  cmd1
  +cmd2
  ++cmd3
  cmd4
  +cmd5

cmd1 and cmd4 start immediately, cmd2 after cmd1, cmd3 after cmd2 and cmd5
after cmd4. Blank lines and lines starting with '#' are ignored.

On completion jobman prints the number of jobs, the number of jobs that
exited with status 0 and the elapsed seconds, separated by tabs. Its own
exit status is the highest exit status of any job.";

/// Command-line arguments for `jobman`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobman",
    version,
    about = "Run shell commands concurrently, respecting simple dependencies.",
    long_about = None,
    after_help = AFTER_HELP
)]
pub struct CliArgs {
    /// Files with job definitions, read in order.
    ///
    /// Standard input is used when no file is given.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Poll running processes every D seconds (fractions allowed).
    #[arg(short = 'd', long, value_name = "SECONDS", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub delay: f64,

    /// Run at most M jobs at the same time (0 = no limit).
    #[arg(short = 'm', long, value_name = "M", default_value_t = ConcurrencyCap::UNBOUNDED)]
    pub max_jobs: ConcurrencyCap,

    /// Do not run the dependents of a failed job.
    #[arg(short = 'x', long)]
    pub strict: bool,

    /// Write `job<TAB>exit code<TAB>seconds` for every job to FILE.
    #[arg(short = 'r', long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Write the commands of failed jobs to FILE.
    #[arg(short = 'u', long, value_name = "FILE")]
    pub rerun: Option<PathBuf>,

    /// Do not print the progress line.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Enable diagnostic logging to stderr (debug level).
    #[arg(short = 'l', long = "log")]
    pub log: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides `-l`. If omitted, `JOBMAN_LOG` or a default level is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Reject definitions nested deeper than N levels.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Parse and print the job forest, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
