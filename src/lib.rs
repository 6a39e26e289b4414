// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod forest;
pub mod fs;
pub mod logging;
pub mod report;
pub mod types;

use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{OutputOptions, load_and_validate, load_forest};
use crate::engine::{CompletedRun, Runner, Scheduler};
use crate::errors::Result;
use crate::exec::ShellLauncher;
use crate::forest::Forest;
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::{write_report, write_rerun_file};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - option validation
/// - reading job definitions (files or stdin) into a forest
/// - scheduler + runner with the shell launcher
/// - the summary line and optional report / re-run files
///
/// Returns the process exit status: the worst job exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config = load_and_validate(&args)?;
    let fs = RealFileSystem;

    let forest = load_forest(&fs, &args.files, config.forest.clone())?;
    info!(jobs = forest.len(), "job definitions loaded");

    if args.dry_run {
        print_dry_run(&forest);
        return Ok(0);
    }

    let scheduler = Scheduler::new(forest, config.scheduler);
    let runner = Runner::new(scheduler, ShellLauncher::new(), config.runner);
    let completed = runner.run().await;

    println!("{}", completed.summary.stdout_line());
    write_outputs(&fs, &config.output, &completed);

    Ok(completed.summary.process_exit_code())
}

/// Write the optional report and re-run files.
///
/// Failures are reported but never change the run's exit status.
fn write_outputs(fs: &dyn FileSystem, output: &OutputOptions, completed: &CompletedRun) {
    if let Some(path) = &output.report {
        if let Err(err) = write_report(fs, path, &completed.jobs) {
            error!(?path, error = %format!("{err:#}"), "could not write report file");
            eprintln!("jobman: {err:#}");
        }
    }
    if let Some(path) = &output.rerun {
        if let Err(err) = write_rerun_file(fs, path, &completed.jobs) {
            error!(?path, error = %format!("{err:#}"), "could not write re-run file");
            eprintln!("jobman: {err:#}");
        }
    }
}

/// Simple dry-run output: the forest in input notation with statuses.
fn print_dry_run(forest: &Forest) {
    println!("jobman dry-run ({} jobs)", forest.len());
    print!("{}", forest.render_tree());
    debug!("dry-run complete (no execution)");
}
