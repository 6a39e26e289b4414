// src/report/writer.rs

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::forest::{Job, JobStatus};
use crate::fs::FileSystem;

/// One `job_number<TAB>exit_code<TAB>elapsed_seconds` line per job, in
/// registration order. Jobs that never ran show `-` in both columns.
pub fn render_report(jobs: &[Job]) -> String {
    let mut out = String::new();
    for job in jobs {
        let exit_code = job
            .exit_code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());
        let elapsed = job
            .elapsed()
            .map(|d| format!("{:.3}", d.as_secs_f64()))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{}\t{}\t{}", job.id().number(), exit_code, elapsed);
    }
    out
}

/// The command of every failed job, one per line.
pub fn render_rerun_file(jobs: &[Job]) -> String {
    let mut out = String::new();
    for job in jobs.iter().filter(|job| job.status() == JobStatus::Failed) {
        let _ = writeln!(out, "{}", job.command());
    }
    out
}

pub fn write_report(fs: &dyn FileSystem, path: &Path, jobs: &[Job]) -> Result<()> {
    fs.write(path, render_report(jobs).as_bytes())
        .with_context(|| format!("writing report file {:?}", path))?;
    debug!(?path, jobs = jobs.len(), "report file written");
    Ok(())
}

pub fn write_rerun_file(fs: &dyn FileSystem, path: &Path, jobs: &[Job]) -> Result<()> {
    fs.write(path, render_rerun_file(jobs).as_bytes())
        .with_context(|| format!("writing re-run file {:?}", path))?;
    debug!(?path, "re-run file written");
    Ok(())
}
