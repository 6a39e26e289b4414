// src/config/loader.rs

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ForestOptions, RawRunConfig, RunConfig};
use crate::errors::{JobmanError, Result};
use crate::forest::{Forest, ForestBuilder};
use crate::fs::FileSystem;

/// Collect the raw, unvalidated run options from parsed CLI flags.
pub fn raw_config_from_args(args: &CliArgs) -> RawRunConfig {
    RawRunConfig {
        delay_secs: args.delay,
        max_jobs: args.max_jobs,
        strict: args.strict,
        quiet: args.quiet,
        max_depth: args.max_depth,
        report: args.report.clone(),
        rerun: args.rerun.clone(),
    }
}

/// Turn CLI flags into a validated [`RunConfig`].
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(args: &CliArgs) -> Result<RunConfig> {
    let raw = raw_config_from_args(args);
    RunConfig::try_from(raw)
}

/// Read all lines of one definition file.
pub fn read_job_file(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>> {
    if !fs.is_file(path) {
        return Err(JobmanError::InputError {
            path: path.to_path_buf(),
            source: anyhow!("no such file"),
        });
    }
    let contents = fs
        .read_to_string(path)
        .map_err(|source| JobmanError::InputError {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(contents.lines().map(str::to_string).collect())
}

/// Read definition lines from a stream such as stdin.
pub fn read_job_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let lines = reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .context("reading job definitions")?;
    Ok(lines)
}

/// Build the job forest from the given files, concatenated in order.
///
/// All files are read before the forest is built, so an unreadable file is
/// reported before any line is interpreted.
pub fn load_forest_from_files(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    options: ForestOptions,
) -> Result<Forest> {
    let mut builder = ForestBuilder::new(options);
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push(read_job_file(fs, path)?);
    }
    for (path, lines) in paths.iter().zip(sources) {
        debug!(?path, lines = lines.len(), "loading job definitions");
        builder.extend(lines)?;
    }
    Ok(builder.finish())
}

/// Build the job forest from a stream.
pub fn load_forest_from_reader<R: BufRead>(reader: R, options: ForestOptions) -> Result<Forest> {
    let lines = read_job_lines(reader)?;
    debug!(lines = lines.len(), "loading job definitions from stream");
    ForestBuilder::build(options, lines)
}

/// Build the job forest from the named files, or from stdin when none
/// are given.
pub fn load_forest(fs: &dyn FileSystem, paths: &[PathBuf], options: ForestOptions) -> Result<Forest> {
    if paths.is_empty() {
        let stdin = std::io::stdin();
        load_forest_from_reader(stdin.lock(), options)
    } else {
        load_forest_from_files(fs, paths, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::JobId;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn files_are_concatenated_in_argument_order() {
        let fs = MockFileSystem::new();
        fs.add_file("a.jobs", "build\n+test\n");
        fs.add_file("b.jobs", "# second file\n+deploy\n");

        let forest = load_forest_from_files(
            &fs,
            &[PathBuf::from("a.jobs"), PathBuf::from("b.jobs")],
            ForestOptions::default(),
        )
        .unwrap();

        assert_eq!(forest.len(), 3);
        // The depth table carries over between files.
        let deploy = forest.get(JobId::from_number(3).unwrap()).unwrap();
        assert_eq!(deploy.command(), "deploy");
        assert_eq!(deploy.parent(), JobId::from_number(1));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let fs = MockFileSystem::new();
        fs.add_file("present.jobs", "echo hi\n");

        let err = load_forest_from_files(
            &fs,
            &[PathBuf::from("present.jobs"), PathBuf::from("absent.jobs")],
            ForestOptions::default(),
        )
        .unwrap_err();

        match err {
            JobmanError::InputError { path, .. } => assert_eq!(path, PathBuf::from("absent.jobs")),
            other => panic!("expected InputError, got {other:?}"),
        }
    }

    #[test]
    fn reader_input_handles_crlf_lines() {
        let input = "first\r\n+second\r\n\r\n";
        let forest = load_forest_from_reader(input.as_bytes(), ForestOptions::default()).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.jobs()[1].command(), "second");
    }
}
