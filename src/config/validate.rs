// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{RawRunConfig, RunConfig};
use crate::errors::{JobmanError, Result};

impl TryFrom<RawRunConfig> for RunConfig {
    type Error = crate::errors::JobmanError;

    fn try_from(raw: RawRunConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(RunConfig::new_unchecked(raw))
    }
}

pub fn validate_raw_config(cfg: &RawRunConfig) -> Result<()> {
    validate_delay(cfg)?;
    validate_max_depth(cfg)?;
    validate_outputs(cfg)?;
    Ok(())
}

fn validate_delay(cfg: &RawRunConfig) -> Result<()> {
    if cfg.delay_secs <= 0.0 || Duration::try_from_secs_f64(cfg.delay_secs).is_err() {
        return Err(JobmanError::ConfigError(format!(
            "poll interval must be a positive number of seconds (got {})",
            cfg.delay_secs
        )));
    }
    Ok(())
}

fn validate_max_depth(cfg: &RawRunConfig) -> Result<()> {
    if cfg.max_depth == Some(0) {
        return Err(JobmanError::ConfigError(
            "--max-depth must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_outputs(cfg: &RawRunConfig) -> Result<()> {
    if let (Some(report), Some(rerun)) = (&cfg.report, &cfg.rerun) {
        if report == rerun {
            return Err(JobmanError::ConfigError(format!(
                "report file and re-run file must differ (both are {:?})",
                report
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::types::{ConcurrencyCap, FailurePolicy};

    #[test]
    fn defaults_are_valid() {
        let cfg = RunConfig::try_from(RawRunConfig::default()).unwrap();
        assert_eq!(cfg.runner.poll_interval, Duration::from_secs(1));
        assert!(cfg.runner.show_progress);
        assert_eq!(cfg.scheduler.max_running, ConcurrencyCap::UNBOUNDED);
        assert_eq!(cfg.scheduler.failure_policy, FailurePolicy::Lenient);
        assert_eq!(cfg.forest.marker, '+');
        assert_eq!(cfg.forest.max_depth, None);
    }

    #[test]
    fn flags_map_onto_validated_options() {
        let raw = RawRunConfig {
            delay_secs: 0.25,
            max_jobs: ConcurrencyCap::new(3),
            strict: true,
            quiet: true,
            max_depth: Some(20),
            report: Some(PathBuf::from("report.tsv")),
            rerun: None,
        };
        let cfg = RunConfig::try_from(raw).unwrap();
        assert_eq!(cfg.runner.poll_interval, Duration::from_millis(250));
        assert!(!cfg.runner.show_progress);
        assert_eq!(cfg.scheduler.max_running.limit(), Some(3));
        assert!(cfg.scheduler.failure_policy.is_strict());
        assert_eq!(cfg.forest.max_depth, Some(20));
        assert_eq!(cfg.output.report, Some(PathBuf::from("report.tsv")));
    }

    #[test]
    fn rejects_non_positive_delay() {
        for delay in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let raw = RawRunConfig {
                delay_secs: delay,
                ..RawRunConfig::default()
            };
            match RunConfig::try_from(raw) {
                Err(JobmanError::ConfigError(msg)) => assert!(msg.contains("poll interval")),
                other => panic!("expected ConfigError for delay {delay}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_zero_max_depth() {
        let raw = RawRunConfig {
            max_depth: Some(0),
            ..RawRunConfig::default()
        };
        assert!(matches!(
            RunConfig::try_from(raw),
            Err(JobmanError::ConfigError(_))
        ));
    }

    #[test]
    fn rejects_shared_output_path() {
        let raw = RawRunConfig {
            report: Some(PathBuf::from("out.txt")),
            rerun: Some(PathBuf::from("out.txt")),
            ..RawRunConfig::default()
        };
        assert!(matches!(
            RunConfig::try_from(raw),
            Err(JobmanError::ConfigError(_))
        ));
    }
}
