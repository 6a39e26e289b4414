// src/logging.rs

//! Logging setup for `jobman` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `-l` / `--log` (debug)
//! 3. `JOBMAN_LOG` environment variable (e.g. "info", "debug")
//! 4. default to `warn`
//!
//! Logs are sent to STDERR so that stdout carries only job output and the
//! final summary line.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, diagnostics: bool) -> Result<()> {
    let level = resolve_level(cli_level, diagnostics, std::env::var("JOBMAN_LOG").ok());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn resolve_level(
    cli_level: Option<LogLevel>,
    diagnostics: bool,
    env_level: Option<String>,
) -> tracing::Level {
    if let Some(lvl) = cli_level {
        return level_from_log_level(lvl);
    }
    if diagnostics {
        return tracing::Level::DEBUG;
    }
    env_level
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(tracing::Level::WARN)
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn cli_level_wins() {
        assert_eq!(
            resolve_level(Some(LogLevel::Error), true, Some("trace".into())),
            Level::ERROR
        );
    }

    #[test]
    fn diagnostics_flag_beats_environment() {
        assert_eq!(resolve_level(None, true, Some("error".into())), Level::DEBUG);
    }

    #[test]
    fn environment_then_default() {
        assert_eq!(resolve_level(None, false, Some(" Info ".into())), Level::INFO);
        assert_eq!(resolve_level(None, false, Some("loud".into())), Level::WARN);
        assert_eq!(resolve_level(None, false, None), Level::WARN);
    }
}
