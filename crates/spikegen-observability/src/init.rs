// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for spikegen
//!
//! Console output always; with the `file-logging` feature and a configured
//! `log_dir`, every run also writes a JSON log into its own timestamped
//! folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── spikegen.log
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps background log writers alive; logs are flushed on drop
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Folder of the current run's log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

fn env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter: {}", filter))
}

fn console_layer(filter: &str, format: LogFormat) -> Result<BoxedLayer> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);
    let layer = match format {
        LogFormat::Text => layer.with_filter(env_filter(filter)?).boxed(),
        LogFormat::Compact => layer.compact().with_filter(env_filter(filter)?).boxed(),
    };
    Ok(layer)
}

/// Install the global subscriber
///
/// # Arguments
/// * `debug_flags` - Crates raised to debug level
/// * `config` - Base level, console format and optional log directory
///
/// # Errors
///
/// Fails if the level is not a valid filter directive, the log directory
/// cannot be created, or a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string_with_base(&config.level.to_lowercase());

    let mut layers = vec![console_layer(&filter, config.format)?];
    let guard = attach_file_logging(&mut layers, &filter, config)?;

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if config.log_dir.is_some() && guard.log_dir.is_none() {
        tracing::warn!("log_dir is configured but file logging is not compiled in; logging to console only");
    }
    Ok(guard)
}

/// Initialize console logging at `info` with the given debug flags
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default())
}

#[cfg(not(feature = "file-logging"))]
fn attach_file_logging(
    _layers: &mut Vec<BoxedLayer>,
    _filter: &str,
    _config: &LoggingConfig,
) -> Result<LoggingGuard> {
    Ok(LoggingGuard { log_dir: None })
}

#[cfg(feature = "file-logging")]
fn attach_file_logging(
    layers: &mut Vec<BoxedLayer>,
    filter: &str,
    config: &LoggingConfig,
) -> Result<LoggingGuard> {
    let Some(base_log_dir) = &config.log_dir else {
        return Ok(LoggingGuard {
            _file_guards: Vec::new(),
            log_dir: None,
        });
    };

    let now = chrono::Utc::now();
    let run_folder = base_log_dir.join(format!("run_{}", now.format(files::RUN_TIMESTAMP_FORMAT)));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    files::cleanup_old_logs(base_log_dir, config.retention_days, config.retention_runs, now)?;

    let appender = tracing_appender::rolling::never(&run_folder, "spikegen.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(env_filter(filter)?)
        .boxed();
    layers.push(file_layer);

    Ok(LoggingGuard {
        _file_guards: vec![guard],
        log_dir: Some(run_folder),
    })
}

#[cfg(feature = "file-logging")]
mod files {
    use anyhow::Result;
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use std::path::{Path, PathBuf};

    pub(super) const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    fn run_timestamp(dir_name: &str) -> Option<DateTime<Utc>> {
        let stamp = dir_name.strip_prefix("run_")?;
        NaiveDateTime::parse_from_str(stamp, RUN_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Remove expired run folders, then the oldest beyond `retention_runs`
    ///
    /// Returns the number of folders removed.
    pub(super) fn cleanup_old_logs(
        base_log_dir: &Path,
        retention_days: u64,
        retention_runs: usize,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if !base_log_dir.exists() {
            return Ok(0);
        }
        let cutoff = now - chrono::Duration::days(retention_days as i64);

        let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
        for entry in std::fs::read_dir(base_log_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let stamp = path.file_name().and_then(|n| n.to_str()).and_then(run_timestamp);
            if let Some(stamp) = stamp {
                runs.push((path, stamp));
            }
        }
        runs.sort_by_key(|(_, stamp)| *stamp);

        let (expired, kept): (Vec<_>, Vec<_>) =
            runs.into_iter().partition(|(_, stamp)| *stamp < cutoff);
        let excess = kept.len().saturating_sub(retention_runs);

        let mut removed = 0;
        for (path, _) in expired.iter().chain(kept.iter().take(excess)) {
            match std::fs::remove_dir_all(path) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                ),
            }
        }
        Ok(removed)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        assert!(console_layer("spikegen=loud", LogFormat::Text).is_err());
        assert!(console_layer("spikegen_models=debug,info", LogFormat::Compact).is_ok());
    }

    #[test]
    fn test_subscriber_installed_once() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-spikegen-models".to_string()]);
        let guard = init_logging_default(&flags).unwrap();
        assert!(guard.log_dir().is_none());
        assert!(init_logging_default(&flags).is_err());
    }
}
