// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every problem is collected so a single run reports all of them.

use crate::{ConfigError, ConfigResult, SpikegenConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &SpikegenConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

fn collect_errors(config: &SpikegenConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    let dt = config.model.dt;
    if !dt.is_finite() || dt <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "model.dt".to_string(),
            reason: format!("must be a finite positive number, got {}", dt),
        });
    }

    if let Some(manifest) = &config.model.manifest {
        if manifest.as_os_str().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "model.manifest".to_string(),
            });
        }
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SpikegenConfig::default()).is_ok());
    }

    #[test]
    fn test_non_positive_dt() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let mut config = SpikegenConfig::default();
            config.model.dt = dt;
            let result = validate_config(&config);
            assert!(
                matches!(&result, Err(ConfigError::ValidationError(msg)) if msg.contains("model.dt")),
                "dt = {}",
                dt
            );
        }
    }

    #[test]
    fn test_empty_manifest_path() {
        let mut config = SpikegenConfig::default();
        config.model.manifest = Some(PathBuf::new());
        assert_eq!(
            collect_errors(&config),
            vec![ConfigValidationError::MissingRequired {
                field: "model.manifest".to_string()
            }]
        );
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut config = SpikegenConfig::default();
        config.model.dt = 0.0;
        config.logging.level = "verbose".to_string();

        let result = validate_config(&config);
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("model.dt"));
            assert!(msg.contains("logging.level"));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = SpikegenConfig::default();
        config.logging.level = "WARN".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
