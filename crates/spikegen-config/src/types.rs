// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Structs mapping to the sections of `spikegen_configuration.toml`.

use serde::{Deserialize, Serialize};
use spikegen_models::Precision;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikegenConfig {
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

/// Model preparation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Type bound to `scalar` in generated code
    pub precision: Precision,
    /// Integration timestep used when deriving parameters
    pub dt: f64,
    /// User model manifest registered on top of the standard library
    pub manifest: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            precision: Precision::Float,
            dt: 0.1,
            manifest: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for per-run log files (file logging only)
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}
