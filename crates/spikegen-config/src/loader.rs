// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SpikegenConfig};
use spikegen_models::{ModelManifest, Precision};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "spikegen_configuration.toml";

/// Find the spikegen configuration file
///
/// Search order:
/// 1. `SPIKEGEN_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKEGEN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKEGEN_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "spikegen configuration file '{}' not found in any of these locations:\n{}\n\nSet SPIKEGEN_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikegenConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpikegenConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKEGEN_PRECISION` -> `model.precision`
/// - `SPIKEGEN_DT` -> `model.dt`
/// - `SPIKEGEN_MANIFEST` -> `model.manifest`
/// - `SPIKEGEN_LOG_LEVEL` -> `logging.level`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut SpikegenConfig) {
    let vars: HashMap<String, String> = [
        ("SPIKEGEN_PRECISION", "precision"),
        ("SPIKEGEN_DT", "dt"),
        ("SPIKEGEN_MANIFEST", "manifest"),
        ("SPIKEGEN_LOG_LEVEL", "log_level"),
    ]
    .into_iter()
    .filter_map(|(var, key)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();
    apply_cli_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"dt": "0.05", "precision": "double"}`)
pub fn apply_cli_overrides(config: &mut SpikegenConfig, cli_args: &HashMap<String, String>) {
    if let Some(precision) = cli_args.get("precision").and_then(|v| Precision::from_name(v)) {
        config.model.precision = precision;
    }
    if let Some(value) = cli_args.get("dt") {
        if let Ok(dt) = value.trim().parse::<f64>() {
            config.model.dt = dt;
        }
    }
    if let Some(value) = cli_args.get("manifest") {
        config.model.manifest = Some(PathBuf::from(value));
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.to_lowercase();
    }
}

/// Read a user model manifest
///
/// # Errors
///
/// `IoError` if the file cannot be read, `ManifestError` if it is not a
/// valid manifest
pub fn load_model_manifest(path: &Path) -> ConfigResult<ModelManifest> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ConfigError::ManifestError(format!("{}: {}", path.display(), e)))
}
