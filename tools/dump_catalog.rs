// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Print the model library as JSON.
//!
//! Builds the standard library, registers the configured manifest, freezes
//! it, and optionally evaluates derived parameters for named models:
//!
//! ```text
//! dump_catalog --params rulkov_map=60,3,-2.468,2.64 --dt 0.5 --debug-spikegen-models
//! ```

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use spikegen::config::{
    apply_cli_overrides, apply_environment_overrides, load_config, load_model_manifest,
    validate_config, ConfigError, SpikegenConfig,
};
use spikegen::models::{ModelCatalog, ModelLibrary, ModelRecord};
use spikegen::observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingConfig};

#[derive(Debug, Default)]
struct Args {
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
    params: Vec<(String, Vec<f64>)>,
}

fn usage() -> String {
    format!(
        "Usage: dump_catalog [--config <path>] [--dt <dt>] [--precision float|double]\n\
         \x20                   [--manifest <path>] [--log-level <level>]\n\
         \x20                   [--params <model>=<v,v,..>]...\n\n{}",
        debug_flags_help()
    )
}

/// Parse `<model>=<v,v,..>`
fn parse_param_spec(spec: &str) -> Result<(String, Vec<f64>)> {
    let (model, values) = spec
        .split_once('=')
        .with_context(|| format!("Expected <model>=<v,v,..>, got '{}'", spec))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .with_context(|| format!("Invalid parameter value '{}' for {}", v, model))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((model.trim().to_string(), values))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{} requires a value\n\n{}", flag, usage()))
        };
        match arg.as_str() {
            "--config" => parsed.config_path = Some(PathBuf::from(value("--config")?)),
            "--dt" => {
                parsed.overrides.insert("dt".to_string(), value("--dt")?);
            }
            "--precision" => {
                parsed.overrides.insert("precision".to_string(), value("--precision")?);
            }
            "--manifest" => {
                parsed.overrides.insert("manifest".to_string(), value("--manifest")?);
            }
            "--log-level" => {
                parsed.overrides.insert("log_level".to_string(), value("--log-level")?);
            }
            "--params" => parsed.params.push(parse_param_spec(&value("--params")?)?),
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other if other.starts_with("--debug-") => {}
            other => bail!("Unknown argument: {}\n\n{}", other, usage()),
        }
    }
    Ok(parsed)
}

/// Load the config file, or fall back to defaults when none exists
fn resolve_config(args: &Args) -> Result<SpikegenConfig> {
    let config = match load_config(args.config_path.as_deref(), Some(&args.overrides)) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) if args.config_path.is_none() => {
            let mut config = SpikegenConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &args.overrides);
            config
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    validate_config(&config)?;
    Ok(config)
}

#[derive(Debug, Serialize)]
struct DerivedReport {
    model: String,
    kind: String,
    derived: Map<String, Value>,
}

fn derive_in<M: ModelRecord>(
    catalog: &ModelCatalog<M>,
    name: &str,
    values: &[f64],
    dt: f64,
) -> Option<Result<DerivedReport>> {
    let handle = catalog.find(name)?;
    let report = catalog.get(handle).and_then(|model| {
        let derived = model.derive_parameters(values, dt)?;
        Ok(DerivedReport {
            model: name.to_string(),
            kind: M::KIND.to_string(),
            derived: model
                .derived_parameters()
                .iter()
                .cloned()
                .zip(derived.into_iter().map(Value::from))
                .collect(),
        })
    });
    Some(report.with_context(|| format!("Failed to derive parameters for {}", name)))
}

fn derive_report(library: &ModelLibrary, name: &str, values: &[f64], dt: f64) -> Result<DerivedReport> {
    derive_in(library.neurons(), name, values, dt)
        .or_else(|| derive_in(library.postsynaptic_models(), name, values, dt))
        .or_else(|| derive_in(library.weight_updates(), name, values, dt))
        .with_context(|| format!("No model named '{}'", name))?
}

fn main() -> Result<()> {
    let flags = parse_debug_flags();
    let args = parse_args(env::args().skip(1))?;
    let config = resolve_config(&args)?;

    let logging = LoggingConfig::default()
        .with_level(config.logging.level.clone())
        .with_log_dir(config.logging.log_dir.clone());
    let _guard = init_logging(&flags, &logging)?;

    let mut library = ModelLibrary::build().context("Failed to bootstrap model library")?;
    if let Some(path) = &config.model.manifest {
        let manifest = load_model_manifest(path)?;
        if manifest.is_empty() {
            warn!("Manifest {} declares no models", path.display());
        }
        library
            .extend_from_manifest(&manifest)
            .with_context(|| format!("Failed to register models from {}", path.display()))?;
    }
    let library = library.freeze();

    let derived = args
        .params
        .iter()
        .map(|(name, values)| derive_report(&library, name, values, config.model.dt))
        .collect::<Result<Vec<_>>>()?;
    info!("Derived parameters for {} models at dt = {}", derived.len(), config.model.dt);

    let output = serde_json::json!({
        "precision": config.model.precision,
        "scalar_type": config.model.precision.c_type(),
        "scalar_min": config.model.precision.scalar_min(),
        "dt": config.model.dt,
        "library": &*library,
        "derived": derived,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_param_spec() {
        let (model, values) = parse_param_spec("exp_decay=5.0, 0").unwrap();
        assert_eq!(model, "exp_decay");
        assert_eq!(values, vec![5.0, 0.0]);
        assert!(parse_param_spec("exp_decay").is_err());
        assert!(parse_param_spec("exp_decay=x").is_err());
    }

    #[test]
    fn test_parse_args_collects_overrides() {
        let parsed = parse_args(args(&[
            "--dt",
            "0.5",
            "--debug-spikegen-models",
            "--params",
            "rulkov_map=1,2,3,4",
        ]))
        .unwrap();
        assert_eq!(parsed.overrides.get("dt").map(String::as_str), Some("0.5"));
        assert_eq!(parsed.params.len(), 1);
        assert!(parse_args(args(&["--frobnicate"])).is_err());
        assert!(parse_args(args(&["--dt"])).is_err());
    }

    #[test]
    fn test_derive_report_searches_all_catalogs() {
        let library = ModelLibrary::build().unwrap().freeze();
        let report = derive_report(&library, "exp_decay", &[10.0, 0.0], 1.0).unwrap();
        assert_eq!(report.kind, "postsynaptic");
        let value = report.derived["expDecay"].as_f64().unwrap();
        assert!((value - (-0.1f64).exp()).abs() < 1e-12);

        assert!(derive_report(&library, "missing", &[], 1.0).is_err());
        assert!(derive_report(&library, "rulkov_map", &[1.0], 1.0).is_err());
    }
}
