// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Model Manifests
//!
//! Data-declared models, so users can extend the library without writing
//! Rust. A manifest mirrors the record shapes; strategies are referenced by
//! their built-in name.
//!
//! ```toml
//! [[neurons]]
//! name = "leaky"
//! variables = [{ name = "V", type = "scalar" }]
//! parameters = ["tau"]
//! sim = "$(V) -= $(V) / $(tau) * $(DT);"
//! threshold = "$(V) > 1.0"
//!
//! [[postsynaptic]]
//! name = "slow_decay"
//! parameters = ["tau", "E"]
//! strategy = "exp_decay"
//! decay = "$(inSyn) *= $(expDecay);"
//! to_current = "$(inSyn) * ($(E) - $(V))"
//! ```

use crate::derived::DerivedParameterStrategy;
use crate::error::Result;
use crate::record::{NeuronModel, PostSynapticModel, WeightUpdateModel};
use crate::types::Variable;
use serde::{Deserialize, Serialize};

/// Models to register on top of the standard library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelManifest {
    pub neurons: Vec<NeuronDefinition>,
    pub postsynaptic: Vec<PostSynapticDefinition>,
    pub weight_updates: Vec<WeightUpdateDefinition>,
}

impl ModelManifest {
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty() && self.postsynaptic.is_empty() && self.weight_updates.is_empty()
    }
}

/// Fields every definition shares
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreDefinition {
    pub name: String,
    pub variables: Vec<Variable>,
    pub parameters: Vec<String>,
    /// Defaults to the strategy's standard names when omitted
    pub derived_parameters: Vec<String>,
    pub strategy: Option<String>,
}

impl CoreDefinition {
    fn strategy(&self) -> Result<Option<DerivedParameterStrategy>> {
        self.strategy
            .as_deref()
            .map(DerivedParameterStrategy::from_name)
            .transpose()
    }

    fn derived_names(&self, strategy: Option<&DerivedParameterStrategy>) -> Vec<String> {
        match strategy {
            Some(s) if self.derived_parameters.is_empty() => {
                s.default_derived_names().iter().map(|n| n.to_string()).collect()
            }
            _ => self.derived_parameters.clone(),
        }
    }
}

/// Applies the shared fields to any record builder
macro_rules! apply_core {
    ($builder:expr, $core:expr) => {{
        let strategy = $core.strategy()?;
        let mut builder = $builder
            .variables($core.variables.iter().cloned())
            .parameters($core.parameters.as_slice())
            .derived_parameters($core.derived_names(strategy.as_ref()).as_slice());
        if let Some(strategy) = strategy {
            builder = builder.strategy(strategy);
        }
        builder
    }};
}

/// `threshold` is required
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeuronDefinition {
    #[serde(flatten)]
    pub core: CoreDefinition,
    #[serde(default)]
    pub sim: String,
    pub threshold: String,
    #[serde(default)]
    pub reset: Option<String>,
    #[serde(default)]
    pub extra_globals: Vec<Variable>,
}

impl NeuronDefinition {
    /// Build and validate the record
    pub fn to_model(&self) -> Result<NeuronModel> {
        let mut builder = apply_core!(NeuronModel::builder(&self.core.name), self.core)
            .sim_code(&self.sim)
            .threshold_code(&self.threshold);
        if let Some(reset) = &self.reset {
            builder = builder.reset_code(reset);
        }
        for global in &self.extra_globals {
            builder = builder.extra_global(global.clone());
        }
        builder.build()
    }
}

/// `to_current` is required
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSynapticDefinition {
    #[serde(flatten)]
    pub core: CoreDefinition,
    #[serde(default)]
    pub decay: String,
    pub to_current: String,
}

impl PostSynapticDefinition {
    pub fn to_model(&self) -> Result<PostSynapticModel> {
        apply_core!(PostSynapticModel::builder(&self.core.name), self.core)
            .decay_code(&self.decay)
            .to_current_code(&self.to_current)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightUpdateDefinition {
    #[serde(flatten)]
    pub core: CoreDefinition,
    pub sim: String,
    pub event: Option<String>,
    pub event_threshold: Option<String>,
    pub learn_post: Option<String>,
    pub needs_pre_spike_time: bool,
    pub needs_post_spike_time: bool,
}

impl WeightUpdateDefinition {
    pub fn to_model(&self) -> Result<WeightUpdateModel> {
        let mut builder = apply_core!(WeightUpdateModel::builder(&self.core.name), self.core)
            .sim_code(&self.sim)
            .needs_pre_spike_time(self.needs_pre_spike_time)
            .needs_post_spike_time(self.needs_post_spike_time);
        if let Some(event) = &self.event {
            builder = builder.event_code(event);
        }
        if let Some(threshold) = &self.event_threshold {
            builder = builder.event_threshold_code(threshold);
        }
        if let Some(learn_post) = &self.learn_post {
            builder = builder.learn_post_code(learn_post);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::record::ModelRecord;

    const MANIFEST: &str = r#"
[[neurons]]
name = "leaky"
variables = [{ name = "V", type = "scalar" }, { name = "count", type = "unsigned int" }]
parameters = ["tau"]
sim = "$(V) -= $(V) / $(tau) * $(DT);"
threshold = "$(V) > 1.0"
reset = "$(V) = 0.0; $(count) += 1;"

[[postsynaptic]]
name = "slow_decay"
parameters = ["tau", "E"]
strategy = "exp_decay"
decay = "$(inSyn) *= $(expDecay);"
to_current = "$(inSyn) * ($(E) - $(V))"

[[weight_updates]]
name = "gated"
variables = [{ name = "g", type = "scalar" }]
event = "$(addtoinSyn) = $(g); $(updatelinsyn);"
event_threshold = "$(V_pre) > -40.0"
"#;

    #[test]
    fn test_manifest_definitions_build_records() {
        let manifest: ModelManifest = toml::from_str(MANIFEST).unwrap();
        assert!(!manifest.is_empty());

        let neuron = manifest.neurons[0].to_model().unwrap();
        assert_eq!(neuron.variables()[1].ty.to_string(), "unsigned int");
        assert!(neuron.reset_code().is_some());

        let ps = manifest.postsynaptic[0].to_model().unwrap();
        assert_eq!(ps.derived_parameters(), &["expDecay"]);
        assert_eq!(ps.derive_parameters(&[1.0, 0.0], 1.0).unwrap(), vec![(-1.0f64).exp()]);

        let wu = manifest.weight_updates[0].to_model().unwrap();
        assert!(wu.is_event_driven());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let definition = PostSynapticDefinition {
            core: CoreDefinition {
                name: "bad".to_string(),
                parameters: vec!["tau".to_string()],
                strategy: Some("alpha".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            definition.to_model().unwrap_err(),
            ModelError::UnknownStrategy("alpha".to_string())
        );
    }

    #[test]
    fn test_required_code_keys() {
        let err = toml::from_str::<ModelManifest>(
            r#"
[[neurons]]
name = "typo"
variables = [{ name = "V", type = "scalar" }]
treshold = "$(V) > 1.0"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("threshold"), "{}", err);

        let err = toml::from_str::<ModelManifest>(
            r#"
[[postsynaptic]]
name = "no_current"
decay = "$(inSyn) *= 0.5;"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("to_current"), "{}", err);
    }

    #[test]
    fn test_blank_threshold_rejected() {
        let manifest: ModelManifest = toml::from_str(
            r#"
[[neurons]]
name = "blank"
variables = [{ name = "V", type = "scalar" }]
threshold = " "
"#,
        )
        .unwrap();
        assert_eq!(
            manifest.neurons[0].to_model().unwrap_err(),
            ModelError::MissingCode {
                model: "blank".to_string(),
                slot: "threshold".to_string(),
            }
        );
    }

    #[test]
    fn test_event_without_threshold_rejected() {
        let definition = WeightUpdateDefinition {
            core: CoreDefinition {
                name: "half".to_string(),
                ..Default::default()
            },
            event: Some("$(updatelinsyn);".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            definition.to_model().unwrap_err(),
            ModelError::IncompleteEvent { .. }
        ));
    }
}
