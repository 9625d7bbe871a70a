// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Model Records
//!
//! A model record describes one reusable kind of simulatable unit: its
//! per-instance state, its raw parameters, the derived parameters computed
//! once per run, and the code fragments the kernel generator instantiates.
//!
//! There are three record kinds:
//! - [`NeuronModel`]: membrane dynamics and spike condition
//! - [`PostSynapticModel`]: integration of synaptic input into a current
//! - [`WeightUpdateModel`]: synaptic transmission and plasticity
//!
//! Records are built through validating builders and are immutable once
//! registered in a [`ModelCatalog`](crate::catalog::ModelCatalog).

/// Builder methods for the fields every record kind shares
macro_rules! core_builder_methods {
    () => {
        pub fn variable(mut self, variable: $crate::types::Variable) -> Self {
            self.core.push_variable(variable);
            self
        }

        pub fn variables(
            mut self,
            variables: impl IntoIterator<Item = $crate::types::Variable>,
        ) -> Self {
            for variable in variables {
                self.core.push_variable(variable);
            }
            self
        }

        pub fn parameter(mut self, name: impl Into<String>) -> Self {
            self.core.push_parameter(name.into());
            self
        }

        pub fn parameters<S: AsRef<str>>(mut self, names: &[S]) -> Self {
            for name in names {
                self.core.push_parameter(name.as_ref().to_string());
            }
            self
        }

        pub fn derived_parameters<S: AsRef<str>>(mut self, names: &[S]) -> Self {
            for name in names {
                self.core.push_derived(name.as_ref().to_string());
            }
            self
        }

        pub fn strategy(mut self, strategy: $crate::derived::DerivedParameterStrategy) -> Self {
            self.core.set_strategy(strategy);
            self
        }
    };
}

pub mod neuron;
pub mod postsynaptic;
pub mod weight_update;

pub use neuron::{NeuronModel, NeuronModelBuilder};
pub use postsynaptic::{PostSynapticModel, PostSynapticModelBuilder};
pub use weight_update::{WeightUpdateModel, WeightUpdateModelBuilder};

use crate::derived::DerivedParameterStrategy;
use crate::error::{ModelError, Result};
use crate::template::{is_declarable_name, CodeTemplate, ContextSymbol, Partner};
use crate::types::Variable;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Variant tag of a model record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Neuron,
    PostSynaptic,
    WeightUpdate,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelKind::Neuron => "neuron",
            ModelKind::PostSynaptic => "postsynaptic",
            ModelKind::WeightUpdate => "weight update",
        })
    }
}

/// Named slot a code fragment fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CodeSlot {
    #[serde(rename = "sim")]
    Sim,
    #[serde(rename = "threshold")]
    Threshold,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "decay")]
    Decay,
    #[serde(rename = "toCurrent")]
    ToCurrent,
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "eventThreshold")]
    EventThreshold,
    #[serde(rename = "learnPost")]
    LearnPost,
}

impl CodeSlot {
    pub fn name(&self) -> &'static str {
        match self {
            CodeSlot::Sim => "sim",
            CodeSlot::Threshold => "threshold",
            CodeSlot::Reset => "reset",
            CodeSlot::Decay => "decay",
            CodeSlot::ToCurrent => "toCurrent",
            CodeSlot::Event => "event",
            CodeSlot::EventThreshold => "eventThreshold",
            CodeSlot::LearnPost => "learnPost",
        }
    }
}

impl fmt::Display for CodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn serialize_strategy<S: Serializer>(
    strategy: &Option<DerivedParameterStrategy>,
    serializer: S,
) -> core::result::Result<S::Ok, S::Error> {
    match strategy {
        Some(s) => serializer.serialize_some(s.name()),
        None => serializer.serialize_none(),
    }
}

/// Fields shared by every record kind
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelCore {
    name: String,
    variables: Vec<Variable>,
    parameters: Vec<String>,
    derived_parameters: Vec<String>,
    #[serde(serialize_with = "serialize_strategy")]
    strategy: Option<DerivedParameterStrategy>,
}

impl ModelCore {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn push_variable(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub(crate) fn push_parameter(&mut self, name: String) {
        self.parameters.push(name);
    }

    pub(crate) fn push_derived(&mut self, name: String) {
        self.derived_parameters.push(name);
    }

    pub(crate) fn set_strategy(&mut self, strategy: DerivedParameterStrategy) {
        self.strategy = Some(strategy);
    }
}

/// Common behaviour of neuron, postsynaptic and weight-update records
pub trait ModelRecord: fmt::Debug + Serialize + Send + Sync + 'static {
    const KIND: ModelKind;

    fn core(&self) -> &ModelCore;

    /// Every code fragment the record defines, in slot order
    fn code_fragments(&self) -> Vec<(CodeSlot, &CodeTemplate)>;

    /// Per-run global parameters (neurons only)
    fn extra_globals(&self) -> &[Variable] {
        &[]
    }

    /// Whether the generator must keep the partner's last spike time
    fn needs_spike_time(&self, _partner: Partner) -> bool {
        false
    }

    fn name(&self) -> &str {
        &self.core().name
    }

    fn variables(&self) -> &[Variable] {
        &self.core().variables
    }

    fn parameters(&self) -> &[String] {
        &self.core().parameters
    }

    fn derived_parameters(&self) -> &[String] {
        &self.core().derived_parameters
    }

    fn strategy(&self) -> Option<&DerivedParameterStrategy> {
        self.core().strategy.as_ref()
    }

    fn fragment(&self, slot: CodeSlot) -> Option<&CodeTemplate> {
        self.code_fragments()
            .into_iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, t)| t)
    }

    fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters().iter().position(|p| p == name)
    }

    fn derived_parameter_index(&self, name: &str) -> Option<usize> {
        self.derived_parameters().iter().position(|p| p == name)
    }

    /// Compute all derived parameters for one instantiation
    ///
    /// `values` must hold one value per declared parameter, in declaration
    /// order. The strategy is called with each derived parameter's position.
    fn derive_parameters(&self, values: &[f64], dt: f64) -> Result<Vec<f64>> {
        let core = self.core();
        if values.len() != core.parameters.len() {
            return Err(ModelError::ParameterArityMismatch {
                model: core.name.clone(),
                expected: core.parameters.len(),
                actual: values.len(),
            });
        }
        match &core.strategy {
            None => Ok(Vec::new()),
            Some(strategy) => (0..core.derived_parameters.len())
                .map(|index| strategy.compute(index, values, dt))
                .collect(),
        }
    }

    /// Check structural consistency and placeholder references
    fn validate(&self) -> Result<()> {
        validate_record(self)
    }
}

/// Reject a required fragment that is empty or whitespace only
pub(crate) fn require_code(core: &ModelCore, slot: CodeSlot, code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(ModelError::MissingCode {
            model: core.name.clone(),
            slot: slot.to_string(),
        });
    }
    Ok(())
}

fn validate_record<M: ModelRecord + ?Sized>(record: &M) -> Result<()> {
    let core = record.core();
    let model = || core.name.clone();

    if core.name.trim().is_empty() {
        return Err(ModelError::EmptyName);
    }

    let mut seen = HashSet::new();
    let declared = core
        .variables
        .iter()
        .map(|v| v.name.as_str())
        .chain(core.parameters.iter().map(String::as_str))
        .chain(core.derived_parameters.iter().map(String::as_str))
        .chain(record.extra_globals().iter().map(|v| v.name.as_str()));
    for name in declared {
        if !is_declarable_name(name) {
            return Err(ModelError::ReservedName {
                model: model(),
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ModelError::DuplicateName {
                model: model(),
                name: name.to_string(),
            });
        }
    }

    match &core.strategy {
        None if !core.derived_parameters.is_empty() => {
            return Err(ModelError::MissingStrategy { model: model() })
        }
        None => {}
        Some(strategy) => {
            if core.derived_parameters.is_empty() {
                return Err(ModelError::UnexpectedDerivedParameters {
                    model: model(),
                    strategy: strategy.name().to_string(),
                });
            }
            if strategy.derived_count() != core.derived_parameters.len() {
                return Err(ModelError::DerivedArityMismatch {
                    model: model(),
                    strategy: strategy.name().to_string(),
                    expected: strategy.derived_count(),
                    actual: core.derived_parameters.len(),
                });
            }
            if core.parameters.len() < strategy.required_parameters() {
                return Err(ModelError::ParameterArityMismatch {
                    model: model(),
                    expected: strategy.required_parameters(),
                    actual: core.parameters.len(),
                });
            }
        }
    }

    let mut spike_times_used = HashSet::new();
    for (slot, template) in record.code_fragments() {
        for placeholder in template.placeholders() {
            if let Some(partner) = placeholder.spike_time_partner() {
                if !record.needs_spike_time(partner) {
                    return Err(ModelError::UndeclaredSpikeTime {
                        model: model(),
                        placeholder: placeholder.token(),
                    });
                }
                spike_times_used.insert(partner);
                continue;
            }
            if placeholder.partner.is_some() {
                continue;
            }
            if let Some(symbol) = ContextSymbol::from_placeholder(placeholder) {
                if symbol.available_to(M::KIND) {
                    continue;
                }
            }
            // Postsynaptic code may read the target neuron's state
            if seen.contains(placeholder.name.as_str()) || M::KIND == ModelKind::PostSynaptic {
                continue;
            }
            return Err(ModelError::UnknownPlaceholder {
                model: model(),
                slot: slot.to_string(),
                placeholder: placeholder.token(),
            });
        }
    }

    for partner in [Partner::Pre, Partner::Post] {
        if record.needs_spike_time(partner) && !spike_times_used.contains(&partner) {
            return Err(ModelError::UnusedSpikeTime {
                model: model(),
                partner: partner.suffix().trim_start_matches('_').to_string(),
            });
        }
    }

    Ok(())
}
