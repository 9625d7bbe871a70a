// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron model records

use super::{require_code, CodeSlot, ModelCore, ModelKind, ModelRecord};
use crate::error::Result;
use crate::template::CodeTemplate;
use crate::types::Variable;
use serde::Serialize;

/// Neuron dynamics: per-timestep update plus spike condition
#[derive(Debug, Clone, Serialize)]
pub struct NeuronModel {
    #[serde(flatten)]
    core: ModelCore,
    sim: CodeTemplate,
    threshold: CodeTemplate,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset: Option<CodeTemplate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra_globals: Vec<Variable>,
}

impl NeuronModel {
    pub fn builder(name: impl Into<String>) -> NeuronModelBuilder {
        NeuronModelBuilder {
            core: ModelCore::new(name.into()),
            sim: String::new(),
            threshold: String::new(),
            reset: None,
            extra_globals: Vec::new(),
        }
    }

    /// Per-timestep state update
    pub fn sim_code(&self) -> &CodeTemplate {
        &self.sim
    }

    /// Boolean expression signalling a spike
    pub fn threshold_code(&self) -> &CodeTemplate {
        &self.threshold
    }

    pub fn reset_code(&self) -> Option<&CodeTemplate> {
        self.reset.as_ref()
    }
}

impl ModelRecord for NeuronModel {
    const KIND: ModelKind = ModelKind::Neuron;

    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn code_fragments(&self) -> Vec<(CodeSlot, &CodeTemplate)> {
        let mut fragments = vec![(CodeSlot::Sim, &self.sim), (CodeSlot::Threshold, &self.threshold)];
        if let Some(reset) = &self.reset {
            fragments.push((CodeSlot::Reset, reset));
        }
        fragments
    }

    fn extra_globals(&self) -> &[Variable] {
        &self.extra_globals
    }
}

/// Validating builder for [`NeuronModel`]
#[derive(Debug, Clone)]
pub struct NeuronModelBuilder {
    core: ModelCore,
    sim: String,
    threshold: String,
    reset: Option<String>,
    extra_globals: Vec<Variable>,
}

impl NeuronModelBuilder {
    core_builder_methods!();

    pub fn sim_code(mut self, code: impl Into<String>) -> Self {
        self.sim = code.into();
        self
    }

    pub fn threshold_code(mut self, code: impl Into<String>) -> Self {
        self.threshold = code.into();
        self
    }

    pub fn reset_code(mut self, code: impl Into<String>) -> Self {
        self.reset = Some(code.into());
        self
    }

    /// Per-run (not per-instance) global parameter
    pub fn extra_global(mut self, variable: Variable) -> Self {
        self.extra_globals.push(variable);
        self
    }

    pub fn build(self) -> Result<NeuronModel> {
        require_code(&self.core, CodeSlot::Threshold, &self.threshold)?;
        let model = NeuronModel {
            core: self.core,
            sim: CodeTemplate::parse(&self.sim)?,
            threshold: CodeTemplate::parse(&self.threshold)?,
            reset: self.reset.as_deref().map(CodeTemplate::parse).transpose()?,
            extra_globals: self.extra_globals,
        };
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::DerivedParameterStrategy;
    use crate::error::ModelError;
    use crate::types::VarType;

    fn base() -> NeuronModelBuilder {
        NeuronModel::builder("lif")
            .variable(Variable::scalar("V"))
            .parameters(&["Vrest", "tau"])
            .sim_code("$(V) += ($(Vrest) - $(V)) / $(tau) + $(Isyn);")
            .threshold_code("$(V) >= 1.0")
    }

    #[test]
    fn test_build_valid_neuron() {
        let model = base().reset_code("$(V) = $(Vrest);").build().unwrap();
        assert_eq!(model.name(), "lif");
        assert_eq!(model.code_fragments().len(), 3);
        assert!(model.fragment(CodeSlot::Reset).is_some());
        assert!(model.fragment(CodeSlot::Decay).is_none());
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = base().reset_code("$(V) = $(Vreset);").build().unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownPlaceholder {
                model: "lif".to_string(),
                slot: "reset".to_string(),
                placeholder: "Vreset".to_string(),
            }
        );
    }

    #[test]
    fn test_weight_update_symbol_rejected_in_neuron() {
        let err = base().sim_code("$(addtoinSyn) = $(V);").build().unwrap_err();
        assert!(matches!(err, ModelError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn test_extra_globals_are_referencable() {
        let model = base()
            .extra_global(Variable::new("rates", VarType::parse("uint64_t *").unwrap()))
            .sim_code("$(V) = *($(rates) + $(id));")
            .build()
            .unwrap();
        assert_eq!(model.extra_globals().len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = base().parameter("V").build().unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName { name, .. } if name == "V"));
    }

    #[test]
    fn test_partner_suffix_reserved() {
        let err = base().variable(Variable::scalar("x_pre")).build().unwrap_err();
        assert!(matches!(err, ModelError::ReservedName { .. }));
    }

    #[test]
    fn test_context_symbol_names_reserved() {
        let err = base().variable(Variable::scalar("t")).build().unwrap_err();
        assert!(matches!(err, ModelError::ReservedName { name, .. } if name == "t"));

        let err = base().parameter("Isyn").build().unwrap_err();
        assert!(matches!(err, ModelError::ReservedName { name, .. } if name == "Isyn"));
    }

    #[test]
    fn test_derived_without_strategy_rejected() {
        let err = base().derived_parameters(&["k"]).build().unwrap_err();
        assert_eq!(err, ModelError::MissingStrategy { model: "lif".to_string() });
    }

    #[test]
    fn test_strategy_arity_checked() {
        let err = base()
            .derived_parameters(&["ip0", "ip1"])
            .strategy(DerivedParameterStrategy::Rulkov)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::DerivedArityMismatch { expected: 3, actual: 2, .. }));

        let err = base()
            .derived_parameters(&["ip0", "ip1", "ip2"])
            .strategy(DerivedParameterStrategy::Rulkov)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::ParameterArityMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_malformed_template_rejected() {
        let err = base().threshold_code("$(V >= 1").build().unwrap_err();
        assert!(matches!(err, ModelError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_missing_threshold_rejected() {
        let err = NeuronModel::builder("silent")
            .variable(Variable::scalar("V"))
            .sim_code("$(V) += $(Isyn);")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingCode {
                model: "silent".to_string(),
                slot: "threshold".to_string(),
            }
        );

        let err = base().threshold_code("  \n").build().unwrap_err();
        assert!(matches!(err, ModelError::MissingCode { slot, .. } if slot == "threshold"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = NeuronModel::builder(" ").threshold_code("0").build().unwrap_err();
        assert_eq!(err, ModelError::EmptyName);
    }
}
