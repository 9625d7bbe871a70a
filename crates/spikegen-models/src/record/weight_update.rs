// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic weight update and plasticity records

use super::{CodeSlot, ModelCore, ModelKind, ModelRecord};
use crate::error::{ModelError, Result};
use crate::template::{CodeTemplate, Partner};
use serde::Serialize;

/// Synaptic transmission and learning rule
///
/// `sim` runs on each presynaptic spike. An event-driven synapse instead (or
/// additionally) runs `event` whenever `event_threshold` holds. `learn_post`
/// runs on each postsynaptic spike.
///
/// The spike time flags cost the generator a persistent per-neuron timestamp
/// array, so each flag must be set exactly when the code references the
/// matching `$(sT_pre)`/`$(sT_post)`. A reference without its flag and a
/// flag without any reference are both rejected.
#[derive(Debug, Clone, Serialize)]
pub struct WeightUpdateModel {
    #[serde(flatten)]
    core: ModelCore,
    sim: CodeTemplate,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<CodeTemplate>,
    #[serde(rename = "eventThreshold", skip_serializing_if = "Option::is_none")]
    event_threshold: Option<CodeTemplate>,
    #[serde(rename = "learnPost", skip_serializing_if = "Option::is_none")]
    learn_post: Option<CodeTemplate>,
    needs_pre_spike_time: bool,
    needs_post_spike_time: bool,
}

impl WeightUpdateModel {
    pub fn builder(name: impl Into<String>) -> WeightUpdateModelBuilder {
        WeightUpdateModelBuilder {
            core: ModelCore::new(name.into()),
            sim: String::new(),
            event: None,
            event_threshold: None,
            learn_post: None,
            needs_pre_spike_time: false,
            needs_post_spike_time: false,
        }
    }

    /// Code run on a presynaptic spike
    pub fn sim_code(&self) -> &CodeTemplate {
        &self.sim
    }

    pub fn event_code(&self) -> Option<&CodeTemplate> {
        self.event.as_ref()
    }

    pub fn event_threshold_code(&self) -> Option<&CodeTemplate> {
        self.event_threshold.as_ref()
    }

    pub fn learn_post_code(&self) -> Option<&CodeTemplate> {
        self.learn_post.as_ref()
    }

    pub fn needs_pre_spike_time(&self) -> bool {
        self.needs_pre_spike_time
    }

    pub fn needs_post_spike_time(&self) -> bool {
        self.needs_post_spike_time
    }

    /// Event-driven (graded) synapse
    pub fn is_event_driven(&self) -> bool {
        self.event_threshold.is_some()
    }
}

impl ModelRecord for WeightUpdateModel {
    const KIND: ModelKind = ModelKind::WeightUpdate;

    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn code_fragments(&self) -> Vec<(CodeSlot, &CodeTemplate)> {
        let mut fragments = vec![(CodeSlot::Sim, &self.sim)];
        let optional = [
            (CodeSlot::Event, &self.event),
            (CodeSlot::EventThreshold, &self.event_threshold),
            (CodeSlot::LearnPost, &self.learn_post),
        ];
        for (slot, template) in optional {
            if let Some(template) = template {
                fragments.push((slot, template));
            }
        }
        fragments
    }

    fn needs_spike_time(&self, partner: Partner) -> bool {
        match partner {
            Partner::Pre => self.needs_pre_spike_time,
            Partner::Post => self.needs_post_spike_time,
        }
    }
}

/// Validating builder for [`WeightUpdateModel`]
#[derive(Debug, Clone)]
pub struct WeightUpdateModelBuilder {
    core: ModelCore,
    sim: String,
    event: Option<String>,
    event_threshold: Option<String>,
    learn_post: Option<String>,
    needs_pre_spike_time: bool,
    needs_post_spike_time: bool,
}

impl WeightUpdateModelBuilder {
    core_builder_methods!();

    pub fn sim_code(mut self, code: impl Into<String>) -> Self {
        self.sim = code.into();
        self
    }

    /// Presynaptic event code and the predicate gating it
    pub fn event(mut self, code: impl Into<String>, threshold: impl Into<String>) -> Self {
        self.event = Some(code.into());
        self.event_threshold = Some(threshold.into());
        self
    }

    pub fn event_code(mut self, code: impl Into<String>) -> Self {
        self.event = Some(code.into());
        self
    }

    pub fn event_threshold_code(mut self, code: impl Into<String>) -> Self {
        self.event_threshold = Some(code.into());
        self
    }

    pub fn learn_post_code(mut self, code: impl Into<String>) -> Self {
        self.learn_post = Some(code.into());
        self
    }

    pub fn needs_pre_spike_time(mut self, needed: bool) -> Self {
        self.needs_pre_spike_time = needed;
        self
    }

    pub fn needs_post_spike_time(mut self, needed: bool) -> Self {
        self.needs_post_spike_time = needed;
        self
    }

    pub fn build(self) -> Result<WeightUpdateModel> {
        if self.event.is_some() != self.event_threshold.is_some() {
            return Err(ModelError::IncompleteEvent {
                model: self.core.name().to_string(),
            });
        }
        let parse = |code: &Option<String>| code.as_deref().map(CodeTemplate::parse).transpose();
        let model = WeightUpdateModel {
            sim: CodeTemplate::parse(&self.sim)?,
            event: parse(&self.event)?,
            event_threshold: parse(&self.event_threshold)?,
            learn_post: parse(&self.learn_post)?,
            core: self.core,
            needs_pre_spike_time: self.needs_pre_spike_time,
            needs_post_spike_time: self.needs_post_spike_time,
        };
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variable;

    fn plastic() -> WeightUpdateModelBuilder {
        WeightUpdateModel::builder("plastic")
            .variable(Variable::scalar("g"))
            .parameter("tauShift")
            .sim_code("$(addtoinSyn) = $(g);\n$(updatelinsyn);\nscalar dt = $(sT_post) - $(t) - ($(tauShift));")
            .learn_post_code("scalar dt = $(t) - ($(sT_pre)) - ($(tauShift));")
    }

    #[test]
    fn test_spike_time_flags_required() {
        let err = plastic().needs_pre_spike_time(true).build().unwrap_err();
        assert_eq!(
            err,
            ModelError::UndeclaredSpikeTime {
                model: "plastic".to_string(),
                placeholder: "sT_post".to_string(),
            }
        );

        let model = plastic()
            .needs_pre_spike_time(true)
            .needs_post_spike_time(true)
            .build()
            .unwrap();
        assert!(model.needs_spike_time(Partner::Pre));
        assert!(model.needs_spike_time(Partner::Post));
    }

    #[test]
    fn test_unreferenced_spike_time_flag_rejected() {
        let err = WeightUpdateModel::builder("static")
            .variable(Variable::scalar("g"))
            .sim_code("$(addtoinSyn) = $(g);\n$(updatelinsyn);")
            .needs_post_spike_time(true)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnusedSpikeTime {
                model: "static".to_string(),
                partner: "post".to_string(),
            }
        );

        let err = plastic()
            .learn_post_code("$(g) += 0.0;")
            .needs_pre_spike_time(true)
            .needs_post_spike_time(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnusedSpikeTime { partner, .. } if partner == "pre"));
    }

    #[test]
    fn test_event_requires_threshold() {
        let err = WeightUpdateModel::builder("graded")
            .event_code("$(addtoinSyn) = 1.0;")
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::IncompleteEvent { model: "graded".to_string() });
    }

    #[test]
    fn test_event_driven() {
        let model = WeightUpdateModel::builder("graded")
            .parameter("Epre")
            .event("$(addtoinSyn) = 1.0;\n$(updatelinsyn);\n", "$(V_pre) > $(Epre)")
            .build()
            .unwrap();
        assert!(model.is_event_driven());
        assert_eq!(model.code_fragments().len(), 3);
    }

    #[test]
    fn test_neuron_symbol_rejected() {
        let err = WeightUpdateModel::builder("bad")
            .sim_code("$(addtoinSyn) = $(Isyn);")
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownPlaceholder { placeholder, .. } if placeholder == "Isyn"));
    }
}
