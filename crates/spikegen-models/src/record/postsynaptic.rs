// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Postsynaptic integration records

use super::{require_code, CodeSlot, ModelCore, ModelKind, ModelRecord};
use crate::error::Result;
use crate::template::CodeTemplate;
use serde::Serialize;

/// How accumulated synaptic input decays and becomes a current
///
/// `decay` runs every step on `$(inSyn)`; `to_current` is an expression of
/// `$(inSyn)` and the target neuron's state giving the injected current.
#[derive(Debug, Clone, Serialize)]
pub struct PostSynapticModel {
    #[serde(flatten)]
    core: ModelCore,
    decay: CodeTemplate,
    #[serde(rename = "toCurrent")]
    to_current: CodeTemplate,
}

impl PostSynapticModel {
    pub fn builder(name: impl Into<String>) -> PostSynapticModelBuilder {
        PostSynapticModelBuilder {
            core: ModelCore::new(name.into()),
            decay: String::new(),
            to_current: String::new(),
        }
    }

    pub fn decay_code(&self) -> &CodeTemplate {
        &self.decay
    }

    pub fn to_current_code(&self) -> &CodeTemplate {
        &self.to_current
    }
}

impl ModelRecord for PostSynapticModel {
    const KIND: ModelKind = ModelKind::PostSynaptic;

    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn code_fragments(&self) -> Vec<(CodeSlot, &CodeTemplate)> {
        vec![
            (CodeSlot::Decay, &self.decay),
            (CodeSlot::ToCurrent, &self.to_current),
        ]
    }
}

/// Validating builder for [`PostSynapticModel`]
#[derive(Debug, Clone)]
pub struct PostSynapticModelBuilder {
    core: ModelCore,
    decay: String,
    to_current: String,
}

impl PostSynapticModelBuilder {
    core_builder_methods!();

    pub fn decay_code(mut self, code: impl Into<String>) -> Self {
        self.decay = code.into();
        self
    }

    pub fn to_current_code(mut self, code: impl Into<String>) -> Self {
        self.to_current = code.into();
        self
    }

    pub fn build(self) -> Result<PostSynapticModel> {
        require_code(&self.core, CodeSlot::ToCurrent, &self.to_current)?;
        let model = PostSynapticModel {
            core: self.core,
            decay: CodeTemplate::parse(&self.decay)?,
            to_current: CodeTemplate::parse(&self.to_current)?,
        };
        model.validate()?;
        Ok(model)
    }
}
