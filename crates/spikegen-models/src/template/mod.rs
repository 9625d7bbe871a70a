// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Code Templates
//!
//! Code fragments attached to model records are text templates consumed by
//! the kernel generator. References are written as placeholders:
//!
//! ```text
//! $(name)          variable, parameter, derived parameter, extra global or context symbol
//! $(t), $(DT)      current time and integration timestep
//! $(name_pre)      the presynaptic partner's `name` (dual-population constructs)
//! $(name_post)     the postsynaptic partner's `name`
//! $(sT_pre)        last presynaptic spike time (requires the model's flag)
//! $(sT_post)       last postsynaptic spike time (requires the model's flag)
//! ```
//!
//! Everything outside `$( )` is literal kernel code and is passed through
//! untouched.

pub mod code;
pub mod condition;

pub use code::{CodeTemplate, Segment};
pub use condition::{CmpOp, Condition, Operand};

use crate::record::ModelKind;
use serde::Serialize;
use std::fmt;

/// Which side of a synapse a qualified placeholder refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Partner {
    Pre,
    Post,
}

impl Partner {
    pub fn suffix(&self) -> &'static str {
        match self {
            Partner::Pre => "_pre",
            Partner::Post => "_post",
        }
    }

    /// Split a trailing `_pre`/`_post` qualifier off a placeholder name
    pub fn split(token: &str) -> (&str, Option<Partner>) {
        for partner in [Partner::Pre, Partner::Post] {
            if let Some(base) = token.strip_suffix(partner.suffix()) {
                if !base.is_empty() {
                    return (base, Some(partner));
                }
            }
        }
        (token, None)
    }
}

/// A single `$(...)` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Placeholder {
    pub name: String,
    pub partner: Option<Partner>,
}

impl Placeholder {
    /// Parse the text between `$(` and `)`
    pub fn from_token(token: &str) -> Self {
        let (name, partner) = Partner::split(token);
        Self {
            name: name.to_string(),
            partner,
        }
    }

    /// The placeholder text as written, without `$( )`
    pub fn token(&self) -> String {
        match self.partner {
            Some(partner) => format!("{}{}", self.name, partner.suffix()),
            None => self.name.clone(),
        }
    }

    /// Partner spike timestamp reference (`sT_pre` / `sT_post`)
    pub fn spike_time_partner(&self) -> Option<Partner> {
        match ContextSymbol::from_placeholder(self) {
            Some(ContextSymbol::SpikeTime(partner)) => Some(partner),
            _ => None,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$({})", self.token())
    }
}

/// Well-known simulation-context symbols supplied by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextSymbol {
    /// `t`: current simulation time
    Time,
    /// `DT`: integration timestep
    Timestep,
    /// `Isyn`: summed synaptic input current of a neuron
    InputCurrent,
    /// `id`: index of the neuron within its population
    NeuronIndex,
    /// `inSyn`: accumulated synaptic input of a postsynaptic population
    SynapticInput,
    /// `addtoinSyn`: amount a weight update adds to `inSyn`
    AddToInput,
    /// `updatelinsyn`: statement committing `addtoinSyn`
    UpdateInput,
    /// `sT_pre` / `sT_post`: partner's last spike time
    SpikeTime(Partner),
}

impl ContextSymbol {
    pub fn from_placeholder(placeholder: &Placeholder) -> Option<Self> {
        match (placeholder.name.as_str(), placeholder.partner) {
            ("sT", Some(partner)) => Some(Self::SpikeTime(partner)),
            (_, Some(_)) => None,
            ("t", None) => Some(Self::Time),
            ("DT", None) => Some(Self::Timestep),
            ("Isyn", None) => Some(Self::InputCurrent),
            ("id", None) => Some(Self::NeuronIndex),
            ("inSyn", None) => Some(Self::SynapticInput),
            ("addtoinSyn", None) => Some(Self::AddToInput),
            ("updatelinsyn", None) => Some(Self::UpdateInput),
            _ => None,
        }
    }

    /// Whether code of a given model kind may use this symbol
    pub fn available_to(&self, kind: ModelKind) -> bool {
        match self {
            Self::Time | Self::Timestep => true,
            Self::InputCurrent | Self::NeuronIndex => kind == ModelKind::Neuron,
            Self::SynapticInput => kind != ModelKind::Neuron,
            Self::AddToInput | Self::UpdateInput | Self::SpikeTime(_) => {
                kind == ModelKind::WeightUpdate
            }
        }
    }
}

/// Whether `name` is usable as a declared model name
///
/// Partner forms and generator-supplied symbols are excluded so that every
/// `$(name)` resolves to exactly one thing.
pub fn is_declarable_name(name: &str) -> bool {
    code::is_identifier(name)
        && Partner::split(name).1.is_none()
        && ContextSymbol::from_placeholder(&Placeholder::from_token(name)).is_none()
}
