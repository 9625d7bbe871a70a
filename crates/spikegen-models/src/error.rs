// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for model description and registration

use crate::record::ModelKind;

/// Errors raised while describing, registering or preparing models.
///
/// All of these are configuration-time programmer errors. Callers are
/// expected to abort the generation run rather than continue with an
/// inconsistent model set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Derived parameter index {index} out of range for strategy '{strategy}' ({count} derived parameters)")]
    DerivedIndexOutOfRange {
        strategy: String,
        index: usize,
        count: usize,
    },

    #[error("Length mismatch: {names} variable names but {types} variable types")]
    LengthMismatch { names: usize, types: usize },

    #[error("Model '{model}': expected {expected} parameter values, got {actual}")]
    ParameterArityMismatch {
        model: String,
        expected: usize,
        actual: usize,
    },

    #[error("Model '{model}': strategy '{strategy}' computes {expected} derived parameters but {actual} are declared")]
    DerivedArityMismatch {
        model: String,
        strategy: String,
        expected: usize,
        actual: usize,
    },

    #[error("Model '{model}': declares derived parameters but has no strategy to compute them")]
    MissingStrategy { model: String },

    #[error("Model '{model}': strategy '{strategy}' is set but no derived parameters are declared")]
    UnexpectedDerivedParameters { model: String, strategy: String },

    #[error("Unknown {kind} model handle: {handle}")]
    UnknownHandle { kind: ModelKind, handle: usize },

    #[error("{kind} catalog is frozen; no further models can be registered")]
    CatalogFrozen { kind: ModelKind },

    #[error("A {kind} model named '{name}' is already registered")]
    DuplicateModelName { kind: ModelKind, name: String },

    #[error("Model '{model}': name '{name}' is declared more than once")]
    DuplicateName { model: String, name: String },

    #[error("Model names must not be empty")]
    EmptyName,

    #[error("Model '{model}': name '{name}' is reserved or not a valid identifier")]
    ReservedName { model: String, name: String },

    #[error("Model '{model}': {slot} code is required")]
    MissingCode { model: String, slot: String },

    #[error("Model '{model}': code references $({placeholder}) but the spike time flag is not set")]
    UndeclaredSpikeTime { model: String, placeholder: String },

    #[error("Model '{model}': {partner} spike time is requested but $(sT_{partner}) is never referenced")]
    UnusedSpikeTime { model: String, partner: String },

    #[error("Model '{model}': event code and event threshold must be declared together")]
    IncompleteEvent { model: String },

    #[error("Invalid template at byte {position}: {reason}")]
    InvalidTemplate { position: usize, reason: String },

    #[error("Unresolved placeholder: $({0})")]
    UnresolvedPlaceholder(String),

    #[error("Model '{model}': {slot} code references unknown name $({placeholder})")]
    UnknownPlaceholder {
        model: String,
        slot: String,
        placeholder: String,
    },

    #[error("Invalid condition '{condition}': {reason}")]
    InvalidCondition { condition: String, reason: String },

    #[error("Unknown variable type: '{0}'")]
    UnknownVarType(String),

    #[error("Unknown derived parameter strategy: '{0}'")]
    UnknownStrategy(String),
}

pub type Result<T> = core::result::Result<T, ModelError>;
