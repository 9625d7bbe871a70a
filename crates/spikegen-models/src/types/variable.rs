// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named, typed model state

use super::var_type::VarType;
use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// A per-instance state variable (or per-run extra global parameter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: VarType,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: VarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Shorthand for a `scalar` variable
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, VarType::Scalar)
    }

    /// Build variables from positionally matched name and type lists
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if the lists differ in length, `UnknownVarType` if a
    /// type name cannot be parsed.
    pub fn zip<N, T>(names: &[N], types: &[T]) -> Result<Vec<Variable>>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if names.len() != types.len() {
            return Err(ModelError::LengthMismatch {
                names: names.len(),
                types: types.len(),
            });
        }
        names
            .iter()
            .zip(types)
            .map(|(name, ty)| Ok(Variable::new(name.as_ref(), VarType::parse(ty.as_ref())?)))
            .collect()
    }
}
