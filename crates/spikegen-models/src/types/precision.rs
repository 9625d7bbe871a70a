// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Floating point precision of generated kernels

use serde::{Deserialize, Serialize};

/// Precision bound to the `scalar` type in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Float,
    Double,
}

impl Precision {
    /// C type name emitted for `scalar`
    pub fn c_type(&self) -> &'static str {
        match self {
            Precision::Float => "float",
            Precision::Double => "double",
        }
    }

    /// Smallest positive normal value, bound to the `SCALAR_MIN` token
    pub fn scalar_min(&self) -> f64 {
        match self {
            Precision::Float => f32::MIN_POSITIVE as f64,
            Precision::Double => f64::MIN_POSITIVE,
        }
    }

    /// Size of one `scalar` in bytes
    pub fn scalar_size(&self) -> usize {
        match self {
            Precision::Float => 4,
            Precision::Double => 8,
        }
    }

    /// Parse a precision name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "float" | "single" => Some(Precision::Float),
            "double" => Some(Precision::Double),
            _ => None,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.c_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_min_follows_precision() {
        assert_eq!(Precision::Float.scalar_min(), f32::MIN_POSITIVE as f64);
        assert_eq!(Precision::Double.scalar_min(), f64::MIN_POSITIVE);
        assert!(Precision::Double.scalar_min() < Precision::Float.scalar_min());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Precision::from_name("DOUBLE"), Some(Precision::Double));
        assert_eq!(Precision::from_name(" float "), Some(Precision::Float));
        assert_eq!(Precision::from_name("half"), None);
    }
}
