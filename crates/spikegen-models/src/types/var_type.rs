// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Semantic type tags for model variables
//!
//! Variables are declared with the C-family type names the generated kernels
//! use. `scalar` is bound later to the configured [`Precision`].

use super::precision::Precision;
use crate::error::{ModelError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Integer width class of a C integer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Char,
    Short,
    Int,
    Long,
    LongLong,
    Max,
    Bits8,
    Bits16,
    Bits32,
    Bits64,
}

impl IntWidth {
    fn size(&self) -> usize {
        match self {
            IntWidth::Char | IntWidth::Bits8 => 1,
            IntWidth::Short | IntWidth::Bits16 => 2,
            IntWidth::Int | IntWidth::Bits32 => 4,
            IntWidth::Long | IntWidth::LongLong | IntWidth::Max | IntWidth::Bits64 => 8,
        }
    }
}

/// Type tag of a variable or extra global parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarType {
    /// Floating point type chosen by the configured precision
    Scalar,
    Float,
    Double,
    LongDouble,
    Bool,
    WChar,
    Int {
        signed: bool,
        width: IntWidth,
        /// Original spelling, kept so generated declarations match the model
        spelling: String,
    },
    Pointer(Box<VarType>),
}

impl VarType {
    /// Parse a C-family type name such as `scalar`, `uint64_t` or `uint64_t *`
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if let Some(inner) = trimmed.strip_suffix('*') {
            return Ok(VarType::Pointer(Box::new(VarType::parse(inner)?)));
        }

        let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        let simple = match normalized.as_str() {
            "scalar" => Some(VarType::Scalar),
            "float" => Some(VarType::Float),
            "double" => Some(VarType::Double),
            "long double" => Some(VarType::LongDouble),
            "bool" => Some(VarType::Bool),
            "wchar_t" => Some(VarType::WChar),
            _ => None,
        };
        if let Some(ty) = simple {
            return Ok(ty);
        }

        Self::parse_integer(&normalized)
            .ok_or_else(|| ModelError::UnknownVarType(name.to_string()))
    }

    fn parse_integer(normalized: &str) -> Option<Self> {
        let int = |signed: bool, width: IntWidth| VarType::Int {
            signed,
            width,
            spelling: normalized.to_string(),
        };

        // Fixed-width, least and fast families: [u]int{_least,_fast}N_t
        if let Some(rest) = normalized.strip_suffix("_t") {
            let (signed, rest) = match rest.strip_prefix('u') {
                Some(r) => (false, r),
                None => (true, rest),
            };
            let rest = rest.strip_prefix("int")?;
            let rest = rest
                .strip_prefix("_least")
                .or_else(|| rest.strip_prefix("_fast"))
                .unwrap_or(rest);
            let width = match rest {
                "8" => IntWidth::Bits8,
                "16" => IntWidth::Bits16,
                "32" => IntWidth::Bits32,
                "64" => IntWidth::Bits64,
                "max" => IntWidth::Max,
                _ => return None,
            };
            return Some(int(signed, width));
        }

        let mut words: Vec<&str> = normalized.split(' ').collect();
        let signed = match words.first() {
            Some(&"unsigned") => false,
            Some(&"signed") => true,
            _ => return Self::integer_width(&words).map(|width| int(true, width)),
        };
        words.remove(0);
        // a bare sign keyword means int
        if words.is_empty() {
            return Some(int(signed, IntWidth::Int));
        }
        Self::integer_width(&words).map(|width| int(signed, width))
    }

    fn integer_width(words: &[&str]) -> Option<IntWidth> {
        let mut words = words.to_vec();
        if words.len() > 1 && words.last() == Some(&"int") {
            words.pop();
        }
        match words.as_slice() {
            ["char"] => Some(IntWidth::Char),
            ["short"] => Some(IntWidth::Short),
            ["int"] => Some(IntWidth::Int),
            ["long"] => Some(IntWidth::Long),
            ["long", "long"] => Some(IntWidth::LongLong),
            _ => None,
        }
    }

    /// Storage size in bytes on a 64-bit target
    pub fn size_in_bytes(&self, precision: Precision) -> usize {
        match self {
            VarType::Scalar => precision.scalar_size(),
            VarType::Float => 4,
            VarType::Double => 8,
            VarType::LongDouble => 16,
            VarType::Bool => 1,
            VarType::WChar => 4,
            VarType::Int { width, .. } => width.size(),
            VarType::Pointer(_) => 8,
        }
    }

    /// Whether the type is a pointer (extra global arrays)
    pub fn is_pointer(&self) -> bool {
        matches!(self, VarType::Pointer(_))
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Scalar => f.write_str("scalar"),
            VarType::Float => f.write_str("float"),
            VarType::Double => f.write_str("double"),
            VarType::LongDouble => f.write_str("long double"),
            VarType::Bool => f.write_str("bool"),
            VarType::WChar => f.write_str("wchar_t"),
            VarType::Int { spelling, .. } => f.write_str(spelling),
            VarType::Pointer(inner) => write!(f, "{} *", inner),
        }
    }
}

impl Serialize for VarType {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VarType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        VarType::parse(&name).map_err(serde::de::Error::custom)
    }
}
