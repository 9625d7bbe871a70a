// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Derived Parameter Strategies
//!
//! A derived parameter is a constant folded from a model's raw parameters and
//! the integration timestep once per run, so that generated kernels do not
//! repeat the algebra every step.
//!
//! Strategies are a closed set of built-in formulas plus one case for
//! user-supplied functions. All of them are pure: identical
//! `(index, parameters, dt)` inputs always give identical outputs.
//!
//! ## Built-in formulas
//!
//! ```text
//! Rulkov map (pars = [Vspike, alpha, y, beta]):
//!     ip0 = p0² · p1
//!     ip1 = p0 · p2
//!     ip2 = p0 · p1 + p0 · p2
//!
//! Exponential decay (pars = [tau, ...]):
//!     expDecay = exp(-dt / p0)
//!
//! Piecewise-linear STDP (pars = [tLrn, tChng, tDecay, tPunish10, tPunish01, gMax, ...]):
//!     lim0   = (1/p4 + 1/p1) · p0 / (2/p1)
//!     lim1   = -((1/p3 + 1/p1) · p0 / (2/p1))
//!     slope0 = -2 · p5 / (p1 · p0)
//!     slope1 = -slope0
//!     off0   = p5 / p4
//!     off1   = p5 / p1
//!     off2   = p5 / p3
//! ```

use crate::error::{ModelError, Result};
use std::fmt;

/// Signature of a user-supplied derived parameter formula
pub type DerivedFn = fn(index: usize, parameters: &[f64], dt: f64) -> f64;

/// A user-supplied strategy for models registered outside the standard library
#[derive(Clone, Copy)]
pub struct CustomStrategy {
    name: &'static str,
    derived_count: usize,
    required_parameters: usize,
    formula: DerivedFn,
}

impl CustomStrategy {
    /// # Arguments
    /// * `name` - Identifier used in diagnostics
    /// * `derived_count` - Number of derived parameters the formula produces
    /// * `required_parameters` - Minimum raw parameter count the formula reads
    /// * `formula` - Called only with `index < derived_count`
    pub const fn new(
        name: &'static str,
        derived_count: usize,
        required_parameters: usize,
        formula: DerivedFn,
    ) -> Self {
        Self {
            name,
            derived_count,
            required_parameters,
            formula,
        }
    }
}

impl fmt::Debug for CustomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomStrategy")
            .field("name", &self.name)
            .field("derived_count", &self.derived_count)
            .field("required_parameters", &self.required_parameters)
            .finish_non_exhaustive()
    }
}

/// Per-model formula computing derived parameters
#[derive(Debug, Clone, Copy)]
pub enum DerivedParameterStrategy {
    /// Rulkov map neuron: `ip0`, `ip1`, `ip2`
    Rulkov,
    /// Exponential decay of synaptic input: `expDecay`
    ExpDecay,
    /// Piecewise-linear STDP window: `lim0`, `lim1`, `slope0`, `slope1`, `off0`, `off1`, `off2`
    PiecewiseStdp,
    Custom(CustomStrategy),
}

const RULKOV_NAMES: &[&str] = &["ip0", "ip1", "ip2"];
const EXP_DECAY_NAMES: &[&str] = &["expDecay"];
const STDP_NAMES: &[&str] = &["lim0", "lim1", "slope0", "slope1", "off0", "off1", "off2"];

impl DerivedParameterStrategy {
    /// Look up a built-in strategy by name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "rulkov" => Ok(Self::Rulkov),
            "exp_decay" => Ok(Self::ExpDecay),
            "piecewise_stdp" => Ok(Self::PiecewiseStdp),
            other => Err(ModelError::UnknownStrategy(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rulkov => "rulkov",
            Self::ExpDecay => "exp_decay",
            Self::PiecewiseStdp => "piecewise_stdp",
            Self::Custom(custom) => custom.name,
        }
    }

    /// Number of derived parameters this strategy computes
    pub fn derived_count(&self) -> usize {
        match self {
            Self::Custom(custom) => custom.derived_count,
            builtin => builtin.default_derived_names().len(),
        }
    }

    /// Minimum number of raw parameters the formulas read
    pub fn required_parameters(&self) -> usize {
        match self {
            Self::Rulkov => 3,
            Self::ExpDecay => 1,
            Self::PiecewiseStdp => 6,
            Self::Custom(custom) => custom.required_parameters,
        }
    }

    /// Conventional derived parameter names of a built-in strategy
    ///
    /// Empty for custom strategies, which name their own outputs.
    pub fn default_derived_names(&self) -> &'static [&'static str] {
        match self {
            Self::Rulkov => RULKOV_NAMES,
            Self::ExpDecay => EXP_DECAY_NAMES,
            Self::PiecewiseStdp => STDP_NAMES,
            Self::Custom(_) => &[],
        }
    }

    /// Compute derived parameter `index`
    ///
    /// # Errors
    ///
    /// `DerivedIndexOutOfRange` if `index >= derived_count()`,
    /// `ParameterArityMismatch` if fewer than `required_parameters()` values
    /// are supplied.
    pub fn compute(&self, index: usize, parameters: &[f64], dt: f64) -> Result<f64> {
        let count = self.derived_count();
        if index >= count {
            return Err(ModelError::DerivedIndexOutOfRange {
                strategy: self.name().to_string(),
                index,
                count,
            });
        }
        let required = self.required_parameters();
        if parameters.len() < required {
            return Err(ModelError::ParameterArityMismatch {
                model: self.name().to_string(),
                expected: required,
                actual: parameters.len(),
            });
        }

        let p = parameters;
        let value = match self {
            Self::Rulkov => match index {
                0 => p[0] * p[0] * p[1],
                1 => p[0] * p[2],
                _ => p[0] * p[1] + p[0] * p[2],
            },
            Self::ExpDecay => (-dt / p[0]).exp(),
            Self::PiecewiseStdp => match index {
                0 => (1.0 / p[4] + 1.0 / p[1]) * p[0] / (2.0 / p[1]),
                1 => -((1.0 / p[3] + 1.0 / p[1]) * p[0] / (2.0 / p[1])),
                2 => stdp_slope0(p),
                3 => -1.0 * stdp_slope0(p),
                4 => p[5] / p[4],
                5 => p[5] / p[1],
                _ => p[5] / p[3],
            },
            Self::Custom(custom) => (custom.formula)(index, parameters, dt),
        };
        Ok(value)
    }

    /// Compute every derived parameter in index order
    pub fn compute_all(&self, parameters: &[f64], dt: f64) -> Result<Vec<f64>> {
        (0..self.derived_count())
            .map(|index| self.compute(index, parameters, dt))
            .collect()
    }
}

#[inline]
fn stdp_slope0(p: &[f64]) -> f64 {
    -2.0 * p[5] / (p[1] * p[0])
}
