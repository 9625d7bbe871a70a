// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Standard Model Library
//!
//! Populates the catalogs with the built-in models. Each catalog receives
//! its models in a fixed order, so the handles in [`handles`] are stable
//! across runs and match what [`ModelLibrary::build`](crate::ModelLibrary::build)
//! returns.

mod neurons;
mod postsynaptic;
mod weight_update;

pub use neurons::register_standard_neurons;
pub use postsynaptic::register_standard_postsynaptic;
pub use weight_update::register_standard_weight_updates;

/// Handles of the standard models
pub mod handles {
    use crate::catalog::{NeuronHandle, PostSynapticHandle, WeightUpdateHandle};

    /// Rulkov map neuron
    pub const MAP_NEURON: NeuronHandle = NeuronHandle::new(0);
    pub const POISSON_NEURON: NeuronHandle = NeuronHandle::new(1);
    pub const TRAUBMILES_FAST: NeuronHandle = NeuronHandle::new(2);
    pub const TRAUBMILES_ALTERNATIVE: NeuronHandle = NeuronHandle::new(3);
    pub const TRAUBMILES_SAFE: NeuronHandle = NeuronHandle::new(4);
    /// Recommended Traub-Miles variant
    pub const TRAUBMILES: NeuronHandle = TRAUBMILES_SAFE;
    pub const TRAUBMILES_PSTEP: NeuronHandle = NeuronHandle::new(5);
    pub const IZHIKEVICH: NeuronHandle = NeuronHandle::new(6);
    /// Izhikevich with per-neuron a, b, c and d
    pub const IZHIKEVICH_V: NeuronHandle = NeuronHandle::new(7);
    pub const SPIKE_SOURCE: NeuronHandle = NeuronHandle::new(8);

    pub const EXP_DECAY: PostSynapticHandle = PostSynapticHandle::new(0);
    pub const IZHIKEVICH_PS: PostSynapticHandle = PostSynapticHandle::new(1);

    pub const NSYNAPSE: WeightUpdateHandle = WeightUpdateHandle::new(0);
    pub const NGRADSYNAPSE: WeightUpdateHandle = WeightUpdateHandle::new(1);
    pub const LEARN1SYNAPSE: WeightUpdateHandle = WeightUpdateHandle::new(2);
}
