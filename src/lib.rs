// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegen
//!
//! Model registry underlying a GPU-targeted spiking neural network code
//! generator. Neuron dynamics, postsynaptic integration and synaptic
//! weight-update rules are described as records: state variables, raw
//! parameters, derived parameters computed once per run, and code fragments
//! with `$(name)` placeholders for the kernel generator.
//!
//! ## Feature Flags
//!
//! - **`config`** (default): `spikegen_configuration.toml` loading
//! - **`observability`** (default): logging setup and per-crate debug flags
//! - **`file-logging`**: per-run JSON log files
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spikegen::prelude::*;
//!
//! let library = ModelLibrary::build()?
//!     .extend(|lib| {
//!         let neuron = NeuronModel::builder("leaky")
//!             .variable(Variable::scalar("V"))
//!             .parameter("tau")
//!             .sim_code("$(V) -= $(V) / $(tau) * $(DT);")
//!             .threshold_code("$(V) > 1.0")
//!             .build()?;
//!         lib.register_neuron(neuron)?;
//!         Ok(())
//!     })?
//!     .freeze();
//!
//! let map = library.neuron(handles::MAP_NEURON)?;
//! let derived = map.derive_parameters(&[60.0, 3.0, -2.468, 2.64], 0.1)?;
//! assert_eq!(derived.len(), 3);
//! # Ok::<(), ModelError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Core: spikegen-models                                  │
//! │  (records, strategies, catalogs, standard library)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: spikegen-config, spikegen-observability│
//! │  (TOML config, manifests, logging)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Tools: dump_catalog                                    │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub use spikegen_models as models;

#[cfg(feature = "config")]
pub use spikegen_config as config;

#[cfg(feature = "observability")]
pub use spikegen_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::models::{
        handles, CodeSlot, CodeTemplate, Condition, DerivedParameterStrategy, Handle, ModelError,
        ModelKind, ModelLibrary, ModelManifest, ModelRecord, NeuronModel, PostSynapticModel,
        Precision, VarType, Variable, WeightUpdateModel,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, load_model_manifest, validate_config, SpikegenConfig};

    #[cfg(feature = "observability")]
    pub use crate::observability::{init_logging, parse_debug_flags, CrateDebugFlags};
}
