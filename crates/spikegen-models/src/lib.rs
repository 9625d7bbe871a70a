// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegen-models
//!
//! Model-description and code-template registry for a spiking neural network
//! code generator.
//!
//! A [`ModelLibrary`] holds three append-only catalogs (neurons, postsynaptic
//! integration, weight update). Each record declares its state variables,
//! raw parameters, derived parameters and the code fragments a downstream
//! generator instantiates. Derived parameters fold the timestep into raw
//! parameters once per run through a [`DerivedParameterStrategy`].
//!
//! ## Example
//! ```ignore
//! use spikegen_models::{handles, ModelLibrary, ModelRecord};
//!
//! let library = ModelLibrary::build()?.freeze();
//! let map = library.neuron(handles::MAP_NEURON)?;
//! let derived = map.derive_parameters(&[60.0, 3.0, -2.468, 2.64], 0.1)?;
//! ```

pub mod bootstrap;
pub mod catalog;
pub mod derived;
pub mod error;
pub mod library;
pub mod manifest;
pub mod record;
pub mod template;
pub mod types;

pub use bootstrap::handles;
pub use catalog::{Handle, ModelCatalog, NeuronHandle, PostSynapticHandle, WeightUpdateHandle};
pub use derived::{CustomStrategy, DerivedFn, DerivedParameterStrategy};
pub use error::{ModelError, Result};
pub use library::ModelLibrary;
pub use manifest::{
    CoreDefinition, ModelManifest, NeuronDefinition, PostSynapticDefinition,
    WeightUpdateDefinition,
};
pub use record::{
    CodeSlot, ModelKind, ModelRecord, NeuronModel, NeuronModelBuilder, PostSynapticModel,
    PostSynapticModelBuilder, WeightUpdateModel, WeightUpdateModelBuilder,
};
pub use template::{CodeTemplate, Condition, ContextSymbol, Partner, Placeholder};
pub use types::{IntWidth, Precision, VarType, Variable};
