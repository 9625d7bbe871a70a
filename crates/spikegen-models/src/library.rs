// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Model Library
//!
//! The three per-kind catalogs, built together. Lifecycle:
//!
//! 1. [`ModelLibrary::build`] registers the standard models
//!    (neurons, then postsynaptic, then weight update)
//! 2. user code appends its own records via [`ModelLibrary::extend`] or
//!    [`ModelLibrary::extend_from_manifest`]
//! 3. [`ModelLibrary::freeze`] locks every catalog and hands out an
//!    `Arc` for read-only sharing with the generator and tooling

use crate::bootstrap::{
    register_standard_neurons, register_standard_postsynaptic, register_standard_weight_updates,
};
use crate::catalog::{ModelCatalog, NeuronHandle, PostSynapticHandle, WeightUpdateHandle};
use crate::error::Result;
use crate::manifest::ModelManifest;
use crate::record::{NeuronModel, PostSynapticModel, WeightUpdateModel};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Serialize)]
pub struct ModelLibrary {
    neurons: ModelCatalog<NeuronModel>,
    postsynaptic: ModelCatalog<PostSynapticModel>,
    weight_updates: ModelCatalog<WeightUpdateModel>,
}

impl ModelLibrary {
    /// Library with empty catalogs and no standard models
    pub fn empty() -> Self {
        Self::default()
    }

    /// Library populated with the standard models
    pub fn build() -> Result<Self> {
        let mut library = Self::empty();
        register_standard_neurons(&mut library.neurons)?;
        register_standard_postsynaptic(&mut library.postsynaptic)?;
        register_standard_weight_updates(&mut library.weight_updates)?;
        info!(
            "Bootstrapped model library: {} neuron, {} postsynaptic, {} weight update models",
            library.neurons.len(),
            library.postsynaptic.len(),
            library.weight_updates.len()
        );
        Ok(library)
    }

    /// Run a user extension that appends further records
    ///
    /// ```ignore
    /// let library = ModelLibrary::build()?.extend(|lib| {
    ///     lib.register_neuron(my_neuron()?)?;
    ///     Ok(())
    /// })?;
    /// ```
    pub fn extend<F>(mut self, extension: F) -> Result<Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        extension(&mut self)?;
        Ok(self)
    }

    /// Register every model a manifest declares
    ///
    /// Neurons are registered first, then postsynaptic, then weight-update
    /// models, each in manifest order. The first failing definition aborts
    /// the extension; models registered before it stay registered.
    pub fn extend_from_manifest(&mut self, manifest: &ModelManifest) -> Result<()> {
        for definition in &manifest.neurons {
            self.register_neuron(definition.to_model()?)?;
        }
        for definition in &manifest.postsynaptic {
            self.register_postsynaptic(definition.to_model()?)?;
        }
        for definition in &manifest.weight_updates {
            self.register_weight_update(definition.to_model()?)?;
        }
        info!(
            "Registered {} models from manifest",
            manifest.neurons.len() + manifest.postsynaptic.len() + manifest.weight_updates.len()
        );
        Ok(())
    }

    pub fn register_neuron(&mut self, model: NeuronModel) -> Result<NeuronHandle> {
        self.neurons.register(model)
    }

    pub fn register_postsynaptic(&mut self, model: PostSynapticModel) -> Result<PostSynapticHandle> {
        self.postsynaptic.register(model)
    }

    pub fn register_weight_update(&mut self, model: WeightUpdateModel) -> Result<WeightUpdateHandle> {
        self.weight_updates.register(model)
    }

    pub fn neuron(&self, handle: NeuronHandle) -> Result<&NeuronModel> {
        self.neurons.get(handle)
    }

    pub fn postsynaptic(&self, handle: PostSynapticHandle) -> Result<&PostSynapticModel> {
        self.postsynaptic.get(handle)
    }

    pub fn weight_update(&self, handle: WeightUpdateHandle) -> Result<&WeightUpdateModel> {
        self.weight_updates.get(handle)
    }

    pub fn neurons(&self) -> &ModelCatalog<NeuronModel> {
        &self.neurons
    }

    pub fn postsynaptic_models(&self) -> &ModelCatalog<PostSynapticModel> {
        &self.postsynaptic
    }

    pub fn weight_updates(&self) -> &ModelCatalog<WeightUpdateModel> {
        &self.weight_updates
    }

    pub fn is_frozen(&self) -> bool {
        self.neurons.is_frozen()
    }

    /// Freeze all catalogs and share the library read-only
    pub fn freeze(mut self) -> Arc<Self> {
        self.neurons.freeze();
        self.postsynaptic.freeze();
        self.weight_updates.freeze();
        info!(
            "Model library frozen with {} neuron, {} postsynaptic, {} weight update models",
            self.neurons.len(),
            self.postsynaptic.len(),
            self.weight_updates.len()
        );
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::handles;
    use crate::record::ModelRecord;
    use crate::types::Variable;

    #[test]
    fn test_build_populates_standard_models() {
        let library = ModelLibrary::build().unwrap();
        assert_eq!(library.neurons().len(), 9);
        assert_eq!(library.postsynaptic_models().len(), 2);
        assert_eq!(library.weight_updates().len(), 3);
        assert!(!library.is_frozen());
        assert_eq!(library.neuron(handles::TRAUBMILES).unwrap().name(), "traub_miles_safe");
    }

    #[test]
    fn test_extension_appends_after_standard_models() {
        let mut handle = None;
        let library = ModelLibrary::build()
            .unwrap()
            .extend(|lib| {
                let model = NeuronModel::builder("leaky")
                    .variable(Variable::scalar("V"))
                    .parameter("tau")
                    .sim_code("$(V) -= $(V) / $(tau) * $(DT);")
                    .threshold_code("$(V) > 1.0")
                    .build()?;
                handle = Some(lib.register_neuron(model)?);
                Ok(())
            })
            .unwrap();
        assert_eq!(handle.map(|h| h.index()), Some(9));
        assert_eq!(library.neurons().find("leaky"), handle);
    }

    #[test]
    fn test_empty_library() {
        let library = ModelLibrary::empty();
        assert!(library.neurons().is_empty());
        assert!(library.neuron(handles::MAP_NEURON).is_err());
    }
}
