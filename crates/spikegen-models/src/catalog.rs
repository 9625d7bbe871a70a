// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Model Catalog
//!
//! Append-only, per-kind collection of model records. Each registration
//! returns a dense, zero-based [`Handle`] equal to the record's position.
//! There is no removal or reordering, so a handle is never reassigned.
//!
//! A catalog is populated by a single writer, then frozen. A frozen catalog
//! rejects registration and can be shared read-only between threads.

use crate::error::{ModelError, Result};
use crate::record::{ModelKind, ModelRecord, NeuronModel, PostSynapticModel, WeightUpdateModel};
use ahash::AHashMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Stable identifier of a record within its catalog
pub struct Handle<M> {
    index: usize,
    _kind: PhantomData<fn() -> M>,
}

pub type NeuronHandle = Handle<NeuronModel>;
pub type PostSynapticHandle = Handle<PostSynapticModel>;
pub type WeightUpdateHandle = Handle<WeightUpdateModel>;

impl<M> Handle<M> {
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<M> Clone for Handle<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Handle<M> {}

impl<M> PartialEq for Handle<M> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<M> Eq for Handle<M> {}

impl<M> PartialOrd for Handle<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Handle<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<M> Hash for Handle<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<M> fmt::Debug for Handle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

impl<M> fmt::Display for Handle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

impl<M> Serialize for Handle<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.index as u64)
    }
}

/// Ordered collection of one kind of model record
#[derive(Debug)]
pub struct ModelCatalog<M> {
    models: Vec<M>,
    by_name: AHashMap<String, usize>,
    frozen: bool,
}

impl<M: ModelRecord> Default for ModelCatalog<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ModelRecord> ModelCatalog<M> {
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            by_name: AHashMap::new(),
            frozen: false,
        }
    }

    pub fn kind(&self) -> ModelKind {
        M::KIND
    }

    /// Append a record and return its handle
    ///
    /// # Errors
    ///
    /// - `CatalogFrozen` after [`freeze`](Self::freeze)
    /// - `DuplicateModelName` if a record with the same name exists
    /// - any validation error of the record itself
    pub fn register(&mut self, model: M) -> Result<Handle<M>> {
        if self.frozen {
            warn!(
                "Rejected registration of {} model '{}': catalog is frozen",
                M::KIND,
                model.name()
            );
            return Err(ModelError::CatalogFrozen { kind: M::KIND });
        }
        model.validate()?;
        if self.by_name.contains_key(model.name()) {
            return Err(ModelError::DuplicateModelName {
                kind: M::KIND,
                name: model.name().to_string(),
            });
        }

        let handle = Handle::new(self.models.len());
        debug!(
            "Registered {} model '{}' as handle {} ({} variables, {} parameters, {} derived)",
            M::KIND,
            model.name(),
            handle,
            model.variables().len(),
            model.parameters().len(),
            model.derived_parameters().len()
        );
        self.by_name.insert(model.name().to_string(), handle.index());
        self.models.push(model);
        Ok(handle)
    }

    /// Look up a record by handle
    pub fn get(&self, handle: Handle<M>) -> Result<&M> {
        self.models
            .get(handle.index())
            .ok_or(ModelError::UnknownHandle {
                kind: M::KIND,
                handle: handle.index(),
            })
    }

    /// Handle of the record registered under `name`
    pub fn find(&self, name: &str) -> Option<Handle<M>> {
        self.by_name.get(name).map(|&index| Handle::new(index))
    }

    /// Records in handle order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<M>, &M)> {
        self.models
            .iter()
            .enumerate()
            .map(|(index, model)| (Handle::new(index), model))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Stop accepting registrations
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl<M: ModelRecord> Serialize for ModelCatalog<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.models.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron(name: &str) -> NeuronModel {
        NeuronModel::builder(name).threshold_code("0").build().unwrap()
    }

    #[test]
    fn test_handles_are_dense_and_stable() {
        let mut catalog = ModelCatalog::new();
        let a = catalog.register(neuron("a")).unwrap();
        let b = catalog.register(neuron("b")).unwrap();
        let c = catalog.register(neuron("c")).unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert_eq!(catalog.get(b).unwrap().name(), "b");

        for i in 0..10 {
            catalog.register(neuron(&format!("extra{}", i))).unwrap();
        }
        assert_eq!(catalog.get(a).unwrap().name(), "a");
        assert_eq!(catalog.get(b).unwrap().name(), "b");
        assert_eq!(catalog.find("c"), Some(c));
    }

    #[test]
    fn test_unknown_handle() {
        let catalog: ModelCatalog<NeuronModel> = ModelCatalog::new();
        let err = catalog.get(Handle::new(3)).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownHandle {
                kind: ModelKind::Neuron,
                handle: 3
            }
        );
    }

    #[test]
    fn test_frozen_catalog_rejects_registration() {
        let mut catalog = ModelCatalog::new();
        let a = catalog.register(neuron("a")).unwrap();
        catalog.freeze();
        assert!(catalog.is_frozen());
        let err = catalog.register(neuron("b")).unwrap_err();
        assert_eq!(err, ModelError::CatalogFrozen { kind: ModelKind::Neuron });
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(a).unwrap().name(), "a");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut catalog = ModelCatalog::new();
        catalog.register(neuron("a")).unwrap();
        let err = catalog.register(neuron("a")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateModelName { .. }));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_iter_in_handle_order() {
        let mut catalog = ModelCatalog::new();
        for name in ["x", "y", "z"] {
            catalog.register(neuron(name)).unwrap();
        }
        let names: Vec<(usize, &str)> = catalog.iter().map(|(h, m)| (h.index(), m.name())).collect();
        assert_eq!(names, vec![(0, "x"), (1, "y"), (2, "z")]);
    }
}
