// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Extension, freezing and shared read access

use spikegen_models::{
    handles, CustomStrategy, DerivedParameterStrategy, ModelError, ModelKind, ModelLibrary,
    ModelManifest, ModelRecord, NeuronModel, Variable,
};
use std::sync::Arc;
use std::thread;

fn alpha_decay(index: usize, parameters: &[f64], dt: f64) -> f64 {
    match index {
        0 => (-dt / parameters[0]).exp(),
        _ => dt / parameters[0],
    }
}

const ALPHA: CustomStrategy = CustomStrategy::new("alpha", 2, 1, alpha_decay);

fn custom_neuron(name: &str) -> NeuronModel {
    NeuronModel::builder(name)
        .variable(Variable::scalar("V"))
        .variable(Variable::scalar("x"))
        .parameters(&["tau"])
        .derived_parameters(&["decay", "step"])
        .strategy(DerivedParameterStrategy::Custom(ALPHA))
        .sim_code("$(x) = $(x) * $(decay) + $(Isyn) * $(step);\n$(V) += $(x);")
        .threshold_code("$(V) > 1.0")
        .build()
        .unwrap()
}

#[test]
fn test_user_models_follow_standard_handles() {
    let library = ModelLibrary::build()
        .unwrap()
        .extend(|lib| {
            let first = lib.register_neuron(custom_neuron("alpha_a"))?;
            let second = lib.register_neuron(custom_neuron("alpha_b"))?;
            assert_eq!((first.index(), second.index()), (9, 10));
            Ok(())
        })
        .unwrap();

    // earlier handles keep their records
    assert_eq!(library.neuron(handles::MAP_NEURON).unwrap().name(), "rulkov_map");
    let handle = library.neurons().find("alpha_b").unwrap();
    let derived = library
        .neuron(handle)
        .unwrap()
        .derive_parameters(&[2.0], 0.5)
        .unwrap();
    assert!((derived[0] - (-0.25f64).exp()).abs() < 1e-12);
    assert!((derived[1] - 0.25).abs() < 1e-12);
}

#[test]
fn test_extension_error_propagates() {
    let err = ModelLibrary::build()
        .unwrap()
        .extend(|lib| {
            lib.register_neuron(custom_neuron("rulkov_map"))?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::DuplicateModelName {
            kind: ModelKind::Neuron,
            name: "rulkov_map".to_string()
        }
    );
}

#[test]
fn test_frozen_library_is_read_only() {
    let library = ModelLibrary::build().unwrap().freeze();
    assert!(library.is_frozen());
    assert!(library.neurons().is_frozen());
    assert!(library.postsynaptic_models().is_frozen());
    assert!(library.weight_updates().is_frozen());

    // a frozen library can only be mutated through a fresh, unshared owner
    let mut owned = Arc::try_unwrap(library).unwrap();
    let err = owned.register_neuron(custom_neuron("late")).unwrap_err();
    assert_eq!(err, ModelError::CatalogFrozen { kind: ModelKind::Neuron });
    assert_eq!(owned.neurons().len(), 9);
}

#[test]
fn test_unknown_handle() {
    let library = ModelLibrary::build().unwrap();
    let beyond = spikegen_models::NeuronHandle::new(42);
    assert_eq!(
        library.neuron(beyond).unwrap_err(),
        ModelError::UnknownHandle {
            kind: ModelKind::Neuron,
            handle: 42
        }
    );
}

#[test]
fn test_concurrent_readers_see_identical_records() {
    let library = ModelLibrary::build().unwrap().freeze();
    let stdp = [10.0, 5.0, 20.0, 8.0, 8.0, 1.0, 0.5, 4.0, 0.0, 0.0];

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let library = Arc::clone(&library);
            thread::spawn(move || {
                library
                    .weight_update(handles::LEARN1SYNAPSE)
                    .unwrap()
                    .derive_parameters(&stdp, 0.1)
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<Vec<f64>> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    for result in &results {
        assert_eq!(result, &results[0]);
    }
    let expected = [8.125, -8.125, -0.04, 0.04, 0.125, 0.2, 0.125];
    for (value, expected) in results[0].iter().zip(expected) {
        assert!((value - expected).abs() < 1e-12, "{} != {}", value, expected);
    }
}

#[test]
fn test_manifest_extension() {
    let manifest: ModelManifest = toml::from_str(
        r#"
[[neurons]]
name = "map_clone"
variables = [{ name = "V", type = "scalar" }, { name = "preV", type = "scalar" }]
parameters = ["Vspike", "alpha", "y", "beta"]
strategy = "rulkov"
sim = "$(preV) = $(V);"
threshold = "$(V) >= $(ip2)"

[[weight_updates]]
name = "stdp_clone"
variables = [{ name = "g", type = "scalar" }]
parameters = ["tLrn", "tChng", "tDecay", "tPunish10", "tPunish01", "gMax"]
strategy = "piecewise_stdp"
sim = "$(addtoinSyn) = $(g) * ($(t) - $(sT_post) > $(lim0));"
needs_post_spike_time = true
"#,
    )
    .unwrap();

    let mut library = ModelLibrary::build().unwrap();
    library.extend_from_manifest(&manifest).unwrap();
    let library = library.freeze();

    let map = library.neuron(library.neurons().find("map_clone").unwrap()).unwrap();
    assert_eq!(map.derived_parameters(), &["ip0", "ip1", "ip2"]);
    let stdp = library.weight_updates().find("stdp_clone").unwrap();
    assert_eq!(stdp.index(), 3);
}

#[test]
fn test_manifest_spike_time_requires_flag() {
    let manifest: ModelManifest = toml::from_str(
        r#"
[[weight_updates]]
name = "unflagged"
sim = "$(addtoinSyn) = $(t) - $(sT_pre);"
"#,
    )
    .unwrap();

    let mut library = ModelLibrary::build().unwrap();
    let err = library.extend_from_manifest(&manifest).unwrap_err();
    assert!(matches!(err, ModelError::UndeclaredSpikeTime { .. }));
    assert!(library.weight_updates().find("unflagged").is_none());
}

#[test]
fn test_library_serializes_as_catalogs() {
    let library = ModelLibrary::build().unwrap();
    let json = serde_json::to_value(&library).unwrap();
    assert_eq!(json["neurons"].as_array().unwrap().len(), 9);
    assert_eq!(json["neurons"][0]["name"], "rulkov_map");
    assert_eq!(json["neurons"][0]["strategy"], "rulkov");
    assert_eq!(json["weight_updates"][2]["needs_post_spike_time"], true);
}
