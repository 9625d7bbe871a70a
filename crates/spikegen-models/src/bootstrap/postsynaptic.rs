// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Standard postsynaptic models

use super::handles;
use crate::catalog::ModelCatalog;
use crate::derived::DerivedParameterStrategy;
use crate::error::Result;
use crate::record::PostSynapticModel;

/// Exponentially decaying conductance driving towards reversal potential `E`
fn exp_decay() -> Result<PostSynapticModel> {
    PostSynapticModel::builder("exp_decay")
        .parameters(&["tau", "E"])
        .derived_parameters(DerivedParameterStrategy::ExpDecay.default_derived_names())
        .strategy(DerivedParameterStrategy::ExpDecay)
        .decay_code("$(inSyn)*=$(expDecay);\n")
        .to_current_code("$(inSyn)*($(E)-$(V))")
        .build()
}

/// Input passed straight through and cleared every step
fn izhikevich_ps() -> Result<PostSynapticModel> {
    PostSynapticModel::builder("izhikevich_ps")
        .decay_code("")
        .to_current_code("$(inSyn); $(inSyn)= 0")
        .build()
}

pub fn register_standard_postsynaptic(
    catalog: &mut ModelCatalog<PostSynapticModel>,
) -> Result<()> {
    for (expected, model) in [
        (handles::EXP_DECAY, exp_decay()?),
        (handles::IZHIKEVICH_PS, izhikevich_ps()?),
    ] {
        let handle = catalog.register(model)?;
        debug_assert_eq!(handle, expected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ModelRecord;

    #[test]
    fn test_exp_decay_derives_decay_factor() {
        let model = exp_decay().unwrap();
        let derived = model.derive_parameters(&[5.0, 0.0], 0.1).unwrap();
        assert!((derived[0] - (-0.1f64 / 5.0).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_izhikevich_ps_has_no_decay() {
        let model = izhikevich_ps().unwrap();
        assert!(model.decay_code().is_empty());
        assert!(model.parameters().is_empty());
        assert!(model.strategy().is_none());
    }
}
