// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Standard weight-update models

use super::handles;
use crate::catalog::ModelCatalog;
use crate::derived::DerivedParameterStrategy;
use crate::error::Result;
use crate::record::WeightUpdateModel;
use crate::types::Variable;

const NSYNAPSE_SIM: &str = "  $(addtoinSyn) = $(g);\n  $(updatelinsyn);\n";

const NGRAD_EVENT: &str = r#"$(addtoinSyn) = $(g) * tanh(($(V_pre) - $(Epre)) / $(Vslope))* $(DT);
    if ($(addtoinSyn) < 0) $(addtoinSyn) = 0.0;
    $(updatelinsyn);
"#;

// Piecewise-linear STDP on a hidden raw weight, squashed through tanh.
// Applied on presynaptic spikes against the last postsynaptic spike time.
const LEARN1_SIM: &str = r#"$(addtoinSyn) = $(g);
  $(updatelinsyn);
  scalar dt = $(sT_post) - $(t) - ($(tauShift));
  scalar dg = 0;
  if (dt > $(lim0))
      dg = -($(off0)) ;
  else if (dt > 0)
      dg = $(slope0) * dt + ($(off1));
  else if (dt > $(lim1))
      dg = $(slope1) * dt + ($(off1));
  else dg = - ($(off2)) ;
  $(gRaw) += dg;
  $(g)=$(gMax)/2 *(tanh($(gSlope)*($(gRaw) - ($(gMid))))+1);
"#;

// Same rule on postsynaptic spikes against the last presynaptic spike time.
const LEARN1_POST: &str = r#"scalar dt = $(t) - ($(sT_pre)) - ($(tauShift));
  scalar dg =0;
  if (dt > $(lim0))
      dg = -($(off0)) ;
  else if (dt > 0)
      dg = $(slope0) * dt + ($(off1));
  else if (dt > $(lim1))
      dg = $(slope1) * dt + ($(off1));
  else dg = -($(off2)) ;
  $(gRaw) += dg;
  $(g)=$(gMax)/2.0 *(tanh($(gSlope)*($(gRaw) - ($(gMid))))+1);
"#;

const LEARN1_PARAMS: &[&str] = &[
    "tLrn",
    "tChng",
    "tDecay",
    "tPunish10",
    "tPunish01",
    "gMax",
    "gMid",
    "gSlope",
    "tauShift",
    "gSyn0",
];

/// Pulse-coupled synapse: conductance `g` added on every presynaptic spike
fn nsynapse() -> Result<WeightUpdateModel> {
    WeightUpdateModel::builder("nsynapse")
        .variable(Variable::scalar("g"))
        .sim_code(NSYNAPSE_SIM)
        .build()
}

/// Graded synapse driven by presynaptic voltage above `Epre`
fn ngrad_synapse() -> Result<WeightUpdateModel> {
    WeightUpdateModel::builder("ngrad_synapse")
        .variable(Variable::scalar("g"))
        .parameters(&["Epre", "Vslope"])
        .event(NGRAD_EVENT, "$(V_pre) > $(Epre)")
        .build()
}

fn learn1_synapse() -> Result<WeightUpdateModel> {
    WeightUpdateModel::builder("learn1_synapse")
        .variable(Variable::scalar("g"))
        .variable(Variable::scalar("gRaw"))
        .parameters(LEARN1_PARAMS)
        .derived_parameters(DerivedParameterStrategy::PiecewiseStdp.default_derived_names())
        .strategy(DerivedParameterStrategy::PiecewiseStdp)
        .sim_code(LEARN1_SIM)
        .learn_post_code(LEARN1_POST)
        .needs_pre_spike_time(true)
        .needs_post_spike_time(true)
        .build()
}

pub fn register_standard_weight_updates(
    catalog: &mut ModelCatalog<WeightUpdateModel>,
) -> Result<()> {
    for (expected, model) in [
        (handles::NSYNAPSE, nsynapse()?),
        (handles::NGRADSYNAPSE, ngrad_synapse()?),
        (handles::LEARN1SYNAPSE, learn1_synapse()?),
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
    fn test_ngrad_is_event_driven() {
        let model = ngrad_synapse().unwrap();
        assert!(model.is_event_driven());
        assert!(model.sim_code().is_empty());
        assert!(model.event_code().unwrap().references("V_pre"));
        assert_eq!(model.event_threshold_code().unwrap().source(), "$(V_pre) > $(Epre)");
    }

    #[test]
    fn test_learn1_reads_both_spike_times() {
        let model = learn1_synapse().unwrap();
        assert!(model.needs_pre_spike_time() && model.needs_post_spike_time());
        assert!(model.sim_code().references("sT_post"));
        assert!(model.learn_post_code().unwrap().references("sT_pre"));
        assert_eq!(model.parameters().len(), 10);
        assert_eq!(model.derived_parameters().len(), 7);
    }

    #[test]
    fn test_learn1_derived_values() {
        let model = learn1_synapse().unwrap();
        let params = [10.0, 5.0, 20.0, 8.0, 8.0, 1.0, 0.5, 4.0, 0.0, 0.0];
        let derived = model.derive_parameters(&params, 0.1).unwrap();
        assert!((derived[0] - 8.125).abs() < 1e-12);
        assert!((derived[3] + derived[2]).abs() < 1e-12);
    }
}
