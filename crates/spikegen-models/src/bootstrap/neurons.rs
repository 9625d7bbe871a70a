// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Standard neuron models
//!
//! ```text
//! handle  name                      dynamics
//! 0       rulkov_map                Rulkov map (V, preV)
//! 1       poisson                   Poisson spike source with refractoriness
//! 2       traub_miles_fast          Traub-Miles HH, unguarded rate singularities
//! 3       traub_miles_alternative   Traub-Miles HH, SCALAR_MIN added to denominators
//! 4       traub_miles_safe          Traub-Miles HH, explicit limits at singular voltages
//! 5       traub_miles_pstep         as safe, inner step count is the `ntimes` parameter
//! 6       izhikevich                Izhikevich, shared parameters a-d
//! 7       izhikevich_variable       Izhikevich, per-instance a-d
//! 8       spike_source              no dynamics, spikes injected externally
//! ```

use super::handles;
use crate::catalog::ModelCatalog;
use crate::derived::DerivedParameterStrategy;
use crate::error::Result;
use crate::record::NeuronModel;
use crate::types::{VarType, Variable};

const RULKOV_SIM: &str = r#"    if ($(V) <= 0) {
      $(preV)= $(V);
      $(V)= $(ip0)/(($(Vspike)) - $(V) - ($(beta))*$(Isyn)) +($(ip1));
    }
    else {
      if (($(V) < $(ip2)) && ($(preV) <= 0)) {
        $(preV)= $(V);
        $(V)= $(ip2);
      }
      else {
        $(preV)= $(V);
        $(V)= -($(Vspike));
      }
    }
"#;

const POISSON_SIM: &str = r#"    uint64_t theRnd;
    if ($(V) > $(Vrest)) {
      $(V)= $(Vrest);
    }
    else {
      if ($(t) - $(spikeTime) > ($(trefract))) {
        MYRAND($(seed),theRnd);
        if (theRnd < *($(rates)+$(offset)+$(id))) {
          $(V)= $(Vspike);
          $(spikeTime)= $(t);
        }
      }
    }
"#;

// Reset happens at the start of the next step; V is integrated in two
// half steps for numerical stability.
const IZHIKEVICH_SIM: &str = r#"    if ($(V) >= 30.0){
      $(V)=$(c);
      $(U)+=$(d);
    }
    $(V)+=0.5*(0.04*$(V)*$(V)+5.0*$(V)+140.0-$(U)+$(Isyn))*$(DT);
    $(V)+=0.5*(0.04*$(V)*$(V)+5.0*$(V)+140.0-$(U)+$(Isyn))*$(DT);
    $(U)+=$(a)*($(b)*$(V)-$(U))*$(DT);
"#;

const TRAUB_MILES_PARAMS: &[&str] = &["gNa", "ENa", "gK", "EK", "gl", "El", "C"];
const TRAUB_MILES_INNER_STEPS: u32 = 25;

/// Treatment of the removable singularities of the m and n opening rates
///
/// The rates `0.32(-52-V)/(exp((-52-V)/4)-1)`, `0.28(V+25)/(exp((V+25)/5)-1)`
/// and `0.032(-50-V)/(exp((-50-V)/5)-1)` are 0/0 at V = -52, -25 and -50.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingularityGuard {
    /// Plain division; non-finite at the singular voltages
    Unguarded,
    /// `SCALAR_MIN` added to every denominator
    Epsilon,
    /// Equality tests substituting the analytic limits 1.28, 1.4 and 0.16
    Explicit,
}

/// Inner explicit-Euler iterations per outer timestep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InnerSteps {
    Fixed(u32),
    /// Read from the `ntimes` parameter
    Parameter,
}

fn traub_miles_rates(guard: SingularityGuard) -> (String, String) {
    match guard {
        SingularityGuard::Unguarded => (
            r#"      scalar _a= 0.32*(-52.0-$(V))/(exp((-52.0-$(V))/4.0)-1.0);
      scalar _b= 0.28*($(V)+25.0)/(exp(($(V)+25.0)/5.0)-1.0);
"#
            .to_string(),
            r#"      _a= 0.032*(-50.0-$(V))/(exp((-50.0-$(V))/5.0)-1.0);
"#
            .to_string(),
        ),
        SingularityGuard::Epsilon => (
            r#"      scalar volatile _tmp= abs(exp((-52.0-$(V))/4.0)-1.0);
      scalar _a= 0.32*abs(-52.0-$(V))/(_tmp+SCALAR_MIN);
      _tmp= abs(exp(($(V)+25.0)/5.0)-1.0);
      scalar _b= 0.28*abs($(V)+25.0)/(_tmp+SCALAR_MIN);
"#
            .to_string(),
            r#"      _tmp= abs(exp((-50.0-$(V))/5.0)-1.0);
      _a= 0.032*abs(-50.0-$(V))/(_tmp+SCALAR_MIN);
"#
            .to_string(),
        ),
        SingularityGuard::Explicit => (
            r#"      scalar _a;
      if ($(V) == -52.0) _a= 1.28;
      else _a= 0.32*(-52.0-$(V))/(exp((-52.0-$(V))/4.0)-1.0);
      scalar _b;
      if ($(V) == -25.0) _b= 1.4;
      else _b= 0.28*($(V)+25.0)/(exp(($(V)+25.0)/5.0)-1.0);
"#
            .to_string(),
            r#"      if ($(V) == -50.0) _a= 0.16;
      else _a= 0.032*(-50.0-$(V))/(exp((-50.0-$(V))/5.0)-1.0);
"#
            .to_string(),
        ),
    }
}

fn traub_miles_sim(guard: SingularityGuard, steps: InnerSteps) -> String {
    let (step_size, loop_bound) = match steps {
        InnerSteps::Fixed(n) => (format!("$(DT)/{}.0", n), n.to_string()),
        InnerSteps::Parameter => ("$(DT)/scalar($(ntimes))".to_string(), "$(ntimes)".to_string()),
    };
    let (m_rates, n_rate) = traub_miles_rates(guard);

    let mut code = String::new();
    code.push_str("    scalar Imem;\n");
    code.push_str("    unsigned int mt;\n");
    code.push_str(&format!("    scalar mdt= {};\n", step_size));
    code.push_str(&format!("    for (mt=0; mt < {}; mt++) {{\n", loop_bound));
    code.push_str(
        r#"      Imem= -($(m)*$(m)*$(m)*$(h)*$(gNa)*($(V)-($(ENa)))+
              $(n)*$(n)*$(n)*$(n)*$(gK)*($(V)-($(EK)))+
              $(gl)*($(V)-($(El)))-$(Isyn));
"#,
    );
    code.push_str(&m_rates);
    code.push_str(
        r#"      $(m)+= (_a*(1.0-$(m))-_b*$(m))*mdt;
      _a= 0.128*exp((-48.0-$(V))/18.0);
      _b= 4.0 / (exp((-25.0-$(V))/5.0)+1.0);
      $(h)+= (_a*(1.0-$(h))-_b*$(h))*mdt;
"#,
    );
    code.push_str(&n_rate);
    code.push_str(
        r#"      _b= 0.5*exp((-55.0-$(V))/40.0);
      $(n)+= (_a*(1.0-$(n))-_b*$(n))*mdt;
      $(V)+= Imem/$(C)*mdt;
    }
"#,
    );
    code
}

fn traub_miles(
    name: &str,
    guard: SingularityGuard,
    steps: InnerSteps,
    threshold: &str,
) -> Result<NeuronModel> {
    let mut builder = NeuronModel::builder(name)
        .variables(["V", "m", "h", "n"].map(Variable::scalar))
        .parameters(TRAUB_MILES_PARAMS);
    if steps == InnerSteps::Parameter {
        builder = builder.parameter("ntimes");
    }
    builder
        .sim_code(traub_miles_sim(guard, steps))
        .threshold_code(threshold)
        .build()
}

fn rulkov_map() -> Result<NeuronModel> {
    NeuronModel::builder("rulkov_map")
        .variable(Variable::scalar("V"))
        .variable(Variable::scalar("preV"))
        .parameters(&["Vspike", "alpha", "y", "beta"])
        .derived_parameters(DerivedParameterStrategy::Rulkov.default_derived_names())
        .strategy(DerivedParameterStrategy::Rulkov)
        .sim_code(RULKOV_SIM)
        .threshold_code("$(V) >= $(ip2)")
        .build()
}

fn poisson() -> Result<NeuronModel> {
    NeuronModel::builder("poisson")
        .variable(Variable::scalar("V"))
        .variable(Variable::new("seed", VarType::parse("uint64_t")?))
        .variable(Variable::scalar("spikeTime"))
        .parameters(&["therate", "trefract", "Vspike", "Vrest"])
        .extra_global(Variable::new("rates", VarType::parse("uint64_t *")?))
        .extra_global(Variable::new("offset", VarType::parse("unsigned int")?))
        .sim_code(POISSON_SIM)
        .threshold_code("$(V) >= $(Vspike)")
        .build()
}

fn izhikevich() -> Result<NeuronModel> {
    NeuronModel::builder("izhikevich")
        .variable(Variable::scalar("V"))
        .variable(Variable::scalar("U"))
        // time scale of U, sensitivity of U, after-spike reset of V, after-spike increment of U
        .parameters(&["a", "b", "c", "d"])
        .sim_code(IZHIKEVICH_SIM)
        .threshold_code("$(V) >= 29.99")
        .build()
}

fn izhikevich_variable() -> Result<NeuronModel> {
    NeuronModel::builder("izhikevich_variable")
        .variables(["V", "U", "a", "b", "c", "d"].map(Variable::scalar))
        .sim_code(IZHIKEVICH_SIM)
        .threshold_code("$(V) > 29.99")
        .build()
}

fn spike_source() -> Result<NeuronModel> {
    NeuronModel::builder("spike_source")
        .sim_code("")
        .threshold_code("0")
        .build()
}

/// Append the standard neuron models in their documented order
pub fn register_standard_neurons(catalog: &mut ModelCatalog<NeuronModel>) -> Result<()> {
    let fixed = InnerSteps::Fixed(TRAUB_MILES_INNER_STEPS);
    let models = [
        (handles::MAP_NEURON, rulkov_map()?),
        (handles::POISSON_NEURON, poisson()?),
        (
            handles::TRAUBMILES_FAST,
            traub_miles("traub_miles_fast", SingularityGuard::Unguarded, fixed, "$(V) > 0.0")?,
        ),
        (
            handles::TRAUBMILES_ALTERNATIVE,
            traub_miles("traub_miles_alternative", SingularityGuard::Epsilon, fixed, "$(V) > 0")?,
        ),
        (
            handles::TRAUBMILES_SAFE,
            traub_miles("traub_miles_safe", SingularityGuard::Explicit, fixed, "$(V) > 0.0")?,
        ),
        (
            handles::TRAUBMILES_PSTEP,
            traub_miles(
                "traub_miles_pstep",
                SingularityGuard::Explicit,
                InnerSteps::Parameter,
                "$(V) > 0.0",
            )?,
        ),
        (handles::IZHIKEVICH, izhikevich()?),
        (handles::IZHIKEVICH_V, izhikevich_variable()?),
        (handles::SPIKE_SOURCE, spike_source()?),
    ];
    for (expected, model) in models {
        let handle = catalog.register(model)?;
        debug_assert_eq!(handle, expected);
    }
    Ok(())
}
