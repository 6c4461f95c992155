//! Run configuration.

use egress_core::ParameterSet;

use crate::order::IterationOrder;

/// Host-facing knobs of one evacuation run.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Hard cap on executed steps; reaching it ends the run and forces
    /// stragglers dead.
    pub step_limit: u64,

    /// RNG seed.  Identical seed, inputs, and rule set replay identically.
    pub seed: u64,

    /// The order in which individuals are processed within one step.
    pub order: IterationOrder,

    /// Model parameters shared with the rules.
    pub parameters: ParameterSet,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_limit: 1_000,
            seed:       0,
            order:      IterationOrder::Identity,
            parameters: ParameterSet::default(),
        }
    }
}
