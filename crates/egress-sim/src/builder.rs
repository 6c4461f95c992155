//! Fluent assembly of a simulation.

use egress_core::StepTiming;
use egress_grid::Building;
use egress_potential::PotentialSet;
use egress_rules::RuleSet;

use crate::config::SimulationConfig;
use crate::sim::EvacuationSimulation;
use crate::{SimResult, SimulationError};

/// Assembles an [`EvacuationSimulation`] from its parts.
///
/// The building is mandatory; potentials default to an empty set (every
/// individual would then die exit-unreachable at initialization), rules
/// default to [`RuleSet::default_evacuation`], and the configuration to
/// [`SimulationConfig::default`].
///
/// ```rust,ignore
/// let mut sim = SimulationBuilder::new(building)
///     .potentials(potentials)
///     .config(SimulationConfig { seed: 42, ..Default::default() })
///     .build()?;
/// ```
pub struct SimulationBuilder {
    building:   Building,
    potentials: PotentialSet,
    rules:      Option<RuleSet>,
    config:     SimulationConfig,
}

impl SimulationBuilder {
    pub fn new(building: Building) -> Self {
        Self {
            building,
            potentials: PotentialSet::new(),
            rules:      None,
            config:     SimulationConfig::default(),
        }
    }

    pub fn potentials(mut self, potentials: PotentialSet) -> Self {
        self.potentials = potentials;
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the inputs and build a `Ready` simulation.
    pub fn build(self) -> SimResult<EvacuationSimulation> {
        if self.config.step_limit == 0 {
            return Err(SimulationError::ZeroStepLimit);
        }
        if self.building.cell_count() == 0 {
            return Err(SimulationError::MissingInput("a building with cells"));
        }
        let timing = StepTiming::new(self.config.parameters.absolute_max_speed)?;
        let rules = self.rules.unwrap_or_else(RuleSet::default_evacuation);
        Ok(EvacuationSimulation::new(
            self.building,
            self.potentials,
            rules,
            self.config,
            timing,
        ))
    }
}
