//! The engine runtime: owner of all run state and the conflict resolver.
//!
//! # Conflict resolution
//!
//! [`move_individual`] and [`swap_individuals`] are the only paths that
//! change occupancy during a run.  Each validates every precondition before
//! touching anything, records the action, and only then mutates grid and
//! back-references — a failed call leaves the run untouched, and the
//! recording never contains an action that did not happen.
//!
//! [`move_individual`]: EvacuationState::move_individual
//! [`swap_individuals`]: EvacuationState::swap_individuals

use egress_agent::{DeathCause, Population};
use egress_core::{
    AutomatonState, CellId, IndividualId, ParameterSet, PotentialId, RoomId, SimRng, Step,
    StepTiming,
};
use egress_grid::{Building, GridError};
use egress_potential::PotentialSet;
use egress_replay::{Action, Recorder};
use egress_rules::{EvacuationState, RuleError, RuleResult};

use crate::SimResult;

/// All state of one evacuation run under one owner.
///
/// Rules see it as `&mut dyn EvacuationState`; the simulation front-end in
/// [`crate::sim`] drives it directly.
pub(crate) struct EvacuationRuntime {
    pub(crate) building:    Building,
    pub(crate) population:  Population,
    pub(crate) potentials:  PotentialSet,
    pub(crate) recorder:    Recorder,
    pub(crate) params:      ParameterSet,
    pub(crate) timing:      StepTiming,
    pub(crate) rng:         SimRng,
    pub(crate) step:        Step,
    /// Fractional step the run must reach before it may finish.
    pub(crate) needed_time: f64,
}

impl EvacuationRuntime {
    pub(crate) fn new(
        building:   Building,
        potentials: PotentialSet,
        params:     ParameterSet,
        timing:     StepTiming,
        seed:       u64,
    ) -> Self {
        Self {
            building,
            population: Population::new(),
            potentials,
            recorder: Recorder::new(),
            params,
            timing,
            rng: SimRng::new(seed),
            step: Step::ZERO,
            needed_time: 0.0,
        }
    }

    /// Record one action; an inactive recorder swallows it.
    fn record(&mut self, action: &Action) -> RuleResult<()> {
        self.recorder
            .record_action(action)
            .map_err(|e| RuleError::Recording(e.to_string()))
    }

    pub(crate) fn record_state_change(&mut self, state: AutomatonState) -> RuleResult<()> {
        self.record(&Action::StateChanged(state))
    }

    /// Flush the step's evacuation batch: every marked individual leaves its
    /// cell and the run, with an `Exit` action each.
    pub(crate) fn evacuate_marked(&mut self) -> SimResult<()> {
        for id in self.population.remove_marked()? {
            let cell = self.population.get(id)?.cell();
            self.record(&Action::Exit { cell, individual: id })?;
            self.building.clear_occupant(cell)?;
        }
        Ok(())
    }

    /// Per-step dynamic-potential update (grow jams, decay the rest).
    pub(crate) fn update_dynamic(&mut self) -> SimResult<()> {
        self.potentials
            .dynamic_mut()
            .update(&self.building, &self.params, &mut self.rng)?;
        Ok(())
    }
}

impl EvacuationState for EvacuationRuntime {
    // ── Time ──────────────────────────────────────────────────────────────

    fn current_step(&self) -> Step {
        self.step
    }

    fn needed_time(&self) -> f64 {
        self.needed_time
    }

    fn set_needed_time(&mut self, steps: f64) {
        if steps > self.needed_time {
            self.needed_time = steps;
        }
    }

    fn timing(&self) -> StepTiming {
        self.timing
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    // ── Read views ────────────────────────────────────────────────────────

    fn building(&self) -> &Building {
        &self.building
    }

    fn population(&self) -> &Population {
        &self.population
    }

    fn potentials(&self) -> &PotentialSet {
        &self.potentials
    }

    fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    // ── Sanctioned mutations ──────────────────────────────────────────────

    fn move_individual(&mut self, from: CellId, to: CellId) -> RuleResult<()> {
        let individual = self
            .building
            .occupant(from)?
            .ok_or(GridError::CellEmpty(from))?;
        if from != to && self.building.cell(to)?.is_occupied() {
            return Err(GridError::CellOccupied(to).into());
        }
        self.record(&Action::Move { from, to, individual })?;
        self.building.relocate(from, to)?;
        self.population.get_mut(individual)?.set_cell(to);
        Ok(())
    }

    fn swap_individuals(&mut self, c1: CellId, c2: CellId) -> RuleResult<()> {
        if c1 == c2 {
            return Err(GridError::SwapSameCell(c1).into());
        }
        let i1 = self.building.occupant(c1)?.ok_or(GridError::CellEmpty(c1))?;
        let i2 = self.building.occupant(c2)?.ok_or(GridError::CellEmpty(c2))?;
        self.record(&Action::Swap { cell1: c1, cell2: c2 })?;
        self.building.swap_occupants(c1, c2)?;
        self.population.get_mut(i1)?.set_cell(c2);
        self.population.get_mut(i2)?.set_cell(c1);
        Ok(())
    }

    fn set_safe(&mut self, individual: IndividualId) -> RuleResult<()> {
        // Becoming safe is not a grid mutation; the later Exit action carries
        // it into the recording.
        self.population.set_safe(individual, self.step)?;
        Ok(())
    }

    fn set_dead(&mut self, individual: IndividualId, cause: DeathCause) -> RuleResult<()> {
        let cell = self.population.get(individual)?.cell();
        self.record(&Action::Die { cell, individual, cause })?;
        self.building.clear_occupant(cell)?;
        self.population.set_dead(individual, cause)?;
        Ok(())
    }

    fn mark_for_removal(&mut self, individual: IndividualId) -> RuleResult<()> {
        self.population.mark_for_removal(individual)?;
        Ok(())
    }

    fn assign_potential(
        &mut self,
        individual: IndividualId,
        potential:  PotentialId,
    ) -> RuleResult<()> {
        self.population.assign_potential(individual, potential)?;
        Ok(())
    }

    fn set_alarmed(&mut self, individual: IndividualId) -> RuleResult<()> {
        self.population.set_alarmed(individual)?;
        Ok(())
    }

    fn set_room_alarmed(&mut self, room: RoomId, alarmed: bool) -> RuleResult<()> {
        self.building.set_room_alarmed(room, alarmed)?;
        Ok(())
    }

    fn lock_cell(&mut self, cell: CellId, until_secs: f64) -> RuleResult<()> {
        self.building.lock_cell(cell, until_secs)?;
        Ok(())
    }

    fn set_crossing_window(
        &mut self,
        individual: IndividualId,
        start:      f64,
        end:        f64,
    ) -> RuleResult<()> {
        self.population
            .get_mut(individual)?
            .set_crossing_window(start, end);
        Ok(())
    }

    fn increase_dynamic_potential(&mut self, cell: CellId) {
        self.potentials.dynamic_mut().increase(cell);
    }

    fn decrease_dynamic_potential(&mut self, cell: CellId) {
        self.potentials.dynamic_mut().decrease(cell);
    }
}
