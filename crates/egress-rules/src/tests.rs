//! Unit tests for the rule contract and the built-in rules.
//!
//! Rules are exercised against a plain test double of `EvacuationState`;
//! the real runtime (with recording) lives in the engine crate.

use egress_agent::{DeathCause, IndividualBuilder, IndividualStatus, Population};
use egress_core::{
    CellId, IndividualId, ParameterSet, PotentialId, RoomId, SimRng, Step, StepTiming,
};
use egress_grid::{exit_clusters, Building, CellKind};
use egress_potential::{compute_exit_potential, PotentialSet};

use crate::basic::{EvacuateRule, InitialPotentialRule, MovementRule, ReactionRule, SaveRule};
use crate::rule::EvacuationRule;
use crate::ruleset::RuleSet;
use crate::state::EvacuationState;
use crate::{RuleResult, RuleSetError};

// ── Test double ───────────────────────────────────────────────────────────────

struct TestState {
    building:    Building,
    population:  Population,
    potentials:  PotentialSet,
    rng:         SimRng,
    params:      ParameterSet,
    timing:      StepTiming,
    step:        Step,
    needed:      f64,
    /// `(from, to)` pairs seen by `move_individual`, stay-puts included.
    moves:       Vec<(CellId, CellId)>,
}

impl TestState {
    fn new(building: Building, population: Population, potentials: PotentialSet) -> Self {
        let params = ParameterSet::default();
        let timing = StepTiming::new(params.absolute_max_speed).unwrap();
        Self {
            building,
            population,
            potentials,
            rng: SimRng::new(0),
            params,
            timing,
            step: Step::ZERO,
            needed: 0.0,
            moves: Vec::new(),
        }
    }
}

impl EvacuationState for TestState {
    fn current_step(&self) -> Step {
        self.step
    }

    fn needed_time(&self) -> f64 {
        self.needed
    }

    fn set_needed_time(&mut self, steps: f64) {
        self.needed = self.needed.max(steps);
    }

    fn timing(&self) -> StepTiming {
        self.timing
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

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

    fn move_individual(&mut self, from: CellId, to: CellId) -> RuleResult<()> {
        let id = self.building.relocate(from, to)?;
        self.population.get_mut(id)?.set_cell(to);
        self.moves.push((from, to));
        Ok(())
    }

    fn swap_individuals(&mut self, c1: CellId, c2: CellId) -> RuleResult<()> {
        let (i1, i2) = self.building.swap_occupants(c1, c2)?;
        self.population.get_mut(i1)?.set_cell(c2);
        self.population.get_mut(i2)?.set_cell(c1);
        Ok(())
    }

    fn set_safe(&mut self, individual: IndividualId) -> RuleResult<()> {
        self.population.set_safe(individual, self.step)?;
        Ok(())
    }

    fn set_dead(&mut self, individual: IndividualId, cause: DeathCause) -> RuleResult<()> {
        let cell = self.population.get(individual)?.cell();
        self.population.set_dead(individual, cause)?;
        self.building.clear_occupant(cell)?;
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

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A 1×`len` unit-speed corridor with the exit at the right end, one exit
/// potential registered, and one full-speed individual at x=0.
fn corridor_state(len: u32) -> (TestState, RoomId, IndividualId) {
    let mut b = Building::new();
    let floor = b.add_floor("ground");
    let room = b.add_room(floor, len, 1, 0, 0).unwrap();
    for x in 0..len - 1 {
        b.set_cell(room, x, 0, CellKind::Open).unwrap();
    }
    b.set_cell_with_speed(room, len - 1, 0, CellKind::Exit, 1.0).unwrap();

    let mut potentials = PotentialSet::new();
    let cluster = &exit_clusters(&b).unwrap()[0];
    potentials.register_static(compute_exit_potential(&b, cluster).unwrap());

    let mut population = Population::new();
    let start = b.cell_at(room, 0, 0).unwrap();
    let id = population.add(&IndividualBuilder::new(), start).unwrap();
    b.place_individual(start, id).unwrap();

    (TestState::new(b, population, potentials), room, id)
}

fn alarm_and_assign(state: &mut TestState, id: IndividualId) {
    let cell = state.population.get(id).unwrap().cell();
    InitialPotentialRule.execute(cell, state).unwrap();
    state.population.set_alarmed(id).unwrap();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ruleset {
    use super::*;

    #[test]
    fn second_movement_rule_rejected() {
        let mut set = RuleSet::new();
        set.add(Box::new(MovementRule)).unwrap();
        assert!(matches!(
            set.add(Box::new(MovementRule)),
            Err(RuleSetError::SecondMovementRule { .. })
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn movement_rule_retrievable() {
        let mut set = RuleSet::new();
        assert!(set.movement_rule().is_none());
        set.add(Box::new(SaveRule)).unwrap();
        set.add(Box::new(MovementRule)).unwrap();
        assert_eq!(set.movement_rule().unwrap().name(), "movement");
    }

    #[test]
    fn default_evacuation_phases_and_order() {
        let set = RuleSet::default_evacuation();
        let primary: Vec<_> = set.primary_rules().map(|r| r.name()).collect();
        assert_eq!(primary, vec!["initial-potential"]);
        let looped: Vec<_> = set.loop_rules().map(|r| r.name()).collect();
        assert_eq!(looped, vec!["reaction", "movement", "save", "evacuate"]);
    }

    #[test]
    fn phases_preserve_registration_order() {
        let mut set = RuleSet::new();
        set.add_with_phases(Box::new(SaveRule), true, true).unwrap();
        set.add_with_phases(Box::new(EvacuateRule), false, true).unwrap();
        set.add_with_phases(Box::new(ReactionRule), true, false).unwrap();
        let primary: Vec<_> = set.primary_rules().map(|r| r.name()).collect();
        assert_eq!(primary, vec!["save", "reaction"]);
        let looped: Vec<_> = set.loop_rules().map(|r| r.name()).collect();
        assert_eq!(looped, vec!["save", "evacuate"]);
    }
}

#[cfg(test)]
mod initial_potential {
    use super::*;

    #[test]
    fn assigns_minimum_reachable() {
        let (mut state, room, id) = corridor_state(3);
        let cell = state.building.cell_at(room, 0, 0).unwrap();
        assert!(InitialPotentialRule.applicable(cell, &state));
        InitialPotentialRule.apply(cell, &mut state).unwrap();
        assert_eq!(state.population.get(id).unwrap().potential(), Some(PotentialId(0)));
        // Already assigned → no longer applicable.
        assert!(!InitialPotentialRule.applicable(cell, &state));
    }

    #[test]
    fn unreachable_individual_dies_not_panics() {
        // No potential registered at all.
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 1, 1, 0, 0).unwrap();
        let cell = b.set_cell(room, 0, 0, CellKind::Open).unwrap();
        let mut population = Population::new();
        let id = population.add(&IndividualBuilder::new(), cell).unwrap();
        b.place_individual(cell, id).unwrap();

        let mut state = TestState::new(b, population, PotentialSet::new());
        InitialPotentialRule.execute(cell, &mut state).unwrap();

        let individual = state.population.get(id).unwrap();
        assert!(individual.is_dead());
        assert_eq!(individual.death_cause(), Some(DeathCause::ExitUnreachable));
        assert!(state.building.cell(cell).unwrap().occupant().is_none());
    }
}

#[cfg(test)]
mod reaction {
    use super::*;

    #[test]
    fn alarmed_room_alarms_instantly() {
        let (mut state, room, id) = corridor_state(3);
        let cell = state.population.get(id).unwrap().cell();
        state.building.set_room_alarmed(room, true).unwrap();
        ReactionRule.execute(cell, &mut state).unwrap();
        assert!(state.population.get(id).unwrap().is_alarmed());
    }

    #[test]
    fn reaction_time_gates_the_alarm_and_spreads_it() {
        let (mut state, room, _) = corridor_state(4);
        // Replace the default individual set with one slow reactor.
        let mut population = Population::new();
        let cell = state.building.cell_at(room, 0, 0).unwrap();
        state.building.clear_occupant(cell).unwrap();
        let builder = IndividualBuilder::new().reaction_time(1.0);
        let id = population.add(&builder, cell).unwrap();
        state.building.place_individual(cell, id).unwrap();
        state.population = population;

        // Step 0: elapsed 0 s < 1 s reaction time.
        ReactionRule.execute(cell, &mut state).unwrap();
        assert!(!state.population.get(id).unwrap().is_alarmed());
        assert!(!state.building.room(room).unwrap().is_alarmed());

        // Enough steps for 1 s of simulated time.
        let steps_needed = state.timing.seconds_to_steps(1.0).ceil() as u64;
        state.step = Step(steps_needed);
        ReactionRule.execute(cell, &mut state).unwrap();
        assert!(state.population.get(id).unwrap().is_alarmed());
        assert!(state.building.room(room).unwrap().is_alarmed());
    }

    #[test]
    fn not_applicable_once_alarmed() {
        let (mut state, _, id) = corridor_state(3);
        let cell = state.population.get(id).unwrap().cell();
        state.population.set_alarmed(id).unwrap();
        assert!(!ReactionRule.applicable(cell, &state));
    }
}

#[cfg(test)]
mod movement {
    use super::*;

    #[test]
    fn walks_downhill_one_cell() {
        let (mut state, room, id) = corridor_state(5);
        alarm_and_assign(&mut state, id);
        let start = state.building.cell_at(room, 0, 0).unwrap();
        let next = state.building.cell_at(room, 1, 0).unwrap();

        assert!(MovementRule.applicable(start, &state));
        MovementRule.apply(start, &mut state).unwrap();

        assert_eq!(state.population.get(id).unwrap().cell(), next);
        assert_eq!(state.building.occupant(next).unwrap(), Some(id));
        assert_eq!(state.moves, vec![(start, next)]);
    }

    #[test]
    fn full_speed_crossing_takes_one_step() {
        let (mut state, _, id) = corridor_state(5);
        alarm_and_assign(&mut state, id);
        let start = state.population.get(id).unwrap().cell();
        MovementRule.apply(start, &mut state).unwrap();

        let individual = state.population.get(id).unwrap();
        assert_eq!(individual.step_start(), 0.0);
        assert!((individual.step_end() - 1.0).abs() < 1e-12);
        assert!((state.needed - 1.0).abs() < 1e-12);
        // Vacated cell stays locked until the crossing ends.
        assert!(state
            .building
            .is_occupied_at(start, 0.5 * state.timing.seconds_per_step())
            .unwrap());
    }

    #[test]
    fn crossing_individual_waits() {
        let (mut state, _, id) = corridor_state(5);
        alarm_and_assign(&mut state, id);
        let start = state.population.get(id).unwrap().cell();
        state
            .population
            .get_mut(id)
            .unwrap()
            .set_crossing_window(0.0, 2.0);
        MovementRule.apply(start, &mut state).unwrap();
        assert_eq!(state.population.get(id).unwrap().cell(), start);
        assert!(state.moves.is_empty());
    }

    #[test]
    fn blocked_individual_stays_put_but_is_recorded() {
        let (mut state, room, id) = corridor_state(3);
        alarm_and_assign(&mut state, id);
        let start = state.building.cell_at(room, 0, 0).unwrap();
        let next = state.building.cell_at(room, 1, 0).unwrap();

        // Another individual blocks the only downhill cell.
        let blocker = state
            .population
            .add(&IndividualBuilder::new(), next)
            .unwrap();
        state.building.place_individual(next, blocker).unwrap();

        MovementRule.apply(start, &mut state).unwrap();
        assert_eq!(state.population.get(id).unwrap().cell(), start);
        assert_eq!(state.moves, vec![(start, start)]);
    }

    #[test]
    fn uphill_never_chosen() {
        // Individual on the exit-adjacent cell: the only strictly-downhill
        // neighbor is the exit itself, never the cell behind.
        let (mut state, room, _) = corridor_state(3);
        let mut population = Population::new();
        let here = state.building.cell_at(room, 1, 0).unwrap();
        let old = state.building.cell_at(room, 0, 0).unwrap();
        state.building.clear_occupant(old).unwrap();
        let id = population.add(&IndividualBuilder::new(), here).unwrap();
        state.building.place_individual(here, id).unwrap();
        state.population = population;
        alarm_and_assign(&mut state, id);

        MovementRule.apply(here, &mut state).unwrap();
        let exit = state.building.cell_at(room, 2, 0).unwrap();
        assert_eq!(state.population.get(id).unwrap().cell(), exit);
    }

    #[test]
    fn dynamic_potential_bumped_on_vacated_cell() {
        let (mut state, room, id) = corridor_state(4);
        alarm_and_assign(&mut state, id);
        let start = state.building.cell_at(room, 0, 0).unwrap();
        MovementRule.apply(start, &mut state).unwrap();
        assert_eq!(state.potentials.dynamic().value(start), 1);
    }

    #[test]
    fn unalarmed_not_applicable() {
        let (mut state, _, id) = corridor_state(3);
        let cell = state.population.get(id).unwrap().cell();
        InitialPotentialRule.execute(cell, &mut state).unwrap();
        assert!(!MovementRule.applicable(cell, &state));
    }
}

#[cfg(test)]
mod save_and_evacuate {
    use super::*;
    use egress_potential::StaticPotential;

    #[test]
    fn exit_cell_saves_then_evacuates() {
        let (mut state, room, id) = corridor_state(2);
        alarm_and_assign(&mut state, id);
        let start = state.building.cell_at(room, 0, 0).unwrap();
        let exit = state.building.cell_at(room, 1, 0).unwrap();
        MovementRule.apply(start, &mut state).unwrap();
        assert_eq!(state.population.get(id).unwrap().cell(), exit);

        // Evacuate before save: not applicable yet.
        assert!(!EvacuateRule.applicable(exit, &state));

        SaveRule.execute(exit, &mut state).unwrap();
        assert_eq!(state.population.get(id).unwrap().status(), IndividualStatus::Safe);
        assert_eq!(state.population.get(id).unwrap().safety_time(), Some(Step::ZERO));
        // Still carrying the exit potential: parked until the batch removal.
        assert!(!MovementRule.applicable(exit, &state));

        EvacuateRule.execute(exit, &mut state).unwrap();
        let removed = state.population.remove_marked().unwrap();
        assert_eq!(removed, vec![id]);
    }

    #[test]
    fn safe_cell_reassigns_safe_potential() {
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 1, 1, 0, 0).unwrap();
        let cell = b.set_cell(room, 0, 0, CellKind::Safe).unwrap();
        let mut population = Population::new();
        let id = population.add(&IndividualBuilder::new(), cell).unwrap();
        b.place_individual(cell, id).unwrap();

        let mut potentials = PotentialSet::new();
        let mut safe_field = StaticPotential::new("safe");
        safe_field.set_potential(cell, 0.0).unwrap();
        let safe = potentials.register_safe_potential(safe_field);

        let mut state = TestState::new(b, population, potentials);
        state.population.set_alarmed(id).unwrap();
        SaveRule.execute(cell, &mut state).unwrap();

        let individual = state.population.get(id).unwrap();
        assert_eq!(individual.status(), IndividualStatus::Safe);
        assert_eq!(individual.potential(), Some(safe));
        // Safe cells are not exits: no removal marking here.
        assert!(!EvacuateRule.applicable(cell, &state));
    }

    #[test]
    fn saved_individual_walks_deeper_into_the_safe_area() {
        // Two-cell protected area.  Once saved on the entrance, the safe
        // potential keeps the individual moving toward the inner cell.
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 2, 1, 0, 0).unwrap();
        let entrance = b.set_cell(room, 0, 0, CellKind::Safe).unwrap();
        let inner = b.set_cell(room, 1, 0, CellKind::Safe).unwrap();
        let mut population = Population::new();
        let id = population.add(&IndividualBuilder::new(), entrance).unwrap();
        b.place_individual(entrance, id).unwrap();

        let mut potentials = PotentialSet::new();
        let mut safe_field = StaticPotential::new("safe");
        safe_field.set_potential(entrance, 1.0).unwrap();
        safe_field.set_potential(inner, 0.0).unwrap();
        potentials.register_safe_potential(safe_field);

        let mut state = TestState::new(b, population, potentials);
        state.population.set_alarmed(id).unwrap();
        SaveRule.execute(entrance, &mut state).unwrap();

        assert!(MovementRule.applicable(entrance, &state));
        MovementRule.apply(entrance, &mut state).unwrap();
        assert_eq!(state.population.get(id).unwrap().cell(), inner);
        assert_eq!(state.building.occupant(entrance).unwrap(), None);
    }
}
