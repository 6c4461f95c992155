//! Scheduler, state-machine, and end-to-end run tests.

use egress_agent::{DeathCause, IndividualBuilder, IndividualStatus};
use egress_core::{AutomatonState, CellId, Step};
use egress_grid::{exit_clusters, Building, CellKind};
use egress_potential::{compute_exit_potential, PotentialSet};
use egress_replay::{replay, Action};
use egress_rules::basic::{InitialPotentialRule, MovementRule, ReactionRule, SaveRule};
use egress_rules::RuleSet;

use crate::{
    EvacuationSimulation, IterationOrder, NoopObserver, SimulationBuilder, SimulationConfig,
    SimulationError,
};

/// A 1×`len` corridor with the exit on the right.  Returns the ready
/// simulation and the cell ids, left to right.
fn corridor(len: u32, config: SimulationConfig, rules: RuleSet) -> (EvacuationSimulation, Vec<CellId>) {
    let (building, cells) = corridor_building(len);
    let potentials = corridor_potentials(&building);
    let sim = SimulationBuilder::new(building)
        .potentials(potentials)
        .rules(rules)
        .config(config)
        .build()
        .unwrap();
    (sim, cells)
}

fn corridor_building(len: u32) -> (Building, Vec<CellId>) {
    let mut building = Building::new();
    let floor = building.add_floor("ground");
    let room = building.add_room(floor, len, 1, 0, 0).unwrap();
    let cells = (0..len)
        .map(|x| {
            let kind = if x == len - 1 { CellKind::Exit } else { CellKind::Open };
            building.set_cell(room, x, 0, kind).unwrap()
        })
        .collect();
    (building, cells)
}

fn corridor_potentials(building: &Building) -> PotentialSet {
    let mut potentials = PotentialSet::new();
    let clusters = exit_clusters(building).unwrap();
    let field = compute_exit_potential(building, &clusters[0]).unwrap();
    potentials.register_static(field);
    potentials
}

/// The default chain minus the evacuate rule: individuals become safe on the
/// exit cell but stay on the grid.
fn rules_without_evacuate() -> RuleSet {
    let mut set = RuleSet::new();
    set.add_with_phases(Box::new(InitialPotentialRule), true, false).unwrap();
    set.add_with_phases(Box::new(ReactionRule), false, true).unwrap();
    set.add_with_phases(Box::new(MovementRule), false, true).unwrap();
    set.add_with_phases(Box::new(SaveRule), false, true).unwrap();
    set
}

mod lifecycle {
    use super::*;

    #[test]
    fn step_before_initialize_is_rejected() {
        let (mut sim, _) = corridor(5, SimulationConfig::default(), RuleSet::default_evacuation());
        assert!(matches!(
            sim.step(),
            Err(SimulationError::IllegalState {
                required: AutomatonState::Running,
                actual:   AutomatonState::Ready,
            })
        ));
    }

    #[test]
    fn add_individual_after_start_is_rejected() {
        let (mut sim, cells) = corridor(5, SimulationConfig::default(), RuleSet::default_evacuation());
        sim.initialize().unwrap();
        assert!(matches!(
            sim.add_individual(&IndividualBuilder::new(), cells[0]),
            Err(SimulationError::IllegalState { .. })
        ));
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let (mut sim, _) = corridor(5, SimulationConfig::default(), RuleSet::default_evacuation());
        sim.initialize().unwrap();
        assert!(matches!(sim.initialize(), Err(SimulationError::IllegalState { .. })));
    }

    #[test]
    fn terminate_requires_running() {
        let (mut sim, _) = corridor(5, SimulationConfig::default(), RuleSet::default_evacuation());
        assert!(matches!(sim.terminate(), Err(SimulationError::IllegalState { .. })));
    }

    #[test]
    fn reset_returns_to_ready_with_empty_population() {
        let (mut sim, cells) = corridor(5, SimulationConfig::default(), RuleSet::default_evacuation());
        sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        sim.start_recording().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.state(), AutomatonState::Finished);

        sim.reset().unwrap();
        assert_eq!(sim.state(), AutomatonState::Ready);
        assert_eq!(sim.population().initial_count(), 0);
        assert_eq!(sim.current_step(), Step::ZERO);
        assert!(sim.recording().is_err());
        for &cell in &cells {
            assert_eq!(sim.building().occupant(cell).unwrap(), None);
        }
        // A fresh run can be staged on the same structure.
        sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
    }

    #[test]
    fn builder_rejects_zero_step_limit() {
        let (building, _) = corridor_building(5);
        let result = SimulationBuilder::new(building)
            .config(SimulationConfig { step_limit: 0, ..Default::default() })
            .build();
        assert!(matches!(result, Err(SimulationError::ZeroStepLimit)));
    }

    #[test]
    fn builder_rejects_empty_building() {
        let result = SimulationBuilder::new(Building::new()).build();
        assert!(matches!(result, Err(SimulationError::MissingInput(_))));
    }
}

mod corridor_run {
    use super::*;

    #[test]
    fn individual_is_safe_on_the_exit_after_four_steps() {
        // 1×5 corridor, full speed, zero reaction time: the alarm fires at
        // step 1 and each step covers one cell, so the individual stands on
        // the exit, safe, at step 4.
        let (mut sim, cells) = corridor(5, SimulationConfig::default(), rules_without_evacuate());
        let id = sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        let result = sim.run(&mut NoopObserver).unwrap();

        let individual = sim.population().get(id).unwrap();
        assert_eq!(individual.status(), IndividualStatus::Safe);
        assert_eq!(individual.safety_time(), Some(Step(4)));
        assert_eq!(individual.cell(), cells[4]);
        assert_eq!(result.evacuated, 0);
        assert_eq!(result.dead, 0);
    }

    #[test]
    fn default_rules_evacuate_through_the_exit() {
        let (mut sim, cells) = corridor(5, SimulationConfig::default(), RuleSet::default_evacuation());
        let id = sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        let result = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(result.evacuated, 1);
        assert_eq!(result.dead, 0);
        let individual = sim.population().get(id).unwrap();
        assert_eq!(individual.status(), IndividualStatus::Evacuated);
        assert_eq!(individual.safety_time(), Some(Step(4)));
        // The exit cell is free again after the batch removal.
        assert_eq!(sim.building().occupant(cells[4]).unwrap(), None);
        assert_eq!(sim.state(), AutomatonState::Finished);
    }

    #[test]
    fn unreachable_individual_dies_at_initialization() {
        let (mut building, _) = corridor_building(5);
        let floor = egress_core::FloorId(0);
        let island = building.add_room(floor, 1, 1, 10, 0).unwrap();
        let island_cell = building.set_cell(island, 0, 0, CellKind::Open).unwrap();
        let potentials = corridor_potentials(&building);

        let mut sim = SimulationBuilder::new(building)
            .potentials(potentials)
            .build()
            .unwrap();
        let id = sim.add_individual(&IndividualBuilder::new(), island_cell).unwrap();
        assert_eq!(sim.population().get(id).unwrap().potential(), None);

        sim.initialize().unwrap();
        let individual = sim.population().get(id).unwrap();
        assert_eq!(individual.status(), IndividualStatus::Dead);
        assert_eq!(individual.death_cause(), Some(DeathCause::ExitUnreachable));
        assert_eq!(sim.building().occupant(island_cell).unwrap(), None);
        assert_eq!(sim.population().not_safe_count(), 0);
    }

    #[test]
    fn population_is_conserved_every_step() {
        let (mut sim, cells) = corridor(8, SimulationConfig::default(), RuleSet::default_evacuation());
        for &cell in &cells[..3] {
            sim.add_individual(&IndividualBuilder::new(), cell).unwrap();
        }
        sim.initialize().unwrap();

        while !sim.is_finished() {
            let report = sim.step().unwrap();
            assert_eq!(report.active + report.evacuated + report.dead, 3);
            // Grid back-references stay consistent.
            for &id in sim.population().active() {
                let cell = sim.population().get(id).unwrap().cell();
                assert_eq!(sim.building().occupant(cell).unwrap(), Some(id));
            }
        }
        let result = sim.terminate().unwrap();
        assert_eq!(result.evacuated, 3);
        assert_eq!(result.dead, 0);
    }

    #[test]
    fn saved_individuals_clear_the_safe_area_entrance() {
        // 1×6 corridor whose last two cells are a protected area.  The
        // approach field ends at the entrance; once the individual is saved
        // there, the safe potential takes over and pulls it one cell deeper,
        // leaving the entrance free for whoever comes next.
        use egress_potential::StaticPotential;

        let mut building = Building::new();
        let floor = building.add_floor("ground");
        let room = building.add_room(floor, 6, 1, 0, 0).unwrap();
        let cells: Vec<CellId> = (0..6)
            .map(|x| {
                let kind = if x >= 4 { CellKind::Safe } else { CellKind::Open };
                building.set_cell(room, x, 0, kind).unwrap()
            })
            .collect();

        let mut approach = StaticPotential::new("approach");
        for (x, &cell) in cells.iter().enumerate().take(5) {
            approach.set_potential(cell, (4 - x) as f64).unwrap();
        }
        let mut inner = StaticPotential::new("safe");
        inner.set_potential(cells[4], 1.0).unwrap();
        inner.set_potential(cells[5], 0.0).unwrap();

        let mut potentials = PotentialSet::new();
        potentials.register_static(approach);
        potentials.register_safe_potential(inner);

        let mut sim = SimulationBuilder::new(building)
            .potentials(potentials)
            .build()
            .unwrap();
        let id = sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        sim.initialize().unwrap();
        for _ in 0..8 {
            sim.step().unwrap();
        }

        let individual = sim.population().get(id).unwrap();
        assert_eq!(individual.status(), IndividualStatus::Safe);
        assert_eq!(individual.cell(), cells[5]);
        assert_eq!(sim.building().occupant(cells[4]).unwrap(), None);
    }

    #[test]
    fn step_limit_forces_stragglers_dead() {
        // Two steps are never enough for a 1×8 corridor.
        let config = SimulationConfig { step_limit: 2, ..Default::default() };
        let (mut sim, cells) = corridor(8, config, RuleSet::default_evacuation());
        let id = sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        let result = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(result.steps, Step(2));
        assert_eq!(result.dead, 1);
        let individual = sim.population().get(id).unwrap();
        assert_eq!(individual.death_cause(), Some(DeathCause::NotEnoughTime));
    }
}

mod ordering {
    use super::*;
    use egress_core::IndividualId;

    /// Two individuals contending for one exit: `far` is diagonal to it,
    /// `near` orthogonal.  Whoever is processed first takes the exit in
    /// step 1; the other follows in step 2.
    fn contention(order: IterationOrder) -> (EvacuationSimulation, IndividualId, IndividualId) {
        let mut building = Building::new();
        let floor = building.add_floor("ground");
        let room = building.add_room(floor, 3, 2, 0, 0).unwrap();
        let far = building.set_cell(room, 0, 0, CellKind::Open).unwrap();
        let near = building.set_cell(room, 1, 0, CellKind::Open).unwrap();
        building.set_cell(room, 2, 0, CellKind::Open).unwrap();
        building.set_cell(room, 1, 1, CellKind::Exit).unwrap();
        let potentials = corridor_potentials(&building);

        let mut sim = SimulationBuilder::new(building)
            .potentials(potentials)
            .config(SimulationConfig { order, ..Default::default() })
            .build()
            .unwrap();
        let far = sim.add_individual(&IndividualBuilder::new(), far).unwrap();
        let near = sim.add_individual(&IndividualBuilder::new(), near).unwrap();
        (sim, far, near)
    }

    #[test]
    fn front_to_back_lets_the_nearer_individual_exit_first() {
        let (mut sim, far, near) = contention(IterationOrder::FrontToBack);
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.population().get(near).unwrap().safety_time(), Some(Step(1)));
        assert_eq!(sim.population().get(far).unwrap().safety_time(), Some(Step(2)));
    }

    #[test]
    fn back_to_front_lets_the_farther_individual_exit_first() {
        let (mut sim, far, near) = contention(IterationOrder::BackToFront);
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.population().get(far).unwrap().safety_time(), Some(Step(1)));
        assert_eq!(sim.population().get(near).unwrap().safety_time(), Some(Step(2)));
    }

    #[test]
    fn random_order_reproduces_for_equal_seeds() {
        let run = || {
            let config = SimulationConfig {
                seed: 7,
                order: IterationOrder::Random,
                ..Default::default()
            };
            let (mut sim, cells) = corridor(8, config, RuleSet::default_evacuation());
            for &cell in &cells[..3] {
                sim.add_individual(&IndividualBuilder::new(), cell).unwrap();
            }
            let result = sim.run(&mut NoopObserver).unwrap();
            let safety: Vec<_> = sim.population().iter().map(|i| i.safety_time()).collect();
            (result.steps, result.evacuated, safety)
        };
        assert_eq!(run(), run());
    }
}

mod recording {
    use super::*;

    #[test]
    fn stay_put_is_recorded() {
        let (mut sim, cells) = corridor(3, SimulationConfig::default(), RuleSet::default_evacuation());
        let blocked = sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        sim.add_individual(&IndividualBuilder::new(), cells[1]).unwrap();
        sim.start_recording().unwrap();
        sim.initialize().unwrap();
        sim.step().unwrap();

        let recording = sim.recording().unwrap();
        let stayed = recording.actions_at(Step(1)).iter().any(|a| {
            matches!(
                *a,
                Action::Move { from, to, individual }
                    if from == cells[0] && to == cells[0] && individual == blocked
            )
        });
        assert!(stayed, "blocked individual should record a stay-put move");
    }

    #[test]
    fn replay_reproduces_the_final_occupancy() {
        let (mut sim, cells) = corridor(6, SimulationConfig::default(), RuleSet::default_evacuation());
        sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        sim.add_individual(&IndividualBuilder::new().relative_speed(0.5), cells[1]).unwrap();
        sim.start_recording().unwrap();
        let result = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(result.evacuated, 2);

        let recording = sim.recording().unwrap();
        let mut building = recording.initial().building.clone();
        let mut population = recording.initial().population.clone();
        for (_, action) in recording.iter() {
            replay::apply(&mut building, &mut population, action).unwrap();
        }

        assert_eq!(population.evacuated_count(), sim.population().evacuated_count());
        assert_eq!(population.dead_count(), sim.population().dead_count());
        for cell in sim.building().cell_ids() {
            assert_eq!(
                building.occupant(cell).unwrap(),
                sim.building().occupant(cell).unwrap(),
                "occupancy diverged at {cell}",
            );
        }
    }

    #[test]
    fn rerun_from_initial_configuration_matches_the_live_run() {
        let (mut sim, cells) = corridor(6, SimulationConfig::default(), RuleSet::default_evacuation());
        sim.add_individual(&IndividualBuilder::new(), cells[0]).unwrap();
        sim.add_individual(&IndividualBuilder::new(), cells[2]).unwrap();
        sim.start_recording().unwrap();
        let live = sim.run(&mut NoopObserver).unwrap();

        let recording = sim.recording().unwrap();
        let mut rerun = EvacuationSimulation::from_initial_configuration(
            recording.initial().clone(),
            RuleSet::default_evacuation(),
            SimulationConfig::default(),
        )
        .unwrap();
        let replayed = rerun.run(&mut NoopObserver).unwrap();

        assert_eq!(replayed.steps, live.steps);
        assert_eq!(replayed.evacuated, live.evacuated);
        assert_eq!(replayed.dead, live.dead);
    }
}
