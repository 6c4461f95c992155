//! corridor — smallest example for the rust_egress evacuation framework.
//!
//! An office room connects through a door to a corridor ending in a
//! two-cell exit.  A handful of individuals with mixed walking speeds and
//! reaction times evacuate; the run is recorded, rendered as ASCII every
//! few steps, and finally replayed to verify the recording reproduces the
//! live outcome.

use std::time::Instant;

use anyhow::{ensure, Result};

use egress_agent::{IndividualBuilder, Population};
use egress_core::{RoomId, Step};
use egress_grid::{exit_clusters, render_room, Building, CellKind};
use egress_potential::{compute_exit_potential, PotentialSet};
use egress_replay::replay;
use egress_rules::RuleSet;
use egress_sim::{
    IterationOrder, SimulationBuilder, SimulationConfig, SimulationObserver, SimulationResult,
    StepReport,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 42;
const STEP_LIMIT:     u64 = 500;
const RENDER_EVERY:   u64 = 2;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints both rooms side-stacked every few steps.
struct RenderObserver {
    rooms: Vec<(&'static str, RoomId)>,
}

impl SimulationObserver for RenderObserver {
    fn on_step_end(
        &mut self,
        step:        Step,
        report:      &StepReport,
        building:    &Building,
        _population: &Population,
    ) {
        if step.0 % RENDER_EVERY != 0 {
            return;
        }
        println!(
            "--- {step}  active {}  evacuated {}  dead {}  progress {:.0}%",
            report.active,
            report.evacuated,
            report.dead,
            report.progress * 100.0
        );
        for &(name, room) in &self.rooms {
            match render_room(building, room) {
                Ok(frame) => println!("{name}:\n{frame}"),
                Err(e) => println!("{name}: <render failed: {e}>"),
            }
        }
        println!();
    }

    fn on_finished(&mut self, result: &SimulationResult) {
        println!(
            "finished after {}: {} evacuated, {} dead",
            result.steps, result.evacuated, result.dead
        );
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// An 8×4 office joined by a door pair to a 6×2 corridor whose far end is a
/// two-cell exit cluster.
fn build_floor() -> Result<(Building, RoomId, RoomId)> {
    let mut building = Building::new();
    let floor = building.add_floor("ground");

    let office = building.add_room(floor, 8, 4, 0, 0)?;
    let mut office_door = None;
    for y in 0..4 {
        for x in 0..8 {
            let kind = if (x, y) == (7, 1) { CellKind::Door } else { CellKind::Open };
            let cell = building.set_cell(office, x, y, kind)?;
            if kind == CellKind::Door {
                office_door = Some(cell);
            }
        }
    }

    let corridor = building.add_room(floor, 6, 2, 8, 1)?;
    let mut corridor_door = None;
    for y in 0..2 {
        for x in 0..6 {
            let kind = match (x, y) {
                (0, 0) => CellKind::Door,
                (5, _) => CellKind::Exit,
                _ => CellKind::Open,
            };
            let cell = building.set_cell(corridor, x, y, kind)?;
            if kind == CellKind::Door {
                corridor_door = Some(cell);
            }
        }
    }

    // Unwraps cannot fire: both loops above place exactly one door.
    building.link_doors(office_door.unwrap(), corridor_door.unwrap())?;
    Ok((building, office, corridor))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== corridor — rust_egress evacuation ===");
    println!("Seed: {SEED}  |  Step limit: {STEP_LIMIT}");
    println!();

    // 1. Build the floor.
    let (building, office, corridor) = build_floor()?;
    println!(
        "Building: {} rooms, {} cells, {} exit cells",
        building.room_count(),
        building.cell_count(),
        building.exit_cells().len()
    );

    // 2. Compute the exit potential.
    let mut potentials = PotentialSet::new();
    for cluster in exit_clusters(&building)? {
        println!("Exit cluster \"{}\": {} cells", cluster.name, cluster.len());
        let field = compute_exit_potential(&building, &cluster)?;
        potentials.register_static(field);
    }

    // 3. Assemble the simulation.
    let config = SimulationConfig {
        step_limit: STEP_LIMIT,
        seed:       SEED,
        order:      IterationOrder::FrontToBack,
        ..Default::default()
    };
    let mut sim = SimulationBuilder::new(building)
        .potentials(potentials)
        .rules(RuleSet::default_evacuation())
        .config(config)
        .build()?;

    // 4. Populate the office: two quick workers, four slower visitors.
    let worker = IndividualBuilder::new().relative_speed(1.0).reaction_time(0.0);
    let visitor = IndividualBuilder::new().relative_speed(0.6).reaction_time(2.0);
    for (x, y) in [(1, 1), (2, 3)] {
        let cell = sim.building().cell_at(office, x, y).expect("office cell");
        sim.add_individual(&worker, cell)?;
    }
    for (x, y) in [(0, 0), (3, 2), (5, 1), (6, 3)] {
        let cell = sim.building().cell_at(office, x, y).expect("office cell");
        sim.add_individual(&visitor, cell)?;
    }
    println!("Population: {} individuals", sim.population().initial_count());
    println!();

    // 5. Record and run.
    sim.start_recording()?;
    let mut observer = RenderObserver {
        rooms: vec![("office", office), ("corridor", corridor)],
    };
    let t0 = Instant::now();
    let result = sim.run(&mut observer)?;
    println!("wall time: {:.2?}", t0.elapsed());
    println!();

    // 6. Replay the recording from scratch and compare.
    let recording = sim.recording()?;
    println!(
        "Recording: {} steps, {} actions",
        recording.step_count(),
        recording.action_count()
    );
    let mut replay_building = recording.initial().building.clone();
    let mut replay_population = recording.initial().population.clone();
    for (_, action) in recording.iter() {
        replay::apply(&mut replay_building, &mut replay_population, action)?;
    }
    ensure!(
        replay_population.evacuated_count() == result.evacuated
            && replay_population.dead_count() == result.dead,
        "replay diverged from the live outcome"
    );
    for cell in sim.building().cell_ids() {
        ensure!(
            replay_building.occupant(cell)? == sim.building().occupant(cell)?,
            "replay occupancy diverged at {cell}"
        );
    }
    println!("Replay verified: occupancy and outcome match the live run.");
    Ok(())
}
