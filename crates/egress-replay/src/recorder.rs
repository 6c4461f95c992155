//! The action recorder.
//!
//! # Isolation
//!
//! `set_initial_configuration` deep-copies the building, population, and
//! potentials (arena `Clone`, no shared references) and derives two identity
//! maps — live cell → clone cell, keyed through the immutable
//! `CellKey (room, x, y)`, and live potential → clone potential, keyed by
//! registration order.  Every action recorded afterwards is translated
//! through these maps before it is stored, so a recording only ever
//! references clone entities and outlives the live run.

use rustc_hash::FxHashMap;

use egress_agent::Population;
use egress_core::{CellId, PotentialId};
use egress_grid::Building;
use egress_potential::PotentialSet;

use crate::action::Action;
use crate::config::InitialConfiguration;
use crate::recording::Recording;
use crate::{ReplayError, ReplayResult};

/// Records one run into a time-bucketed action log.
///
/// Owned by the engine and passed by reference to every component that emits
/// actions; lifecycle (`start`, `stop`, `reset`) is explicit.  While
/// inactive, [`record_action`](Self::record_action) is a silent no-op so
/// call sites never branch on recording state.
#[derive(Debug, Default)]
pub struct Recorder {
    active:        bool,
    initial:       Option<InitialConfiguration>,
    cell_map:      FxHashMap<CellId, CellId>,
    potential_map: FxHashMap<PotentialId, PotentialId>,
    /// One bucket per step; bucket 0 collects initialization actions.
    actions:       Vec<Vec<Action>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Freeze the current live state as the recording's starting point and
    /// (re)build both identity maps.  Clears any previous log.
    pub fn set_initial_configuration(
        &mut self,
        building:           &Building,
        population:         &Population,
        potentials:         &PotentialSet,
        absolute_max_speed: f64,
    ) -> ReplayResult<()> {
        let clone_building = building.clone();
        let mut clone_population = population.clone();
        let clone_potentials = potentials.clone();

        // Live cell → clone cell, resolved through the immutable key so the
        // mapping never depends on mutable cell state.
        let mut cell_map = FxHashMap::default();
        for live_id in building.cell_ids() {
            let key = building.cell(live_id)?.key();
            let clone_id = clone_building
                .cell_at(key.room, key.x, key.y)
                .ok_or(ReplayError::UnmappedCell(live_id))?;
            cell_map.insert(live_id, clone_id);
        }

        // Live potential → clone potential, paired by registration order.
        let mut potential_map = FxHashMap::default();
        for (live, clone) in potentials.statics().zip(clone_potentials.statics()) {
            potential_map.insert(live.id(), clone.id());
        }

        // Rewire each cloned individual onto clone entities.
        let ids: Vec<_> = clone_population.iter().map(|i| i.id()).collect();
        for id in ids {
            let individual = clone_population.get_mut(id)?;
            let cell = individual.cell();
            let mapped_cell = *cell_map
                .get(&cell)
                .ok_or(ReplayError::UnmappedCell(cell))?;
            individual.set_cell(mapped_cell);
            if let Some(potential) = individual.potential() {
                let mapped = *potential_map
                    .get(&potential)
                    .ok_or(ReplayError::UnmappedPotential(potential))?;
                individual.set_potential(Some(mapped));
            }
        }

        self.initial = Some(InitialConfiguration {
            building:   clone_building,
            population: clone_population,
            potentials: clone_potentials,
            absolute_max_speed,
        });
        self.cell_map = cell_map;
        self.potential_map = potential_map;
        self.actions.clear();
        Ok(())
    }

    /// Begin recording.  Fails without a configured starting point.
    pub fn start(&mut self) -> ReplayResult<()> {
        if self.initial.is_none() {
            return Err(ReplayError::NoConfiguration);
        }
        if self.actions.is_empty() {
            self.actions.push(Vec::new());
        }
        self.active = true;
        Ok(())
    }

    /// Stop recording.  The log stays retrievable.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Drop configuration, maps, and log.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance to the next time bucket.  No-op while inactive.
    pub fn next_step(&mut self) {
        if self.active {
            self.actions.push(Vec::new());
        }
    }

    /// Record one action, translating its live ids into clone ids.
    /// Silent no-op while inactive; an id the clone does not know is an
    /// error (the live topology changed after `set_initial_configuration`).
    pub fn record_action(&mut self, action: &Action) -> ReplayResult<()> {
        if !self.active {
            return Ok(());
        }
        let translated = self.translate(action)?;
        self.actions
            .last_mut()
            .ok_or(ReplayError::NoConfiguration)?
            .push(translated);
        Ok(())
    }

    /// Package the frozen configuration and the full log.  The log is
    /// copied, not consumed: recording can continue afterwards.
    pub fn recording(&self) -> ReplayResult<Recording> {
        let initial = self.initial.clone().ok_or(ReplayError::NoConfiguration)?;
        Ok(Recording::new(initial, self.actions.clone()))
    }

    fn map_cell(&self, cell: CellId) -> ReplayResult<CellId> {
        self.cell_map
            .get(&cell)
            .copied()
            .ok_or(ReplayError::UnmappedCell(cell))
    }

    fn translate(&self, action: &Action) -> ReplayResult<Action> {
        Ok(match *action {
            Action::Move { from, to, individual } => Action::Move {
                from: self.map_cell(from)?,
                to:   self.map_cell(to)?,
                individual,
            },
            Action::Swap { cell1, cell2 } => Action::Swap {
                cell1: self.map_cell(cell1)?,
                cell2: self.map_cell(cell2)?,
            },
            Action::Exit { cell, individual } => Action::Exit {
                cell: self.map_cell(cell)?,
                individual,
            },
            Action::Die { cell, individual, cause } => Action::Die {
                cell: self.map_cell(cell)?,
                individual,
                cause,
            },
            Action::StateChanged(state) => Action::StateChanged(state),
        })
    }
}
