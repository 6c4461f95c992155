//! The dynamic potential: a decaying per-cell crowd-density counter.
//!
//! Unlike static fields this one is mutated every step.  The movement rule
//! bumps the cell an individual vacates; the scheduler runs [`update`]
//! once per step to grow jammed spots and decay everything else.
//!
//! [`update`]: DynamicPotential::update

use rustc_hash::FxHashMap;

use egress_core::{CellId, ParameterSet, SimRng};
use egress_grid::Building;

use crate::potential::Potential;
use crate::PotentialResult;

/// Values never grow past this, keeping `max_potential` meaningful.
pub const DYNAMIC_CEILING: u32 = 10_000;

/// The crowd-density field.  Cells absent from the map have value 0.
#[derive(Clone, Debug, Default)]
pub struct DynamicPotential {
    cells: FxHashMap<CellId, u32>,
}

impl DynamicPotential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw counter value at `cell` (0 if never touched).
    #[inline]
    pub fn value(&self, cell: CellId) -> u32 {
        self.cells.get(&cell).copied().unwrap_or(0)
    }

    /// Number of cells with a non-zero value.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bump the counter at `cell`, saturating at the ceiling.
    pub fn increase(&mut self, cell: CellId) {
        let v = self.cells.entry(cell).or_insert(0);
        *v = (*v + 1).min(DYNAMIC_CEILING);
    }

    /// Decay the counter at `cell` by one; 0 stays 0.
    pub fn decrease(&mut self, cell: CellId) {
        if let Some(v) = self.cells.get_mut(&cell) {
            *v -= 1;
            if *v == 0 {
                self.cells.remove(&cell);
            }
        }
    }

    /// Per-step stochastic update over all cells of the building:
    ///
    /// - an occupied cell with no free neighbor (a jam) grows with
    ///   `probability_dynamic_increase`;
    /// - every other cell with a non-zero value decays with
    ///   `probability_dynamic_decrease`.
    ///
    /// Cells are visited in id order so a seeded run reproduces exactly.
    pub fn update(
        &mut self,
        building: &Building,
        params:   &ParameterSet,
        rng:      &mut SimRng,
    ) -> PotentialResult<()> {
        for cell in building.cell_ids() {
            let jammed = building.cell(cell)?.is_occupied()
                && building.free_neighbors(cell)?.is_empty();
            if jammed {
                if rng.gen_bool(params.probability_dynamic_increase) {
                    self.increase(cell);
                }
            } else if self.value(cell) > 0 && rng.gen_bool(params.probability_dynamic_decrease) {
                self.decrease(cell);
            }
        }
        Ok(())
    }
}

impl Potential for DynamicPotential {
    /// Defined everywhere: untouched cells read 0.
    fn potential(&self, cell: CellId) -> Option<f64> {
        Some(self.value(cell) as f64)
    }

    fn max_potential(&self) -> f64 {
        self.cells.values().max().copied().unwrap_or(0) as f64
    }
}
