//! Static potentials: immutable per-exit distance fields.

use rustc_hash::FxHashMap;

use egress_core::{CellId, PotentialId};

use crate::potential::Potential;
use crate::{PotentialError, PotentialResult};

/// A distance field computed once per exit cluster.
///
/// Immutable during a run by convention: the engine never writes to a
/// registered static potential, so rules may cache values freely.  The id is
/// `PotentialId::INVALID` until the field is registered with a
/// [`PotentialSet`](crate::PotentialSet).
#[derive(Clone, Debug)]
pub struct StaticPotential {
    id:    PotentialId,
    name:  String,
    cells: FxHashMap<CellId, f64>,
    max:   f64,
}

impl StaticPotential {
    /// An empty, unregistered field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id:    PotentialId::INVALID,
            name:  name.into(),
            cells: FxHashMap::default(),
            max:   0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> PotentialId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of cells with a value.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set the value at `cell`.  Rejects negative and non-finite values.
    pub fn set_potential(&mut self, cell: CellId, value: f64) -> PotentialResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(PotentialError::BadValue(value));
        }
        self.cells.insert(cell, value);
        if value > self.max {
            self.max = value;
        }
        Ok(())
    }

    pub(crate) fn set_id(&mut self, id: PotentialId) {
        self.id = id;
    }
}

impl Potential for StaticPotential {
    fn potential(&self, cell: CellId) -> Option<f64> {
        self.cells.get(&cell).copied()
    }

    fn max_potential(&self) -> f64 {
        self.max
    }
}
