//! The potential registry: every field of one run under one roof.

use egress_core::{CellId, PotentialId};

use crate::dynamic::DynamicPotential;
use crate::potential::Potential;
use crate::static_field::StaticPotential;
use crate::{PotentialError, PotentialResult};

/// All potentials of a run: the exit fields, an optional safe-area field,
/// and the single dynamic field.
///
/// Registration order defines `PotentialId`s, which is also the tie-break
/// order of [`min_potential_for`](Self::min_potential_for) — so two runs
/// that register the same fields in the same order assign identically.
#[derive(Clone, Debug, Default)]
pub struct PotentialSet {
    statics: Vec<StaticPotential>,
    /// Id of the safe-area field inside `statics`, if one was registered.
    safe:    Option<PotentialId>,
    dynamic: DynamicPotential,
}

impl PotentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register an exit field; its id is the next in registration order.
    pub fn register_static(&mut self, mut field: StaticPotential) -> PotentialId {
        let id = PotentialId(self.statics.len() as u32);
        field.set_id(id);
        self.statics.push(field);
        id
    }

    /// Register the safe-area field: the potential reassigned to individuals
    /// that reached a safe (non-exit) cell.  It never takes part in minimum
    /// assignment.
    pub fn register_safe_potential(&mut self, field: StaticPotential) -> PotentialId {
        let id = self.register_static(field);
        self.safe = Some(id);
        id
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn get(&self, id: PotentialId) -> PotentialResult<&StaticPotential> {
        self.statics
            .get(id.index())
            .ok_or(PotentialError::PotentialNotFound(id))
    }

    /// All registered static fields in id order (safe field included).
    pub fn statics(&self) -> impl Iterator<Item = &StaticPotential> {
        self.statics.iter()
    }

    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    #[inline]
    pub fn safe_potential(&self) -> Option<PotentialId> {
        self.safe
    }

    #[inline]
    pub fn dynamic(&self) -> &DynamicPotential {
        &self.dynamic
    }

    #[inline]
    pub fn dynamic_mut(&mut self) -> &mut DynamicPotential {
        &mut self.dynamic
    }

    // ── Assignment ────────────────────────────────────────────────────────

    /// The reachable exit field with the minimum value at `cell`, ties broken
    /// by registration order.  `None` means no exit is reachable from `cell`
    /// — the caller maps that to an exit-unreachable death.
    pub fn min_potential_for(&self, cell: CellId) -> Option<(PotentialId, f64)> {
        let mut best: Option<(PotentialId, f64)> = None;
        for field in &self.statics {
            if Some(field.id()) == self.safe {
                continue;
            }
            let Some(value) = field.potential(cell) else {
                continue;
            };
            // Strict comparison keeps the earliest-registered field on ties.
            if best.is_none_or(|(_, b)| value < b) {
                best = Some((field.id(), value));
            }
        }
        best
    }
}
