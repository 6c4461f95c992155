//! The rule contract.

use egress_core::CellId;

use crate::state::EvacuationState;
use crate::RuleResult;

/// One unit of per-cell evacuation behavior.
///
/// Rules are applied to the cell an individual currently stands on; a rule
/// may move that individual, so later rules in the same step re-read the
/// position.  Rules must not block and may mutate the simulation only
/// through the [`EvacuationState`] seam.
pub trait EvacuationRule: Send + Sync {
    /// Short name for diagnostics and duplicate-movement-rule errors.
    fn name(&self) -> &'static str;

    /// `true` if the rule wants to run on `cell` in the current state.
    fn applicable(&self, cell: CellId, state: &dyn EvacuationState) -> bool;

    /// Apply the rule to `cell`.  Only called when [`applicable`] held.
    ///
    /// [`applicable`]: EvacuationRule::applicable
    fn apply(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()>;

    /// `true` for the one rule in a set responsible for relocating
    /// individuals.
    fn is_movement_rule(&self) -> bool {
        false
    }

    /// Run the rule if it is applicable.
    fn execute(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()> {
        if self.applicable(cell, state) {
            self.apply(cell, state)?;
        }
        Ok(())
    }
}
