//! Loop rule: queue safe individuals on exit cells for removal.

use egress_core::CellId;
use egress_grid::CellKind;

use crate::basic::occupant_of;
use crate::rule::EvacuationRule;
use crate::state::EvacuationState;
use crate::RuleResult;

/// Marks safe occupants of exit cells for the end-of-step evacuation batch.
///
/// Removal itself happens once per step for all marked individuals, so the
/// order in which they were marked does not let anyone "jump the queue"
/// within a step.
pub struct EvacuateRule;

impl EvacuationRule for EvacuateRule {
    fn name(&self) -> &'static str {
        "evacuate"
    }

    fn applicable(&self, cell: CellId, state: &dyn EvacuationState) -> bool {
        let on_exit = state
            .building()
            .cell(cell)
            .is_ok_and(|c| c.kind() == CellKind::Exit);
        on_exit
            && occupant_of(cell, state)
                .is_some_and(|id| state.population().get(id).is_ok_and(|i| i.is_safe()))
    }

    fn apply(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()> {
        let Some(id) = occupant_of(cell, state) else {
            return Ok(());
        };
        state.mark_for_removal(id)
    }
}
