//! Loop rule: mark individuals on safe-area cells as safe.

use egress_core::CellId;
use egress_grid::CellKind;

use crate::basic::occupant_of;
use crate::rule::EvacuationRule;
use crate::state::EvacuationState;
use crate::RuleResult;

/// Marks the occupant of an exit or safe-area cell as safe.
///
/// On `Safe` cells (protected areas that are not exits) the individual is
/// additionally reassigned to the safe potential, if one is registered, so
/// it keeps walking deeper into the protected zone instead of blocking the
/// entrance.  Must run before [`EvacuateRule`](crate::basic::EvacuateRule).
pub struct SaveRule;

impl EvacuationRule for SaveRule {
    fn name(&self) -> &'static str {
        "save"
    }

    fn applicable(&self, cell: CellId, state: &dyn EvacuationState) -> bool {
        let on_safe_area = state
            .building()
            .cell(cell)
            .is_ok_and(|c| c.kind().is_safe_area());
        on_safe_area
            && occupant_of(cell, state)
                .is_some_and(|id| state.population().get(id).is_ok_and(|i| !i.is_safe()))
    }

    fn apply(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()> {
        let Some(id) = occupant_of(cell, state) else {
            return Ok(());
        };
        state.set_safe(id)?;
        if state.building().cell(cell)?.kind() == CellKind::Safe {
            if let Some(safe) = state.potentials().safe_potential() {
                state.assign_potential(id, safe)?;
            }
        }
        Ok(())
    }
}
