//! Primary rule: assign each individual its starting potential.

use egress_agent::DeathCause;
use egress_core::CellId;

use crate::basic::occupant_of;
use crate::rule::EvacuationRule;
use crate::state::EvacuationState;
use crate::RuleResult;

/// Assigns the reachable exit potential with the minimum value at the
/// individual's starting cell.  When no exit is reachable the individual
/// dies with cause "exit unreachable" — a normal simulation outcome, not an
/// engine error.
pub struct InitialPotentialRule;

impl EvacuationRule for InitialPotentialRule {
    fn name(&self) -> &'static str {
        "initial-potential"
    }

    fn applicable(&self, cell: CellId, state: &dyn EvacuationState) -> bool {
        occupant_of(cell, state).is_some_and(|id| {
            state
                .population()
                .get(id)
                .is_ok_and(|i| i.potential().is_none())
        })
    }

    fn apply(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()> {
        let Some(id) = occupant_of(cell, state) else {
            return Ok(());
        };
        match state.potentials().min_potential_for(cell) {
            Some((potential, _)) => state.assign_potential(id, potential),
            None => state.set_dead(id, DeathCause::ExitUnreachable),
        }
    }
}
