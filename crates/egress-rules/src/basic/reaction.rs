//! Loop rule: alarm individuals once they notice the evacuation.

use egress_agent::IndividualStatus;
use egress_core::CellId;

use crate::basic::occupant_of;
use crate::rule::EvacuationRule;
use crate::state::EvacuationState;
use crate::RuleResult;

/// Alarms an unalarmed individual when either
///
/// - its room is already alarmed (someone else reacted there), or
/// - its personal reaction time has elapsed since the run started; this
///   also alarms the whole room, so everyone else there reacts next step.
pub struct ReactionRule;

impl EvacuationRule for ReactionRule {
    fn name(&self) -> &'static str {
        "reaction"
    }

    fn applicable(&self, cell: CellId, state: &dyn EvacuationState) -> bool {
        occupant_of(cell, state).is_some_and(|id| {
            state
                .population()
                .get(id)
                .is_ok_and(|i| i.status() == IndividualStatus::Unalarmed)
        })
    }

    fn apply(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()> {
        let Some(id) = occupant_of(cell, state) else {
            return Ok(());
        };
        let room = state.building().cell(cell)?.room();
        if state.building().room(room)?.is_alarmed() {
            return state.set_alarmed(id);
        }

        let elapsed_secs = state.timing().step_to_seconds(state.current_step());
        let reaction_time = state.population().get(id)?.reaction_time();
        if elapsed_secs >= reaction_time {
            state.set_alarmed(id)?;
            state.set_room_alarmed(room, true)?;
        }
        Ok(())
    }
}
