//! The built-in evacuation rules.
//!
//! A closed set covering the standard behavior chain: assign a potential,
//! react to the alarm, walk downhill, become safe, leave the building.
//! Shared predicates are free functions here rather than inherited helpers;
//! rules stay stateless values.

mod evacuate;
mod initial_potential;
mod movement;
mod reaction;
mod save;

pub use evacuate::EvacuateRule;
pub use initial_potential::InitialPotentialRule;
pub use movement::MovementRule;
pub use reaction::ReactionRule;
pub use save::SaveRule;

use egress_core::{CellId, IndividualId};

use crate::state::EvacuationState;

/// The individual standing on `cell`, if the cell exists and is occupied.
pub(crate) fn occupant_of(cell: CellId, state: &dyn EvacuationState) -> Option<IndividualId> {
    state.building().cell(cell).ok().and_then(|c| c.occupant())
}
