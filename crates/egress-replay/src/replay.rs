//! Applying recorded actions to a rebuilt configuration.
//!
//! A host replays by cloning [`Recording::initial`] and feeding the log
//! through [`apply`] in time order; the rebuilt grid and population then
//! mirror the live run step by step.
//!
//! [`Recording::initial`]: crate::Recording::initial

use egress_agent::Population;
use egress_core::Step;
use egress_grid::Building;

use crate::action::Action;
use crate::ReplayResult;

/// Re-enact one recorded action on a rebuilt configuration.
///
/// Ids in `action` are clone ids, so the targets must come from (a clone of)
/// the recording's initial configuration.  `StateChanged` carries no
/// structural effect and is accepted as a no-op.
pub fn apply(
    building:   &mut Building,
    population: &mut Population,
    action:     &Action,
) -> ReplayResult<()> {
    match *action {
        Action::Move { from, to, individual } => {
            building.relocate(from, to)?;
            population.get_mut(individual)?.set_cell(to);
        }
        Action::Swap { cell1, cell2 } => {
            let (i1, i2) = building.swap_occupants(cell1, cell2)?;
            population.get_mut(i1)?.set_cell(cell2);
            population.get_mut(i2)?.set_cell(cell1);
        }
        Action::Exit { cell, individual } => {
            // The replayed population never saw the save rule run; promote
            // to Safe first so the lattice stays intact.
            if !population.get(individual)?.is_safe() {
                population.set_safe(individual, Step::ZERO)?;
            }
            population.mark_for_removal(individual)?;
            population.remove_marked()?;
            building.clear_occupant(cell)?;
        }
        Action::Die { cell, individual, cause } => {
            population.set_dead(individual, cause)?;
            building.clear_occupant(cell)?;
        }
        Action::StateChanged(_) => {}
    }
    Ok(())
}
