//! The movement rule: walk downhill along the assigned potential.

use egress_core::CellId;
use egress_potential::Potential;

use crate::basic::occupant_of;
use crate::rule::EvacuationRule;
use crate::state::EvacuationState;
use crate::RuleResult;

/// Relocates one individual per step.
///
/// Alarmed individuals walk their assigned potential toward an exit.  Saved
/// individuals stay eligible as long as they carry the safe potential, so
/// they keep walking deeper into the protected area instead of parking on
/// its entrance.
///
/// Target selection among the free, unlocked neighbors of the current cell:
/// only cells with a strictly smaller static potential qualify (downhill
/// guarantee), ranked by static potential plus the weighted dynamic
/// potential as a congestion penalty.  When nothing qualifies the individual
/// stays put via a recorded `move(c, c)`, so replay sees the decision.
///
/// A successful move opens a crossing window sized by walking speed, target
/// speed factor, and diagonal distance; the vacated cell stays locked until
/// the window closes, and its dynamic potential is bumped.
pub struct MovementRule;

impl EvacuationRule for MovementRule {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn applicable(&self, cell: CellId, state: &dyn EvacuationState) -> bool {
        occupant_of(cell, state).is_some_and(|id| {
            state.population().get(id).is_ok_and(|i| {
                i.is_alarmed()
                    || (i.is_safe()
                        && i.potential().is_some()
                        && i.potential() == state.potentials().safe_potential())
            })
        })
    }

    fn apply(&self, cell: CellId, state: &mut dyn EvacuationState) -> RuleResult<()> {
        let Some(id) = occupant_of(cell, state) else {
            return Ok(());
        };
        let individual = state.population().get(id)?;
        let now = state.current_step().as_f64();
        if individual.is_crossing(now) {
            return Ok(());
        }
        // No potential means the initial rule already handled this
        // individual; nothing sensible to walk toward.
        let Some(potential_id) = individual.potential() else {
            return Ok(());
        };
        let relative_speed = individual.relative_speed();

        let field = state.potentials().get(potential_id)?;
        let here = field.potential(cell);
        let weight = state.parameters().dynamic_potential_weight;
        let now_secs = state.timing().step_to_seconds(state.current_step());

        // Best strictly-downhill target among free, unlocked neighbors.
        let mut best: Option<(CellId, f64)> = None;
        for candidate in state.building().free_neighbors(cell)? {
            if state.building().is_occupied_at(candidate, now_secs)? {
                continue;
            }
            let Some(static_value) = field.potential(candidate) else {
                continue;
            };
            if here.is_some_and(|h| static_value >= h) {
                continue;
            }
            let score =
                static_value + weight * state.potentials().dynamic().value(candidate) as f64;
            // Strict comparison keeps the earliest candidate on ties; the
            // neighbor order is deterministic, so seeded runs reproduce.
            if best.is_none_or(|(_, b)| score < b) {
                best = Some((candidate, score));
            }
        }

        let Some((target, _)) = best else {
            // Recorded stay-put move: replay sees that the individual was
            // asked and could not improve.
            return state.move_individual(cell, cell);
        };

        let speed_factor = state.building().cell(target)?.speed_factor();
        let distance = state
            .building()
            .relative_direction(cell, target)?
            .map_or(1.0, |d| d.distance_factor());
        // Crossing one cell at full speed on unit floor takes exactly one step.
        let crossing_steps = distance / (relative_speed * speed_factor);

        state.move_individual(cell, target)?;
        let end = now + crossing_steps;
        state.set_crossing_window(id, now, end)?;
        state.lock_cell(cell, end * state.timing().seconds_per_step())?;
        if end > state.needed_time() {
            state.set_needed_time(end);
        }
        state.increase_dynamic_potential(cell);
        Ok(())
    }

    fn is_movement_rule(&self) -> bool {
        true
    }
}
