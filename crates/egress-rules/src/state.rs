//! The simulation-state accessor injected into every rule.

use egress_agent::{DeathCause, Population};
use egress_core::{CellId, IndividualId, ParameterSet, PotentialId, RoomId, SimRng, Step, StepTiming};
use egress_grid::Building;
use egress_potential::PotentialSet;

use crate::RuleResult;

/// Everything a rule may read or change, behind one seam.
///
/// The engine runtime implements this trait; rules receive it as
/// `&mut dyn EvacuationState` and never touch the grid or population
/// directly.  Occupancy changes **only** through [`move_individual`] and
/// [`swap_individuals`] — those two are the conflict resolver, they validate
/// atomically, keep back-references consistent, and notify the recorder.
/// Status changes go through the mark methods for the same reason.
///
/// [`move_individual`]: EvacuationState::move_individual
/// [`swap_individuals`]: EvacuationState::swap_individuals
pub trait EvacuationState {
    // ── Time ──────────────────────────────────────────────────────────────

    /// The step currently being executed.
    fn current_step(&self) -> Step;

    /// Fractional step at which the last scheduled crossing ends; the run
    /// cannot finish before it.
    fn needed_time(&self) -> f64;

    /// Raise the needed time (lowering is ignored).
    fn set_needed_time(&mut self, steps: f64);

    fn timing(&self) -> StepTiming;

    /// The active parameter set.
    fn parameters(&self) -> &ParameterSet;

    // ── Read views ────────────────────────────────────────────────────────

    fn building(&self) -> &Building;

    fn population(&self) -> &Population;

    fn potentials(&self) -> &PotentialSet;

    /// The run's random source.  Sequential rule execution keeps draws
    /// reproducible for a fixed seed.
    fn rng(&mut self) -> &mut SimRng;

    // ── Sanctioned mutations ──────────────────────────────────────────────

    /// Relocate the occupant of `from` onto the empty cell `to`;
    /// `from == to` is a recorded stay-put move.
    fn move_individual(&mut self, from: CellId, to: CellId) -> RuleResult<()>;

    /// Exchange the occupants of two distinct occupied cells.
    fn swap_individuals(&mut self, c1: CellId, c2: CellId) -> RuleResult<()>;

    /// Mark an individual safe (reached an exit or safe area).
    fn set_safe(&mut self, individual: IndividualId) -> RuleResult<()>;

    /// Kill an individual and clear its cell.
    fn set_dead(&mut self, individual: IndividualId, cause: DeathCause) -> RuleResult<()>;

    /// Queue a safe individual for the end-of-step evacuation batch.
    fn mark_for_removal(&mut self, individual: IndividualId) -> RuleResult<()>;

    /// Set the static potential guiding an individual.
    fn assign_potential(&mut self, individual: IndividualId, potential: PotentialId)
        -> RuleResult<()>;

    /// Alarm one individual.
    fn set_alarmed(&mut self, individual: IndividualId) -> RuleResult<()>;

    /// Set or clear a room-wide alarm.
    fn set_room_alarmed(&mut self, room: RoomId, alarmed: bool) -> RuleResult<()>;

    /// Lock a cell (counts as occupied for targeting) until `until_secs`.
    fn lock_cell(&mut self, cell: CellId, until_secs: f64) -> RuleResult<()>;

    /// Set an individual's crossing window in fractional steps.
    fn set_crossing_window(
        &mut self,
        individual: IndividualId,
        start:      f64,
        end:        f64,
    ) -> RuleResult<()>;

    fn increase_dynamic_potential(&mut self, cell: CellId);

    fn decrease_dynamic_potential(&mut self, cell: CellId);
}
