//! The individual: per-agent simulation state.
//!
//! # Status lattice
//!
//! Transitions are strictly monotone per individual:
//!
//! ```text
//! Unalarmed ──▶ Alarmed ──▶ Safe ──▶ Evacuated
//!      │            │
//!      └────────────┴─────▶ Dead   (terminal)
//! ```
//!
//! `Dead` excludes `Evacuated`; `Safe` individuals can no longer die.  The
//! status field is private and every change goes through
//! [`Individual::promote`], so no caller can skip the lattice.

use std::fmt;

use egress_core::{AssignmentId, CellId, IndividualId, PotentialId, Step};

use crate::{AgentError, AgentResult};

// ── IndividualStatus ──────────────────────────────────────────────────────────

/// Dynamic status of an individual during a run.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndividualStatus {
    /// Has not noticed the alarm yet; does not move.
    #[default]
    Unalarmed,
    /// Evacuating.
    Alarmed,
    /// Reached a safe area; waiting to be flushed out.
    Safe,
    /// Failed to evacuate.  Terminal.
    Dead,
    /// Physically removed from the grid after reaching an exit.
    Evacuated,
}

impl IndividualStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IndividualStatus::Unalarmed => "unalarmed",
            IndividualStatus::Alarmed   => "alarmed",
            IndividualStatus::Safe      => "safe",
            IndividualStatus::Dead      => "dead",
            IndividualStatus::Evacuated => "evacuated",
        }
    }

    /// `true` if the transition `self -> to` is allowed by the lattice.
    fn allows(self, to: IndividualStatus) -> bool {
        use IndividualStatus::*;
        matches!(
            (self, to),
            (Unalarmed, Alarmed)
                | (Unalarmed, Safe)
                | (Unalarmed, Dead)
                | (Alarmed, Safe)
                | (Alarmed, Dead)
                | (Safe, Evacuated)
        )
    }
}

impl fmt::Display for IndividualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DeathCause ────────────────────────────────────────────────────────────────

/// Why an individual died.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathCause {
    /// No static potential is reachable from the starting cell.
    ExitUnreachable,
    /// The run ended before the individual became safe.
    NotEnoughTime,
}

impl DeathCause {
    pub fn as_str(self) -> &'static str {
        match self {
            DeathCause::ExitUnreachable => "exit unreachable",
            DeathCause::NotEnoughTime   => "not enough time",
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Individual ────────────────────────────────────────────────────────────────

/// One simulated person.
///
/// Constructed through [`IndividualBuilder`]; owned by the population arena.
/// `cell` is a back-reference into the grid, maintained by the engine's
/// move/swap operations only.
#[derive(Clone, Debug)]
pub struct Individual {
    id:             IndividualId,
    assignment:     AssignmentId,
    relative_speed: f64,
    reaction_time:  f64,
    cell:           CellId,
    potential:      Option<PotentialId>,
    status:         IndividualStatus,
    death_cause:    Option<DeathCause>,
    safety_time:    Option<Step>,
    /// Fractional step at which the current crossing started.
    step_start:     f64,
    /// Fractional step at which the current crossing ends; the individual
    /// may not move again before it.
    step_end:       f64,
}

impl Individual {
    pub(crate) fn new(
        id:             IndividualId,
        assignment:     AssignmentId,
        relative_speed: f64,
        reaction_time:  f64,
        cell:           CellId,
    ) -> Self {
        Self {
            id,
            assignment,
            relative_speed,
            reaction_time,
            cell,
            potential:   None,
            status:      IndividualStatus::Unalarmed,
            death_cause: None,
            safety_time: None,
            step_start:  0.0,
            step_end:    0.0,
        }
    }

    // ── Identity and attributes ───────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> IndividualId {
        self.id
    }

    #[inline]
    pub fn assignment(&self) -> AssignmentId {
        self.assignment
    }

    /// Walking speed relative to the absolute maximum, in `(0, 1]`.
    #[inline]
    pub fn relative_speed(&self) -> f64 {
        self.relative_speed
    }

    /// Seconds after the alarm before this individual starts moving.
    #[inline]
    pub fn reaction_time(&self) -> f64 {
        self.reaction_time
    }

    // ── Position and potential ────────────────────────────────────────────

    #[inline]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// The static potential currently guiding this individual, if any.
    #[inline]
    pub fn potential(&self) -> Option<PotentialId> {
        self.potential
    }

    pub fn set_cell(&mut self, cell: CellId) {
        self.cell = cell;
    }

    pub fn set_potential(&mut self, potential: Option<PotentialId>) {
        self.potential = potential;
    }

    // ── Status ────────────────────────────────────────────────────────────

    #[inline]
    pub fn status(&self) -> IndividualStatus {
        self.status
    }

    #[inline]
    pub fn is_alarmed(&self) -> bool {
        self.status == IndividualStatus::Alarmed
    }

    #[inline]
    pub fn is_safe(&self) -> bool {
        matches!(self.status, IndividualStatus::Safe | IndividualStatus::Evacuated)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.status == IndividualStatus::Dead
    }

    #[inline]
    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    /// Step at which the individual became safe, if it did.
    #[inline]
    pub fn safety_time(&self) -> Option<Step> {
        self.safety_time
    }

    /// Advance the status along the lattice; anything else is rejected.
    pub fn promote(&mut self, to: IndividualStatus) -> AgentResult<()> {
        if !self.status.allows(to) {
            return Err(AgentError::InvalidTransition { from: self.status, to });
        }
        self.status = to;
        Ok(())
    }

    pub(crate) fn set_death_cause(&mut self, cause: DeathCause) {
        self.death_cause = Some(cause);
    }

    pub(crate) fn set_safety_time(&mut self, step: Step) {
        self.safety_time = Some(step);
    }

    // ── Crossing window ───────────────────────────────────────────────────

    /// Fractional step at which the current crossing started.
    #[inline]
    pub fn step_start(&self) -> f64 {
        self.step_start
    }

    /// Fractional step at which the current crossing ends.
    #[inline]
    pub fn step_end(&self) -> f64 {
        self.step_end
    }

    /// Still in the middle of crossing a cell at fractional step `at`.
    #[inline]
    pub fn is_crossing(&self, at: f64) -> bool {
        at < self.step_end
    }

    pub fn set_crossing_window(&mut self, start: f64, end: f64) {
        self.step_start = start;
        self.step_end = end;
    }
}

// ── IndividualBuilder ─────────────────────────────────────────────────────────

/// Fluent construction of individual attributes.
///
/// Identity and starting cell are supplied by the population at add time, so
/// one builder can stamp out many similar individuals:
///
/// ```rust,ignore
/// let visitor = IndividualBuilder::new()
///     .relative_speed(0.7)
///     .reaction_time(15.0);
/// for cell in start_cells {
///     sim.add_individual(&visitor, cell)?;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct IndividualBuilder {
    assignment:     AssignmentId,
    relative_speed: f64,
    reaction_time:  f64,
}

impl Default for IndividualBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndividualBuilder {
    /// A builder with full speed, zero reaction time, and no assignment tag.
    pub fn new() -> Self {
        Self {
            assignment:     AssignmentId::INVALID,
            relative_speed: 1.0,
            reaction_time:  0.0,
        }
    }

    /// Tag individuals with an assignment type from the population registry.
    pub fn assignment(mut self, assignment: AssignmentId) -> Self {
        self.assignment = assignment;
        self
    }

    /// Walking speed relative to the absolute maximum; must be in `(0, 1]`.
    pub fn relative_speed(mut self, relative_speed: f64) -> Self {
        self.relative_speed = relative_speed;
        self
    }

    /// Seconds after the alarm before the individual reacts; must be ≥ 0.
    pub fn reaction_time(mut self, reaction_time: f64) -> Self {
        self.reaction_time = reaction_time;
        self
    }

    /// Validate the attributes and build an individual on `cell`.
    pub fn build(&self, id: IndividualId, cell: CellId) -> AgentResult<Individual> {
        if !self.relative_speed.is_finite()
            || self.relative_speed <= 0.0
            || self.relative_speed > 1.0
        {
            return Err(AgentError::BadRelativeSpeed(self.relative_speed));
        }
        if !self.reaction_time.is_finite() || self.reaction_time < 0.0 {
            return Err(AgentError::BadReactionTime(self.reaction_time));
        }
        Ok(Individual::new(id, self.assignment, self.relative_speed, self.reaction_time, cell))
    }
}
