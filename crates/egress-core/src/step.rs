//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Step` counter.  The mapping to real
//! seconds is held in `StepTiming` and derives entirely from the automaton's
//! absolute maximum walking speed: one step is the time the fastest possible
//! individual needs to cross one cell edge,
//!
//!   seconds_per_step = CELL_SIZE_M / absolute_max_speed
//!
//! Using an integer step as the canonical time unit keeps the scheduler exact;
//! fractional step values appear only in per-individual crossing windows
//! (an individual may need 1.7 steps to cross a diagonal at reduced speed).

use std::fmt;

use crate::{CoreError, CoreResult};

/// Edge length of one grid cell in metres.
pub const CELL_SIZE_M: f64 = 0.4;

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
///
/// Stored as `u64`: even at millisecond-scale steps an evacuation run never
/// gets close to overflow.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }

    /// The counter as a fractional step value, for comparisons against
    /// per-individual crossing windows.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── StepTiming ────────────────────────────────────────────────────────────────

/// Converts between step counts and real seconds.
///
/// Cheap to copy; holds no heap data.  Constructed once per run from the
/// parameter set's absolute maximum speed.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepTiming {
    absolute_max_speed: f64,
}

impl StepTiming {
    /// Create a timing table for the given absolute maximum speed in m/s.
    ///
    /// Fails on non-positive or non-finite speed.
    pub fn new(absolute_max_speed: f64) -> CoreResult<Self> {
        if !absolute_max_speed.is_finite() || absolute_max_speed <= 0.0 {
            return Err(CoreError::NonPositiveSpeed(absolute_max_speed));
        }
        Ok(Self { absolute_max_speed })
    }

    /// The calibrated maximum walking speed in m/s.
    #[inline]
    pub fn absolute_max_speed(&self) -> f64 {
        self.absolute_max_speed
    }

    /// Real seconds represented by one step.
    #[inline]
    pub fn seconds_per_step(&self) -> f64 {
        CELL_SIZE_M / self.absolute_max_speed
    }

    /// Steps elapsing per real second.
    #[inline]
    pub fn steps_per_second(&self) -> f64 {
        self.absolute_max_speed / CELL_SIZE_M
    }

    /// Real seconds elapsed at `step`.
    #[inline]
    pub fn step_to_seconds(&self, step: Step) -> f64 {
        step.0 as f64 * self.seconds_per_step()
    }

    /// Fractional step count spanning `secs` seconds.
    #[inline]
    pub fn seconds_to_steps(&self, secs: f64) -> f64 {
        secs * self.steps_per_second()
    }

    /// Walking speed in m/s for an individual with the given relative speed
    /// in `(0, 1]`.
    #[inline]
    pub fn absolute_speed(&self, relative_speed: f64) -> f64 {
        self.absolute_max_speed * relative_speed
    }
}

impl fmt::Display for StepTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} s/step ({} m/s max)", self.seconds_per_step(), self.absolute_max_speed)
    }
}
