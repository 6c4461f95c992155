//! `egress-sim` — the step scheduler and run state machine of the
//! `rust_egress` evacuation framework.
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`sim`]      | `EvacuationSimulation`, `SimulationResult`             |
//! | [`builder`]  | `SimulationBuilder` — fluent assembly                  |
//! | [`config`]   | `SimulationConfig` — run knobs                         |
//! | [`order`]    | `IterationOrder` — per-step processing order           |
//! | [`observer`] | `SimulationObserver`, `StepReport`, `NoopObserver`     |
//! | [`error`]    | `SimulationError`, `SimResult`                         |
//!
//! The runtime behind the scenes owns all run state and implements the
//! `EvacuationState` seam rules mutate through; occupancy conflicts resolve
//! inside its move and swap operations, so rules can never produce a
//! double-occupied cell.
//!
//! # A minimal run
//!
//! ```rust,ignore
//! let mut sim = SimulationBuilder::new(building)
//!     .potentials(potentials)
//!     .build()?;
//! sim.add_individual(&IndividualBuilder::new(), start_cell)?;
//! sim.start_recording()?;
//! let result = sim.run(&mut NoopObserver)?;
//! println!("evacuated {} in {} steps", result.evacuated, result.steps);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod order;
pub mod sim;

mod runtime;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimulationBuilder;
pub use config::SimulationConfig;
pub use error::{SimResult, SimulationError};
pub use observer::{NoopObserver, SimulationObserver, StepReport};
pub use order::IterationOrder;
pub use sim::{EvacuationSimulation, SimulationResult};
