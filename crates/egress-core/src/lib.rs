//! `egress-core` — foundational types for the `rust_egress` evacuation
//! cellular-automaton framework.
//!
//! This crate is a dependency of every other `egress-*` crate.  It
//! intentionally has no `egress-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `CellId`, `RoomId`, `IndividualId`, `PotentialId`, …    |
//! | [`direction`] | `Direction8`, `Level`, `DirectionSet`                   |
//! | [`step`]      | `Step`, `StepTiming`, `CELL_SIZE_M`                     |
//! | [`params`]    | `ParameterSet`                                          |
//! | [`rng`]       | `SimRng` (seeded, deterministic)                        |
//! | [`state`]     | `AutomatonState` (Ready / Running / Finished)           |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod direction;
pub mod error;
pub mod ids;
pub mod params;
pub mod rng;
pub mod state;
pub mod step;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use direction::{Direction8, DirectionSet, Level};
pub use error::{CoreError, CoreResult};
pub use ids::{AssignmentId, CellId, FloorId, IndividualId, PotentialId, RoomId};
pub use params::ParameterSet;
pub use rng::SimRng;
pub use state::AutomatonState;
pub use step::{CELL_SIZE_M, Step, StepTiming};
