//! `egress-agent` — individuals and population bookkeeping for the
//! `rust_egress` evacuation framework.
//!
//! # What lives here
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`individual`] | `Individual`, `IndividualStatus`, `DeathCause`, `IndividualBuilder` |
//! | [`population`] | `Population` — arena, index lists, batch removal      |
//! | [`error`]      | `AgentError`, `AgentResult`                           |
//!
//! Status changes go through the monotone lattice enforced by
//! [`Individual::promote`]; occupancy stays in the grid crate — an
//! individual's `cell()` is a back-reference only.

pub mod error;
pub mod individual;
pub mod population;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AgentError, AgentResult};
pub use individual::{DeathCause, Individual, IndividualBuilder, IndividualStatus};
pub use population::Population;
