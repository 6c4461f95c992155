//! `egress-potential` — distance and density fields for the `rust_egress`
//! evacuation framework.
//!
//! # What lives here
//!
//! | Module           | Contents                                           |
//! |------------------|----------------------------------------------------|
//! | [`potential`]    | the `Potential` trait                              |
//! | [`static_field`] | `StaticPotential` — immutable per-exit fields      |
//! | [`builder`]      | `compute_exit_potential` — multi-source Dijkstra   |
//! | [`dynamic`]      | `DynamicPotential` — per-step crowd density        |
//! | [`set`]          | `PotentialSet` — registry and minimum assignment   |
//! | [`error`]        | `PotentialError`, `PotentialResult`                |

pub mod builder;
pub mod dynamic;
pub mod error;
pub mod potential;
pub mod set;
pub mod static_field;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::compute_exit_potential;
pub use dynamic::{DynamicPotential, DYNAMIC_CEILING};
pub use error::{PotentialError, PotentialResult};
pub use potential::Potential;
pub use set::PotentialSet;
pub use static_field::StaticPotential;
