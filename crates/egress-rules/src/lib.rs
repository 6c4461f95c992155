//! `egress-rules` — the rule engine contract of the `rust_egress`
//! evacuation framework.
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`state`]   | `EvacuationState` — the injected state accessor         |
//! | [`rule`]    | `EvacuationRule` — the rule capability                  |
//! | [`ruleset`] | `RuleSet` — phased, ordered, single-movement-rule       |
//! | [`basic`]   | the built-in closed rule set                            |
//! | [`error`]   | `RuleError`, `RuleResult`, `RuleSetError`               |
//!
//! The engine crate implements [`EvacuationState`]; everything here is pure
//! contract plus the built-in behaviors.

pub mod basic;
pub mod error;
pub mod rule;
pub mod ruleset;
pub mod state;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{RuleError, RuleResult, RuleSetError};
pub use rule::EvacuationRule;
pub use ruleset::RuleSet;
pub use state::EvacuationState;
