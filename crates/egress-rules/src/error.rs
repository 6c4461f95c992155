//! Rule-subsystem error types.

use thiserror::Error;

use egress_agent::AgentError;
use egress_grid::GridError;
use egress_potential::PotentialError;

/// Errors surfaced by rule application.
///
/// Rules mostly forward errors from the state accessor; a returned error
/// aborts the run (domain conditions like unreachable exits are *not*
/// errors — they become deaths).
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Potential(#[from] PotentialError),

    /// The action recorder rejected a mutation notification.  Kept as a
    /// message so this crate stays independent of the recorder.
    #[error("recording failed: {0}")]
    Recording(String),
}

pub type RuleResult<T> = Result<T, RuleError>;

/// Errors raised while assembling a [`RuleSet`](crate::RuleSet).
#[derive(Debug, Error)]
pub enum RuleSetError {
    /// A rule set may hold at most one movement rule.
    #[error("rule set already contains movement rule {existing:?}, rejected {rejected:?}")]
    SecondMovementRule { existing: &'static str, rejected: &'static str },
}
