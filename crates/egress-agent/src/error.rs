//! Agent-subsystem error type.

use thiserror::Error;

use egress_core::IndividualId;

use crate::individual::IndividualStatus;

/// Errors produced by `egress-agent`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("individual {0} not found")]
    IndividualNotFound(IndividualId),

    #[error("individual {0} already exists")]
    DuplicateIndividual(IndividualId),

    #[error("individual {0} would leave a gap in the arena")]
    NonContiguousId(IndividualId),

    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition { from: IndividualStatus, to: IndividualStatus },

    #[error("relative speed must be within (0, 1], got {0}")]
    BadRelativeSpeed(f64),

    #[error("reaction time must be non-negative and finite, got {0}")]
    BadReactionTime(f64),
}

pub type AgentResult<T> = Result<T, AgentError>;
