//! Replay-subsystem error type.

use thiserror::Error;

use egress_agent::AgentError;
use egress_core::{CellId, PotentialId};
use egress_grid::GridError;

/// Errors produced by `egress-replay`.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("no initial configuration set")]
    NoConfiguration,

    #[error("cell {0} has no counterpart in the recording clone")]
    UnmappedCell(CellId),

    #[error("potential {0} has no counterpart in the recording clone")]
    UnmappedPotential(PotentialId),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub type ReplayResult<T> = Result<T, ReplayError>;
