//! Potential-subsystem error type.

use thiserror::Error;

use egress_core::PotentialId;
use egress_grid::GridError;

/// Errors produced by `egress-potential`.
#[derive(Debug, Error)]
pub enum PotentialError {
    #[error("potential {0} not found")]
    PotentialNotFound(PotentialId),

    #[error("potential values must be non-negative and finite, got {0}")]
    BadValue(f64),

    #[error("exit cluster is empty")]
    EmptyCluster,

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type PotentialResult<T> = Result<T, PotentialError>;
