//! Engine error type.

use thiserror::Error;

use egress_agent::AgentError;
use egress_core::{AutomatonState, CoreError};
use egress_grid::GridError;
use egress_potential::PotentialError;
use egress_replay::ReplayError;
use egress_rules::{RuleError, RuleSetError};

/// Errors produced by the evacuation engine.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// An operation was called in the wrong lifecycle state (e.g. adding an
    /// individual after `start`, stepping before `initialize`).
    #[error("automaton is {actual}, operation requires {required}")]
    IllegalState {
        required: AutomatonState,
        actual:   AutomatonState,
    },

    #[error("step limit must be positive")]
    ZeroStepLimit,

    #[error("simulation builder is missing {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Potential(#[from] PotentialError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

pub type SimResult<T> = Result<T, SimulationError>;
