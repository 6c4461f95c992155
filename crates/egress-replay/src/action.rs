//! Recorded actions: everything a replay needs to re-enact one run.

use std::fmt;

use egress_agent::DeathCause;
use egress_core::{AutomatonState, CellId, IndividualId};

/// One observable mutation of the simulation.
///
/// Cell and individual ids in a stored action reference the recording's
/// *clone*, never the live run — the recorder translates them on the way in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// An individual relocated; `from == to` is a recorded stay-put.
    Move {
        from:       CellId,
        to:         CellId,
        individual: IndividualId,
    },
    /// Two individuals exchanged cells.
    Swap { cell1: CellId, cell2: CellId },
    /// An individual left the building from `cell`.
    Exit {
        cell:       CellId,
        individual: IndividualId,
    },
    /// An individual died on `cell`.
    Die {
        cell:       CellId,
        individual: IndividualId,
        cause:      DeathCause,
    },
    /// The automaton changed lifecycle state.
    StateChanged(AutomatonState),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to, individual } if from == to => {
                write!(f, "{individual} stays on {from}")
            }
            Action::Move { from, to, individual } => {
                write!(f, "{individual} moves {from} -> {to}")
            }
            Action::Swap { cell1, cell2 } => write!(f, "swap {cell1} <-> {cell2}"),
            Action::Exit { cell, individual } => write!(f, "{individual} exits at {cell}"),
            Action::Die { cell, individual, cause } => {
                write!(f, "{individual} dies at {cell} ({cause})")
            }
            Action::StateChanged(state) => write!(f, "automaton is now {state}"),
        }
    }
}
