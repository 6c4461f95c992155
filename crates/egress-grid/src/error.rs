//! Grid-subsystem error type.

use thiserror::Error;

use egress_core::{CellId, FloorId, RoomId};

/// Errors produced by `egress-grid`.
///
/// Every mutating operation validates all preconditions before touching any
/// state, so a returned error always leaves the building unchanged.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("floor {0} not found")]
    FloorNotFound(FloorId),

    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("cell {0} not found")]
    CellNotFound(CellId),

    #[error("room dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: u32, height: u32 },

    #[error("coordinates ({x}, {y}) outside the {width}x{height} matrix of room {room}")]
    OutOfBounds { room: RoomId, x: u32, y: u32, width: u32, height: u32 },

    #[error("room {room} already has a cell at ({x}, {y})")]
    CellExists { room: RoomId, x: u32, y: u32 },

    #[error("speed factor must be within [0, 1], got {0}")]
    BadSpeedFactor(f64),

    #[error("cell {0} is not a door cell")]
    NotADoor(CellId),

    #[error("cell {0} is already occupied")]
    CellOccupied(CellId),

    #[error("cell {0} is not occupied")]
    CellEmpty(CellId),

    #[error("swap requires two distinct cells, got {0} twice")]
    SwapSameCell(CellId),

    #[error("room {0} still has occupants")]
    RoomOccupied(RoomId),
}

pub type GridResult<T> = Result<T, GridError>;
