//! `egress-grid` — the grid model of the `rust_egress` evacuation framework.
//!
//! Cells grouped into rooms grouped onto floors, all owned by one
//! [`Building`] arena.  The crate owns the occupancy protocol (place, clear,
//! relocate, swap — nothing else may change who stands where), symmetric
//! per-direction passability and elevation, neighbor queries with the
//! diagonal corner-cutting exclusion, exit clustering, and a debug ASCII
//! renderer.
//!
//! # What lives here
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | [`cell`]     | `Cell`, `CellKey`, `CellKind`                        |
//! | [`room`]     | `Room` — matrix with holes, doors, occupant list     |
//! | [`building`] | `Building` — arenas plus every sanctioned operation  |
//! | [`cluster`]  | `ExitCluster`, `exit_clusters`                       |
//! | [`fmt`]      | `render_room` ASCII debug output                     |
//! | [`error`]    | `GridError`, `GridResult`                            |

pub mod building;
pub mod cell;
pub mod cluster;
pub mod error;
pub mod fmt;
pub mod room;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use building::Building;
pub use cell::{Cell, CellKey, CellKind};
pub use cluster::{exit_clusters, ExitCluster};
pub use error::{GridError, GridResult};
pub use fmt::render_room;
pub use room::Room;
