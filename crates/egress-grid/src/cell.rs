//! The cell: atomic unit of the evacuation grid.
//!
//! # Identity
//!
//! A cell's identity is its [`CellKey`] — the room it was attached to plus
//! its matrix coordinates there — fixed at attach time and never mutated.
//! Everything else on the cell (occupant, locks, passability) is run state.
//! The recorder keys its live→clone identity maps on `CellKey`, so two
//! structurally equal buildings always agree on what "the same cell" means.

use egress_core::{CellId, Direction8, DirectionSet, IndividualId, Level, RoomId};

// ── CellKind ──────────────────────────────────────────────────────────────────

/// What a cell is, beyond plain walkable floor.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    /// Plain walkable floor.
    #[default]
    Open,
    /// Links to door cells in other rooms; the only way between rooms.
    Door,
    /// An exit.  Individuals standing here become safe and are evacuated.
    Exit,
    /// A safe area that is not an exit (e.g. a protected stair head).
    Safe,
    /// Stair cell.  Slope handling goes through per-direction levels plus
    /// this kind's speed factor.
    Stair,
}

impl CellKind {
    /// `true` for cells on which an individual counts as rescued.
    #[inline]
    pub fn is_safe_area(self) -> bool {
        matches!(self, CellKind::Exit | CellKind::Safe)
    }

    /// Speed factor applied when no explicit factor is given at attach time.
    pub fn default_speed_factor(self) -> f64 {
        match self {
            CellKind::Open  => 1.0,
            CellKind::Door  => 1.0,
            CellKind::Exit  => 0.8,
            CellKind::Safe  => 0.8,
            CellKind::Stair => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Open  => "open",
            CellKind::Door  => "door",
            CellKind::Exit  => "exit",
            CellKind::Safe  => "safe",
            CellKind::Stair => "stair",
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CellKey ───────────────────────────────────────────────────────────────────

/// Immutable identity of a cell: owning room and matrix coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellKey {
    pub room: RoomId,
    pub x:    u32,
    pub y:    u32,
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.room.0, self.x, self.y)
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One square cell (0.4 m edge) in a room matrix.
///
/// Constructed only through `Building::set_cell*`; mutable run state is
/// reachable only through the building's sanctioned operations.
#[derive(Clone, Debug)]
pub struct Cell {
    key:            CellKey,
    kind:           CellKind,
    speed_factor:   f64,
    /// Directions that may NOT be stepped from this cell.
    blocked:        DirectionSet,
    /// Relative elevation of the neighbor in each direction.
    levels:         [Level; 8],
    occupant:       Option<IndividualId>,
    /// Crossing lock: the cell counts as occupied until this time (seconds)
    /// even after its occupant left.
    occupied_until: f64,
    /// Door cells in other rooms reachable from this cell.  Non-empty only
    /// for `CellKind::Door`.
    door_targets:   Vec<CellId>,
}

impl Cell {
    pub(crate) fn new(key: CellKey, kind: CellKind, speed_factor: f64) -> Self {
        Self {
            key,
            kind,
            speed_factor,
            blocked:        DirectionSet::EMPTY,
            levels:         [Level::Equal; 8],
            occupant:       None,
            occupied_until: 0.0,
            door_targets:   Vec::new(),
        }
    }

    // ── Identity ──────────────────────────────────────────────────────────

    #[inline]
    pub fn key(&self) -> CellKey {
        self.key
    }

    #[inline]
    pub fn room(&self) -> RoomId {
        self.key.room
    }

    #[inline]
    pub fn x(&self) -> u32 {
        self.key.x
    }

    #[inline]
    pub fn y(&self) -> u32 {
        self.key.y
    }

    // ── Static attributes ─────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Speed factor in `[0, 1]`.  0 makes the cell unreachable for the
    /// potential builder.
    #[inline]
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// `true` if stepping out of this cell in `dir` is allowed.
    #[inline]
    pub fn is_passable(&self, dir: Direction8) -> bool {
        !self.blocked.contains(dir)
    }

    #[inline]
    pub fn level(&self, dir: Direction8) -> Level {
        self.levels[dir.index()]
    }

    #[inline]
    pub fn door_targets(&self) -> &[CellId] {
        &self.door_targets
    }

    // ── Run state ─────────────────────────────────────────────────────────

    #[inline]
    pub fn occupant(&self) -> Option<IndividualId> {
        self.occupant
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Occupied, or transiently locked at `time_secs`, by a crossing that
    /// has not finished yet.
    #[inline]
    pub fn is_occupied_at(&self, time_secs: f64) -> bool {
        self.occupant.is_some() || time_secs < self.occupied_until
    }

    #[inline]
    pub fn occupied_until(&self) -> f64 {
        self.occupied_until
    }

    // ── Crate-internal mutation (Building only) ───────────────────────────

    pub(crate) fn set_blocked(&mut self, dir: Direction8, blocked: bool) {
        if blocked {
            self.blocked.insert(dir);
        } else {
            self.blocked.remove(dir);
        }
    }

    pub(crate) fn set_level_one_side(&mut self, dir: Direction8, level: Level) {
        self.levels[dir.index()] = level;
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<IndividualId>) {
        self.occupant = occupant;
    }

    pub(crate) fn set_occupied_until(&mut self, time_secs: f64) {
        self.occupied_until = time_secs;
    }

    pub(crate) fn add_door_target(&mut self, target: CellId) {
        if !self.door_targets.contains(&target) {
            self.door_targets.push(target);
        }
    }
}
