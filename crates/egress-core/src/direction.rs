//! Eight-connected lattice directions and per-direction elevation levels.
//!
//! # Coordinate convention
//!
//! Cell coordinates grow right (`x`) and **down** (`y`), matching the room
//! matrix layout: `Top` is `(0, -1)`, `BottomRight` is `(1, 1)`.  All
//! direction arithmetic in the grid crate goes through [`Direction8`] so the
//! convention lives in exactly one place.

use std::fmt;

// ── Direction8 ────────────────────────────────────────────────────────────────

/// One of the eight lattice neighbors of a square cell.
///
/// The discriminant doubles as an index into per-direction arrays
/// (`[T; 8]`), in the order listed here.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction8 {
    Top         = 0,
    TopRight    = 1,
    Right       = 2,
    BottomRight = 3,
    Bottom      = 4,
    BottomLeft  = 5,
    Left        = 6,
    TopLeft     = 7,
}

impl Direction8 {
    /// All eight directions in discriminant order.
    pub const ALL: [Direction8; 8] = [
        Direction8::Top,
        Direction8::TopRight,
        Direction8::Right,
        Direction8::BottomRight,
        Direction8::Bottom,
        Direction8::BottomLeft,
        Direction8::Left,
        Direction8::TopLeft,
    ];

    /// `(dx, dy)` offset of the neighbor in this direction.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction8::Top         => (0, -1),
            Direction8::TopRight    => (1, -1),
            Direction8::Right       => (1, 0),
            Direction8::BottomRight => (1, 1),
            Direction8::Bottom      => (0, 1),
            Direction8::BottomLeft  => (-1, 1),
            Direction8::Left        => (-1, 0),
            Direction8::TopLeft     => (-1, -1),
        }
    }

    /// The opposite direction (`Top` ↔ `Bottom`, `TopLeft` ↔ `BottomRight`, …).
    #[inline]
    pub fn invert(self) -> Direction8 {
        Direction8::ALL[(self.index() + 4) % 8]
    }

    /// `true` for the four corner directions.
    #[inline]
    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    /// Euclidean length of one step in this direction, in cell edges.
    #[inline]
    pub fn distance_factor(self) -> f64 {
        if self.is_diagonal() { std::f64::consts::SQRT_2 } else { 1.0 }
    }

    /// Index into per-direction arrays (`[T; 8]`).
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction matching the sign pattern of `(dx, dy)`, or `None` for
    /// `(0, 0)`.  Magnitudes are ignored: `(3, -2)` maps to `TopRight`.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction8> {
        match (dx.signum(), dy.signum()) {
            (0, -1)  => Some(Direction8::Top),
            (1, -1)  => Some(Direction8::TopRight),
            (1, 0)   => Some(Direction8::Right),
            (1, 1)   => Some(Direction8::BottomRight),
            (0, 1)   => Some(Direction8::Bottom),
            (-1, 1)  => Some(Direction8::BottomLeft),
            (-1, 0)  => Some(Direction8::Left),
            (-1, -1) => Some(Direction8::TopLeft),
            _        => None,
        }
    }

    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction8::Top         => "top",
            Direction8::TopRight    => "top-right",
            Direction8::Right       => "right",
            Direction8::BottomRight => "bottom-right",
            Direction8::Bottom      => "bottom",
            Direction8::BottomLeft  => "bottom-left",
            Direction8::Left        => "left",
            Direction8::TopLeft     => "top-left",
        }
    }
}

impl fmt::Display for Direction8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

/// Relative elevation of the neighbor in a given direction.
///
/// Stored on **both** sides of an edge with inverted values; the grid's
/// `set_level` keeps the pair in sync.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Higher,
    #[default]
    Equal,
    Lower,
}

impl Level {
    /// The level as seen from the other end of the edge.
    #[inline]
    pub fn invert(self) -> Level {
        match self {
            Level::Higher => Level::Lower,
            Level::Equal  => Level::Equal,
            Level::Lower  => Level::Higher,
        }
    }
}

// ── DirectionSet ──────────────────────────────────────────────────────────────

/// Compact set of [`Direction8`] values stored in one byte.
///
/// Used for per-cell passability: a direction in the set is **blocked**.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);

    #[inline]
    pub fn insert(&mut self, dir: Direction8) {
        self.0 |= 1 << dir.index();
    }

    #[inline]
    pub fn remove(&mut self, dir: Direction8) {
        self.0 &= !(1 << dir.index());
    }

    #[inline]
    pub fn contains(self, dir: Direction8) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the members in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = Direction8> {
        Direction8::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}
