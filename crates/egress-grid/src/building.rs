//! The building: arena storage for floors, rooms, and cells, plus every
//! sanctioned topology and occupancy operation.
//!
//! # Data layout
//!
//! Cells live in one flat `Vec<Cell>` addressed by `CellId`; rooms live in
//! `Vec<Option<Room>>` slots addressed by `RoomId` (a removed room leaves an
//! empty slot so ids stay stable).  A room's matrix stores `Option<CellId>`
//! into the cell arena.  No cycles, no shared ownership: every reference
//! between entities is an id.
//!
//! # Occupancy protocol
//!
//! Occupants change cells **only** through [`place_individual`],
//! [`clear_occupant`], [`relocate`], and [`swap_occupants`]
//! (all `Building::` methods).  Each validates every precondition before
//! mutating anything, so a failed call leaves the grid untouched.  Room
//! occupant lists are maintained inside the same operations and can never
//! drift from the per-cell occupant fields.
//!
//! [`place_individual`]: Building::place_individual
//! [`clear_occupant`]: Building::clear_occupant
//! [`relocate`]: Building::relocate
//! [`swap_occupants`]: Building::swap_occupants

use egress_core::{CellId, Direction8, FloorId, IndividualId, Level, RoomId};

use crate::cell::{Cell, CellKey, CellKind};
use crate::room::Room;
use crate::{GridError, GridResult};

/// The whole evacuation grid: floors, room slots, and the cell arena.
#[derive(Clone, Debug, Default)]
pub struct Building {
    floors: Vec<String>,
    rooms:  Vec<Option<Room>>,
    cells:  Vec<Cell>,
    /// Exit cells of live rooms, in attach order.
    exits:  Vec<CellId>,
}

impl Building {
    /// An empty building with no floors, rooms, or cells.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Floors ────────────────────────────────────────────────────────────

    /// Register a floor and return its id (sequential from 0).
    pub fn add_floor(&mut self, name: impl Into<String>) -> FloorId {
        let id = FloorId(self.floors.len() as u16);
        self.floors.push(name.into());
        id
    }

    pub fn floor_name(&self, floor: FloorId) -> GridResult<&str> {
        self.floors
            .get(floor.index())
            .map(String::as_str)
            .ok_or(GridError::FloorNotFound(floor))
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Ids of all live rooms on `floor`, ascending.
    pub fn rooms_on_floor(&self, floor: FloorId) -> GridResult<Vec<RoomId>> {
        if floor.index() >= self.floors.len() {
            return Err(GridError::FloorNotFound(floor));
        }
        Ok(self
            .rooms()
            .filter(|r| r.floor() == floor)
            .map(Room::id)
            .collect())
    }

    // ── Rooms ─────────────────────────────────────────────────────────────

    /// Add an empty `width`×`height` room on `floor` at the given absolute
    /// offset.  Cells are attached afterwards with [`set_cell`](Self::set_cell).
    pub fn add_room(
        &mut self,
        floor:    FloorId,
        width:    u32,
        height:   u32,
        x_offset: i32,
        y_offset: i32,
    ) -> GridResult<RoomId> {
        if floor.index() >= self.floors.len() {
            return Err(GridError::FloorNotFound(floor));
        }
        // The cell count must stay addressable by u32 cell ids.
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(GridError::BadDimensions { width, height });
        }
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(Some(Room::new(id, floor, width, height, x_offset, y_offset)));
        Ok(id)
    }

    /// Remove a room.  Fails for unknown (or already removed) rooms and for
    /// rooms that still hold occupants.  The room's exit cells leave the
    /// global exit list; its cells become unreachable through every query
    /// that resolves rooms.
    pub fn remove_room(&mut self, room: RoomId) -> GridResult<()> {
        let r = self.room(room)?;
        if !r.occupants().is_empty() {
            return Err(GridError::RoomOccupied(room));
        }
        self.exits.retain(|&id| self.cells[id.index()].room() != room);
        self.rooms[room.index()] = None;
        Ok(())
    }

    pub fn room(&self, room: RoomId) -> GridResult<&Room> {
        self.rooms
            .get(room.index())
            .and_then(Option::as_ref)
            .ok_or(GridError::RoomNotFound(room))
    }

    fn room_mut(&mut self, room: RoomId) -> GridResult<&mut Room> {
        self.rooms
            .get_mut(room.index())
            .and_then(Option::as_mut)
            .ok_or(GridError::RoomNotFound(room))
    }

    #[inline]
    fn is_live_room(&self, room: RoomId) -> bool {
        self.rooms.get(room.index()).is_some_and(Option::is_some)
    }

    /// Iterator over all live rooms in id order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter_map(Option::as_ref)
    }

    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    /// Set or clear the room-wide alarm flag.
    pub fn set_room_alarmed(&mut self, room: RoomId, alarmed: bool) -> GridResult<()> {
        self.room_mut(room)?.set_alarmed(alarmed);
        Ok(())
    }

    // ── Cells ─────────────────────────────────────────────────────────────

    /// Attach a cell of `kind` at `(x, y)` in `room` using the kind's default
    /// speed factor.
    pub fn set_cell(&mut self, room: RoomId, x: u32, y: u32, kind: CellKind) -> GridResult<CellId> {
        self.set_cell_with_speed(room, x, y, kind, kind.default_speed_factor())
    }

    /// Attach a cell with an explicit speed factor in `[0, 1]`.
    ///
    /// Fails if the room is unknown, the coordinates leave the matrix, or the
    /// slot is already taken.  The cell's identity `(room, x, y)` is fixed
    /// here and never changes.
    pub fn set_cell_with_speed(
        &mut self,
        room:         RoomId,
        x:            u32,
        y:            u32,
        kind:         CellKind,
        speed_factor: f64,
    ) -> GridResult<CellId> {
        if !(0.0..=1.0).contains(&speed_factor) {
            return Err(GridError::BadSpeedFactor(speed_factor));
        }
        let r = self.room(room)?;
        if x >= r.width() || y >= r.height() {
            return Err(GridError::OutOfBounds {
                room,
                x,
                y,
                width:  r.width(),
                height: r.height(),
            });
        }
        if r.cell_at(x, y).is_some() {
            return Err(GridError::CellExists { room, x, y });
        }

        let id = CellId(self.cells.len() as u32);
        self.cells.push(Cell::new(CellKey { room, x, y }, kind, speed_factor));

        let r = self.room_mut(room)?;
        r.attach(x, y, id);
        if kind == CellKind::Door {
            r.add_door(id);
        }
        if kind == CellKind::Exit {
            self.exits.push(id);
        }
        Ok(id)
    }

    pub fn cell(&self, cell: CellId) -> GridResult<&Cell> {
        self.cells.get(cell.index()).ok_or(GridError::CellNotFound(cell))
    }

    fn cell_mut(&mut self, cell: CellId) -> GridResult<&mut Cell> {
        self.cells.get_mut(cell.index()).ok_or(GridError::CellNotFound(cell))
    }

    /// `true` if `room` is live and has a cell at `(x, y)`.
    pub fn exists_at(&self, room: RoomId, x: u32, y: u32) -> bool {
        self.rooms
            .get(room.index())
            .and_then(Option::as_ref)
            .is_some_and(|r| r.exists_at(x, y))
    }

    /// The cell at `(room, x, y)`, or `None` for holes, out-of-bounds
    /// coordinates, and removed rooms.
    pub fn cell_at(&self, room: RoomId, x: u32, y: u32) -> Option<CellId> {
        self.rooms
            .get(room.index())
            .and_then(Option::as_ref)
            .and_then(|r| r.cell_at(x, y))
    }

    /// Ids of all cells belonging to live rooms, ascending.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| self.is_live_room(c.room()))
            .map(|(i, _)| CellId(i as u32))
    }

    /// Total number of cells in live rooms.
    pub fn cell_count(&self) -> usize {
        self.cell_ids().count()
    }

    /// Exit cells of live rooms, in attach order.
    #[inline]
    pub fn exit_cells(&self) -> &[CellId] {
        &self.exits
    }

    // ── Door links ────────────────────────────────────────────────────────

    /// Link two door cells bidirectionally.  Both must be `CellKind::Door`;
    /// re-linking an existing pair is a no-op.
    pub fn link_doors(&mut self, a: CellId, b: CellId) -> GridResult<()> {
        if self.cell(a)?.kind() != CellKind::Door {
            return Err(GridError::NotADoor(a));
        }
        if self.cell(b)?.kind() != CellKind::Door {
            return Err(GridError::NotADoor(b));
        }
        self.cells[a.index()].add_door_target(b);
        self.cells[b.index()].add_door_target(a);
        Ok(())
    }

    // ── Passability and levels (always symmetric) ─────────────────────────

    /// Block stepping from `cell` towards `dir`, and from the in-room
    /// neighbor (if any) back towards `cell`.
    pub fn set_impassable(&mut self, cell: CellId, dir: Direction8) -> GridResult<()> {
        self.set_passability(cell, dir, false)
    }

    /// Allow stepping from `cell` towards `dir` again, symmetrically.
    pub fn set_passable(&mut self, cell: CellId, dir: Direction8) -> GridResult<()> {
        self.set_passability(cell, dir, true)
    }

    fn set_passability(&mut self, cell: CellId, dir: Direction8, passable: bool) -> GridResult<()> {
        let neighbor = self.neighbor_in_room(cell, dir)?;
        self.cell_mut(cell)?.set_blocked(dir, !passable);
        if let Some(n) = neighbor {
            self.cells[n.index()].set_blocked(dir.invert(), !passable);
        }
        Ok(())
    }

    pub fn is_passable(&self, cell: CellId, dir: Direction8) -> GridResult<bool> {
        Ok(self.cell(cell)?.is_passable(dir))
    }

    /// Set the relative elevation towards `dir`; the in-room neighbor (if
    /// any) gets the inverted level towards `cell`.
    pub fn set_level(&mut self, cell: CellId, dir: Direction8, level: Level) -> GridResult<()> {
        let neighbor = self.neighbor_in_room(cell, dir)?;
        self.cell_mut(cell)?.set_level_one_side(dir, level);
        if let Some(n) = neighbor {
            self.cells[n.index()].set_level_one_side(dir.invert(), level.invert());
        }
        Ok(())
    }

    pub fn level(&self, cell: CellId, dir: Direction8) -> GridResult<Level> {
        Ok(self.cell(cell)?.level(dir))
    }

    /// The in-room lattice neighbor of `cell` towards `dir` (holes and
    /// out-of-bounds → `None`).  Door targets are not lattice neighbors.
    pub fn neighbor_in_room(&self, cell: CellId, dir: Direction8) -> GridResult<Option<CellId>> {
        let c = self.cell(cell)?;
        let r = self.room(c.room())?;
        let (dx, dy) = dir.offset();
        let nx = c.x() as i64 + dx as i64;
        let ny = c.y() as i64 + dy as i64;
        if nx < 0 || ny < 0 {
            return Ok(None);
        }
        Ok(r.cell_at(nx as u32, ny as u32))
    }

    // ── Neighbor queries ──────────────────────────────────────────────────

    /// All existing adjacent cells, ignoring passability and occupancy.
    /// Door targets of live rooms are included.
    pub fn direct_neighbors(&self, cell: CellId) -> GridResult<Vec<CellId>> {
        self.collect_neighbors(cell, false, false)
    }

    /// Passable adjacent cells, ignoring occupancy.  This is the adjacency
    /// the potential builder and exit clustering use — it never depends on
    /// who currently stands where.
    pub fn neighbors(&self, cell: CellId) -> GridResult<Vec<CellId>> {
        self.collect_neighbors(cell, true, false)
    }

    /// Passable, unoccupied adjacent cells.  Diagonal steps are excluded
    /// when both flanking orthogonal cells are occupied (no corner cutting
    /// through a fully blocked corner).
    pub fn free_neighbors(&self, cell: CellId) -> GridResult<Vec<CellId>> {
        self.collect_neighbors(cell, true, true)
    }

    fn collect_neighbors(
        &self,
        cell:          CellId,
        passable_only: bool,
        free_only:     bool,
    ) -> GridResult<Vec<CellId>> {
        let c = self.cell(cell)?;
        let r = self.room(c.room())?;
        let mut out = Vec::with_capacity(8);

        for dir in Direction8::ALL {
            if passable_only && !c.is_passable(dir) {
                continue;
            }
            let (dx, dy) = dir.offset();
            let nx = c.x() as i64 + dx as i64;
            let ny = c.y() as i64 + dy as i64;
            if nx < 0 || ny < 0 {
                continue;
            }
            let Some(nid) = r.cell_at(nx as u32, ny as u32) else {
                continue;
            };
            if free_only {
                if self.cells[nid.index()].is_occupied() {
                    continue;
                }
                if dir.is_diagonal() && self.corner_blocked(r, c, dir) {
                    continue;
                }
            }
            out.push(nid);
        }

        // Door targets are adjacent regardless of lattice geometry.  Targets
        // in removed rooms are skipped.
        for &t in c.door_targets() {
            let Ok(tc) = self.cell(t) else { continue };
            if !self.is_live_room(tc.room()) {
                continue;
            }
            if free_only && tc.is_occupied() {
                continue;
            }
            out.push(t);
        }

        Ok(out)
    }

    /// A diagonal step cuts a corner when both flanking orthogonal cells
    /// exist and are occupied.
    fn corner_blocked(&self, room: &Room, c: &Cell, dir: Direction8) -> bool {
        let (dx, dy) = dir.offset();
        let fx = c.x() as i64 + dx as i64;
        let fy = c.y() as i64 + dy as i64;
        let flank_a = if fx >= 0 { room.cell_at(fx as u32, c.y()) } else { None };
        let flank_b = if fy >= 0 { room.cell_at(c.x(), fy as u32) } else { None };
        match (flank_a, flank_b) {
            (Some(a), Some(b)) => {
                self.cells[a.index()].is_occupied() && self.cells[b.index()].is_occupied()
            }
            _ => false,
        }
    }

    /// Direction from `from` to `to` in building-absolute coordinates
    /// (room offsets applied), or `None` when the cells coincide.
    pub fn relative_direction(&self, from: CellId, to: CellId) -> GridResult<Option<Direction8>> {
        let (fc, tc) = (self.cell(from)?, self.cell(to)?);
        let (fr, tr) = (self.room(fc.room())?, self.room(tc.room())?);
        let dx = (tr.x_offset() + tc.x() as i32) - (fr.x_offset() + fc.x() as i32);
        let dy = (tr.y_offset() + tc.y() as i32) - (fr.y_offset() + fc.y() as i32);
        Ok(Direction8::from_offset(dx, dy))
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// Put `individual` on an empty cell.
    pub fn place_individual(&mut self, cell: CellId, individual: IndividualId) -> GridResult<()> {
        let c = self.cell(cell)?;
        if c.is_occupied() {
            return Err(GridError::CellOccupied(cell));
        }
        let room = c.room();
        self.cells[cell.index()].set_occupant(Some(individual));
        self.room_mut(room)?.add_occupant(individual);
        Ok(())
    }

    /// Take the occupant off a cell (evacuation, death).
    pub fn clear_occupant(&mut self, cell: CellId) -> GridResult<IndividualId> {
        let c = self.cell(cell)?;
        let individual = c.occupant().ok_or(GridError::CellEmpty(cell))?;
        let room = c.room();
        self.cells[cell.index()].set_occupant(None);
        self.room_mut(room)?.remove_occupant(individual);
        Ok(individual)
    }

    pub fn occupant(&self, cell: CellId) -> GridResult<Option<IndividualId>> {
        Ok(self.cell(cell)?.occupant())
    }

    /// Move the occupant of `from` onto the empty cell `to`.
    ///
    /// `relocate(c, c)` succeeds without touching anything — a stay-put move
    /// the caller may still record.  Fails on an empty source or an occupied
    /// target; nothing is mutated on failure.
    pub fn relocate(&mut self, from: CellId, to: CellId) -> GridResult<IndividualId> {
        let individual = self.cell(from)?.occupant().ok_or(GridError::CellEmpty(from))?;
        if from == to {
            return Ok(individual);
        }
        let tc = self.cell(to)?;
        if tc.is_occupied() {
            return Err(GridError::CellOccupied(to));
        }
        let from_room = self.cells[from.index()].room();
        let to_room = tc.room();

        self.cells[from.index()].set_occupant(None);
        self.cells[to.index()].set_occupant(Some(individual));
        if from_room != to_room {
            self.room_mut(from_room)?.remove_occupant(individual);
            self.room_mut(to_room)?.add_occupant(individual);
        }
        Ok(individual)
    }

    /// Exchange the occupants of two distinct occupied cells.
    ///
    /// Fails if the cells coincide or either is empty; nothing is mutated on
    /// failure.  Returns `(occupant of c1, occupant of c2)` as seen before
    /// the swap.
    pub fn swap_occupants(
        &mut self,
        c1: CellId,
        c2: CellId,
    ) -> GridResult<(IndividualId, IndividualId)> {
        if c1 == c2 {
            return Err(GridError::SwapSameCell(c1));
        }
        let i1 = self.cell(c1)?.occupant().ok_or(GridError::CellEmpty(c1))?;
        let i2 = self.cell(c2)?.occupant().ok_or(GridError::CellEmpty(c2))?;
        let r1 = self.cells[c1.index()].room();
        let r2 = self.cells[c2.index()].room();

        self.cells[c1.index()].set_occupant(Some(i2));
        self.cells[c2.index()].set_occupant(Some(i1));
        if r1 != r2 {
            self.room_mut(r1)?.remove_occupant(i1);
            self.room_mut(r1)?.add_occupant(i2);
            self.room_mut(r2)?.remove_occupant(i2);
            self.room_mut(r2)?.add_occupant(i1);
        }
        Ok((i1, i2))
    }

    /// Lock a cell until `until_secs`, keeping it "occupied" for targeting
    /// purposes while a crossing out of it finishes.
    pub fn lock_cell(&mut self, cell: CellId, until_secs: f64) -> GridResult<()> {
        self.cell_mut(cell)?.set_occupied_until(until_secs);
        Ok(())
    }

    /// Occupied, or transiently locked at `time_secs`.
    pub fn is_occupied_at(&self, cell: CellId, time_secs: f64) -> GridResult<bool> {
        Ok(self.cell(cell)?.is_occupied_at(time_secs))
    }
}
