//! Rooms: rectangular cell matrices with holes.

use egress_core::{CellId, FloorId, IndividualId, RoomId};

/// One rectangular room on a floor.
///
/// The matrix is row-major with `None` marking holes (pillars, voids,
/// unreachable corners).  Coordinates are room-local; `x_offset`/`y_offset`
/// place the matrix in building-absolute coordinates so directions between
/// cells of different rooms stay well-defined.
#[derive(Clone, Debug)]
pub struct Room {
    id:        RoomId,
    floor:     FloorId,
    width:     u32,
    height:    u32,
    x_offset:  i32,
    y_offset:  i32,
    /// Alarm flag: a reaction rule alarms every individual in an alarmed room
    /// regardless of personal reaction time.
    alarmed:   bool,
    cells:     Vec<Option<CellId>>,
    doors:     Vec<CellId>,
    occupants: Vec<IndividualId>,
}

impl Room {
    pub(crate) fn new(
        id:       RoomId,
        floor:    FloorId,
        width:    u32,
        height:   u32,
        x_offset: i32,
        y_offset: i32,
    ) -> Self {
        Self {
            id,
            floor,
            width,
            height,
            x_offset,
            y_offset,
            alarmed:   false,
            cells:     vec![None; width as usize * height as usize],
            doors:     Vec::new(),
            occupants: Vec::new(),
        }
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn floor(&self) -> FloorId {
        self.floor
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    #[inline]
    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    #[inline]
    fn slot(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// `true` if `(x, y)` is in bounds and not a hole.
    #[inline]
    pub fn exists_at(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.cells[self.slot(x, y)].is_some()
    }

    /// The cell at `(x, y)`, or `None` for out-of-bounds or holes.
    #[inline]
    pub fn cell_at(&self, x: u32, y: u32) -> Option<CellId> {
        if x < self.width && y < self.height {
            self.cells[self.slot(x, y)]
        } else {
            None
        }
    }

    /// Number of attached cells (holes excluded).
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// All attached cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    // ── Membership lists ──────────────────────────────────────────────────

    #[inline]
    pub fn doors(&self) -> &[CellId] {
        &self.doors
    }

    #[inline]
    pub fn occupants(&self) -> &[IndividualId] {
        &self.occupants
    }

    #[inline]
    pub fn is_alarmed(&self) -> bool {
        self.alarmed
    }

    // ── Crate-internal mutation (Building only) ───────────────────────────

    /// Attach a cell id to the matrix slot.  The caller has validated bounds
    /// and emptiness.
    pub(crate) fn attach(&mut self, x: u32, y: u32, id: CellId) {
        let slot = self.slot(x, y);
        debug_assert!(self.cells[slot].is_none(), "slot already attached");
        self.cells[slot] = Some(id);
    }

    pub(crate) fn add_door(&mut self, id: CellId) {
        self.doors.push(id);
    }

    pub(crate) fn add_occupant(&mut self, individual: IndividualId) {
        self.occupants.push(individual);
    }

    pub(crate) fn remove_occupant(&mut self, individual: IndividualId) {
        if let Some(pos) = self.occupants.iter().position(|&i| i == individual) {
            self.occupants.remove(pos);
        }
    }

    pub(crate) fn set_alarmed(&mut self, alarmed: bool) {
        self.alarmed = alarmed;
    }
}
