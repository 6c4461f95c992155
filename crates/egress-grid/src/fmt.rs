//! Debug ASCII rendering of room matrices.
//!
//! One character per cell:
//!
//! | Char  | Meaning                 |
//! |-------|-------------------------|
//! | `.`   | open floor              |
//! | `D`   | door cell               |
//! | `E`   | exit cell               |
//! | `S`   | safe-area cell          |
//! | `%`   | stair cell              |
//! | `@`   | occupied (any kind)     |
//! | ` `   | hole (no cell)          |
//!
//! Occupancy wins over kind so crowd movement is visible frame to frame.

use egress_core::RoomId;

use crate::building::Building;
use crate::cell::CellKind;
use crate::GridResult;

fn cell_char(kind: CellKind, occupied: bool) -> char {
    if occupied {
        return '@';
    }
    match kind {
        CellKind::Open  => '.',
        CellKind::Door  => 'D',
        CellKind::Exit  => 'E',
        CellKind::Safe  => 'S',
        CellKind::Stair => '%',
    }
}

/// Render one room as a bordered ASCII matrix, top row first.
pub fn render_room(building: &Building, room: RoomId) -> GridResult<String> {
    let r = building.room(room)?;
    let width = r.width() as usize;

    let mut out = String::with_capacity((width + 3) * (r.height() as usize + 2));
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push_str("+\n");

    for y in 0..r.height() {
        out.push('|');
        for x in 0..r.width() {
            match r.cell_at(x, y) {
                Some(id) => {
                    let c = building.cell(id)?;
                    out.push(cell_char(c.kind(), c.is_occupied()));
                }
                None => out.push(' '),
            }
        }
        out.push_str("|\n");
    }

    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('+');
    Ok(out)
}
