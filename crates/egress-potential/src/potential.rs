//! The potential contract consumed by rules and assignment logic.

use egress_core::CellId;

/// A per-cell scalar cost field.
///
/// `None` marks the unknown value — the cell is unreachable from whatever
/// source the field was built from.  Rules move individuals "downhill", i.e.
/// toward strictly smaller values.
pub trait Potential {
    /// The value at `cell`, or `None` for unreachable cells.
    fn potential(&self, cell: CellId) -> Option<f64>;

    /// `true` if the field has a value at `cell`.
    fn has_valid_potential(&self, cell: CellId) -> bool {
        self.potential(cell).is_some()
    }

    /// The largest value anywhere in the field; 0 for an empty field.
    fn max_potential(&self) -> f64;
}
