//! Static-potential construction: multi-source Dijkstra from an exit cluster.
//!
//! # Cost units
//!
//! The heap works in integer **deci-cells** so ties break deterministically:
//! an orthogonal step costs 10, a diagonal step 14, each divided by the
//! *target* cell's speed factor (slower floor → larger cost).  The finished
//! field stores plain `f64` cell-edge units (cost / 10).
//!
//! # Monotonicity
//!
//! Every non-exit cell with a value was relaxed through some neighbor with a
//! strictly smaller value, so rules can always find a downhill step along a
//! shortest path.  Cells with speed factor 0 and cells cut off by passability
//! keep the unknown value.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use egress_core::CellId;
use egress_grid::{Building, ExitCluster};

use crate::static_field::StaticPotential;
use crate::{PotentialError, PotentialResult};

/// Orthogonal step cost in deci-cell units.
const COST_ORTHOGONAL: u64 = 10;
/// Diagonal step cost in deci-cell units (≈ 10·√2).
const COST_DIAGONAL: u64 = 14;

/// Cost of stepping onto `to`, or `None` if `to` cannot be walked on.
fn step_cost(building: &Building, from: CellId, to: CellId) -> PotentialResult<Option<u64>> {
    let factor = building.cell(to)?.speed_factor();
    if factor <= 0.0 {
        return Ok(None);
    }
    let base = match building.relative_direction(from, to)? {
        Some(dir) if dir.is_diagonal() => COST_DIAGONAL,
        // Door jumps between rooms with exotic offsets count as orthogonal.
        _ => COST_ORTHOGONAL,
    };
    Ok(Some((base as f64 / factor).round() as u64))
}

/// Build the distance field of one exit cluster over the whole building.
///
/// Adjacency is the passable, occupancy-independent neighborhood
/// ([`Building::neighbors`]), so the field never depends on who currently
/// stands where.  All cluster cells are sources with value 0.  The returned
/// field is unregistered; hand it to
/// [`PotentialSet::register_static`](crate::PotentialSet::register_static).
pub fn compute_exit_potential(
    building: &Building,
    cluster:  &ExitCluster,
) -> PotentialResult<StaticPotential> {
    if cluster.is_empty() {
        return Err(PotentialError::EmptyCluster);
    }

    // dist keyed by cell arena index; u64::MAX = unreached.
    let arena_len = building
        .cell_ids()
        .map(|c| c.index() + 1)
        .max()
        .unwrap_or(0);
    let mut dist = vec![u64::MAX; arena_len];

    // Min-heap: Reverse makes BinaryHeap behave as a min-heap.  Secondary
    // key CellId gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, CellId)>> = BinaryHeap::new();
    for &exit in &cluster.cells {
        dist[exit.index()] = 0;
        heap.push(Reverse((0, exit)));
    }

    while let Some(Reverse((cost, cell))) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[cell.index()] {
            continue;
        }
        for neighbor in building.neighbors(cell)? {
            let Some(edge) = step_cost(building, cell, neighbor)? else {
                continue;
            };
            let new_cost = cost.saturating_add(edge);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    let mut field = StaticPotential::new(cluster.name.clone());
    for cell in building.cell_ids() {
        let d = dist[cell.index()];
        if d != u64::MAX {
            field.set_potential(cell, d as f64 / COST_ORTHOGONAL as f64)?;
        }
    }
    Ok(field)
}
