//! Exit clustering: connected-component discovery over exit cells.
//!
//! Adjacent exit cells (a wide doorway, a double door) act as one exit for
//! capacity and statistics purposes.  Clustering partitions the building's
//! exit set into maximal 8-connected components; it is computed once after
//! construction and stays valid until rooms are added or removed.

use egress_core::CellId;

use crate::building::Building;
use crate::cell::CellKind;
use crate::GridResult;

/// A maximal group of 8-connected exit cells.
#[derive(Clone, Debug)]
pub struct ExitCluster {
    /// Generated label, `"Exit 0"`, `"Exit 1"`, … in discovery order.
    pub name:  String,
    /// Member cells in discovery order; never empty.
    pub cells: Vec<CellId>,
}

impl ExitCluster {
    /// Number of member cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains(&cell)
    }
}

/// Partition the building's exit cells into maximal 8-connected clusters.
///
/// Every exit cell ends up in exactly one cluster; clusters are pairwise
/// disjoint and their union is the full exit set.  Adjacency is the plain
/// lattice neighborhood (occupancy and passability are irrelevant here —
/// two exit cells sharing a corner always cluster together).
pub fn exit_clusters(building: &Building) -> GridResult<Vec<ExitCluster>> {
    let exits = building.exit_cells();
    let mut visited: Vec<CellId> = Vec::with_capacity(exits.len());
    let mut clusters = Vec::new();

    for &start in exits {
        if visited.contains(&start) {
            continue;
        }

        // Iterative DFS flood fill restricted to exit cells.
        let mut members = Vec::new();
        let mut stack = vec![start];
        visited.push(start);
        while let Some(cell) = stack.pop() {
            members.push(cell);
            for n in building.direct_neighbors(cell)? {
                if visited.contains(&n) {
                    continue;
                }
                if building.cell(n)?.kind() != CellKind::Exit {
                    continue;
                }
                visited.push(n);
                stack.push(n);
            }
        }

        clusters.push(ExitCluster {
            name:  format!("Exit {}", clusters.len()),
            cells: members,
        });
    }

    Ok(clusters)
}
