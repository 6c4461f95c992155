//! Pluggable per-step iteration orders.

use egress_agent::Population;
use egress_core::{IndividualId, SimRng};
use egress_potential::{Potential, PotentialSet};

/// The order in which individuals are processed within one step.
///
/// Distance-based orders sort by the individual's assigned static potential
/// at its current cell — the same "distance to exit" the movement rule walks
/// down.  Individuals without a valid value sort last.  All orders are
/// deterministic for a fixed seed; `Random` draws a fresh permutation from
/// the run RNG every step.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IterationOrder {
    /// Add order (ascending id).
    #[default]
    Identity,
    /// A fresh random permutation per step.
    Random,
    /// Closest to its exit first.
    FrontToBack,
    /// Farthest from its exit first.
    BackToFront,
}

impl IterationOrder {
    /// Arrange the step's id snapshot in place.
    pub(crate) fn arrange(
        self,
        ids:        &mut [IndividualId],
        population: &Population,
        potentials: &PotentialSet,
        rng:        &mut SimRng,
    ) {
        match self {
            IterationOrder::Identity => {}
            IterationOrder::Random => rng.shuffle(ids),
            IterationOrder::FrontToBack => {
                sort_by_distance(ids, population, potentials, false);
            }
            IterationOrder::BackToFront => {
                sort_by_distance(ids, population, potentials, true);
            }
        }
    }
}

/// Distance of one individual to its exit; unreachable sorts last in both
/// directions.
fn distance(id: IndividualId, population: &Population, potentials: &PotentialSet) -> f64 {
    population
        .get(id)
        .ok()
        .and_then(|i| {
            let field = potentials.get(i.potential()?).ok()?;
            field.potential(i.cell())
        })
        .unwrap_or(f64::INFINITY)
}

fn sort_by_distance(
    ids:        &mut [IndividualId],
    population: &Population,
    potentials: &PotentialSet,
    descending: bool,
) {
    // Stable sort: equal distances keep id order, so runs reproduce.
    ids.sort_by(|&a, &b| {
        let (da, db) = (
            distance(a, population, potentials),
            distance(b, population, potentials),
        );
        let ord = da.total_cmp(&db);
        if descending {
            // Unreachable individuals stay last even when reversed.
            match (da.is_infinite(), db.is_infinite()) {
                (false, false) => ord.reverse(),
                _ => ord,
            }
        } else {
            ord
        }
    });
}
