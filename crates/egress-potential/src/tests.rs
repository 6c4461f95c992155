//! Unit tests for potential fields.

use egress_core::{CellId, IndividualId, ParameterSet, RoomId, SimRng};
use egress_grid::{exit_clusters, Building, CellKind};

use crate::builder::compute_exit_potential;
use crate::dynamic::DynamicPotential;
use crate::potential::Potential;
use crate::set::PotentialSet;
use crate::static_field::StaticPotential;
use crate::PotentialError;

/// A 1×`len` corridor with a unit-speed exit at the right end.
fn corridor(len: u32) -> (Building, RoomId) {
    let mut b = Building::new();
    let floor = b.add_floor("ground");
    let room = b.add_room(floor, len, 1, 0, 0).unwrap();
    for x in 0..len - 1 {
        b.set_cell(room, x, 0, CellKind::Open).unwrap();
    }
    b.set_cell_with_speed(room, len - 1, 0, CellKind::Exit, 1.0).unwrap();
    (b, room)
}

fn exit_field(b: &Building) -> StaticPotential {
    let clusters = exit_clusters(b).unwrap();
    assert_eq!(clusters.len(), 1);
    compute_exit_potential(b, &clusters[0]).unwrap()
}

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn corridor_distances() {
        let (b, room) = corridor(5);
        let field = exit_field(&b);
        for x in 0..5 {
            let cell = b.cell_at(room, x, 0).unwrap();
            let expected = (4 - x) as f64;
            assert_eq!(field.potential(cell), Some(expected));
        }
        assert_eq!(field.max_potential(), 4.0);
    }

    #[test]
    fn diagonal_steps_cost_more() {
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 2, 2, 0, 0).unwrap();
        b.set_cell_with_speed(room, 0, 0, CellKind::Exit, 1.0).unwrap();
        for (x, y) in [(1, 0), (0, 1), (1, 1)] {
            b.set_cell(room, x, y, CellKind::Open).unwrap();
        }
        let field = exit_field(&b);
        assert_eq!(field.potential(b.cell_at(room, 1, 0).unwrap()), Some(1.0));
        assert_eq!(field.potential(b.cell_at(room, 1, 1).unwrap()), Some(1.4));
    }

    #[test]
    fn slow_floor_doubles_cost() {
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 3, 1, 0, 0).unwrap();
        b.set_cell_with_speed(room, 2, 0, CellKind::Exit, 1.0).unwrap();
        b.set_cell_with_speed(room, 1, 0, CellKind::Open, 0.5).unwrap();
        b.set_cell(room, 0, 0, CellKind::Open).unwrap();
        let field = exit_field(&b);
        assert_eq!(field.potential(b.cell_at(room, 1, 0).unwrap()), Some(2.0));
        assert_eq!(field.potential(b.cell_at(room, 0, 0).unwrap()), Some(3.0));
    }

    #[test]
    fn zero_speed_cells_stay_unknown() {
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 3, 1, 0, 0).unwrap();
        b.set_cell_with_speed(room, 2, 0, CellKind::Exit, 1.0).unwrap();
        b.set_cell_with_speed(room, 1, 0, CellKind::Open, 0.0).unwrap();
        b.set_cell(room, 0, 0, CellKind::Open).unwrap();
        let field = exit_field(&b);
        assert!(field.potential(b.cell_at(room, 1, 0).unwrap()).is_none());
        // Cut off behind the impassable cell.
        assert!(field.potential(b.cell_at(room, 0, 0).unwrap()).is_none());
    }

    #[test]
    fn field_ignores_occupancy() {
        let (mut b, room) = corridor(3);
        b.place_individual(b.cell_at(room, 1, 0).unwrap(), IndividualId(0)).unwrap();
        let field = exit_field(&b);
        assert_eq!(field.potential(b.cell_at(room, 0, 0).unwrap()), Some(2.0));
    }

    #[test]
    fn monotone_downhill_everywhere() {
        // L-shaped room with a hole; every valued cell above 0 must have a
        // passable neighbor with a strictly smaller value.
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 4, 4, 0, 0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) == (1, 1) || (x, y) == (2, 1) {
                    continue; // holes
                }
                if (x, y) == (3, 3) {
                    b.set_cell_with_speed(room, x, y, CellKind::Exit, 1.0).unwrap();
                } else {
                    b.set_cell(room, x, y, CellKind::Open).unwrap();
                }
            }
        }
        let field = exit_field(&b);
        for cell in b.cell_ids() {
            let Some(v) = field.potential(cell) else { continue };
            if v == 0.0 {
                continue;
            }
            let has_downhill = b
                .neighbors(cell)
                .unwrap()
                .into_iter()
                .any(|n| field.potential(n).is_some_and(|nv| nv < v));
            assert!(has_downhill, "cell {cell} at value {v} has no downhill neighbor");
        }
    }

    #[test]
    fn empty_cluster_rejected() {
        let (b, _) = corridor(2);
        let empty = egress_grid::ExitCluster {
            name:  "Exit".into(),
            cells: vec![],
        };
        assert!(matches!(
            compute_exit_potential(&b, &empty),
            Err(PotentialError::EmptyCluster)
        ));
    }
}

#[cfg(test)]
mod static_field {
    use super::*;

    #[test]
    fn rejects_negative_values() {
        let mut f = StaticPotential::new("test");
        assert!(matches!(
            f.set_potential(CellId(0), -1.0),
            Err(PotentialError::BadValue(_))
        ));
        assert!(f.set_potential(CellId(0), 0.0).is_ok());
    }

    #[test]
    fn tracks_max() {
        let mut f = StaticPotential::new("test");
        f.set_potential(CellId(0), 3.0).unwrap();
        f.set_potential(CellId(1), 7.0).unwrap();
        f.set_potential(CellId(2), 5.0).unwrap();
        assert_eq!(f.max_potential(), 7.0);
        assert!(f.has_valid_potential(CellId(1)));
        assert!(!f.has_valid_potential(CellId(9)));
    }
}

#[cfg(test)]
mod dynamic {
    use super::*;
    use crate::dynamic::DYNAMIC_CEILING;

    #[test]
    fn bounded_below_and_above() {
        let mut d = DynamicPotential::new();
        d.decrease(CellId(0));
        assert_eq!(d.value(CellId(0)), 0);
        for _ in 0..DYNAMIC_CEILING + 10 {
            d.increase(CellId(0));
        }
        assert_eq!(d.value(CellId(0)), DYNAMIC_CEILING);
    }

    #[test]
    fn defined_everywhere() {
        let d = DynamicPotential::new();
        assert_eq!(d.potential(CellId(42)), Some(0.0));
        assert_eq!(d.max_potential(), 0.0);
    }

    #[test]
    fn jammed_cells_grow() {
        // 1×1 room: the occupant has no free neighbor, so the cell is jammed.
        let mut b = Building::new();
        let floor = b.add_floor("ground");
        let room = b.add_room(floor, 1, 1, 0, 0).unwrap();
        let cell = b.set_cell(room, 0, 0, CellKind::Open).unwrap();
        b.place_individual(cell, IndividualId(0)).unwrap();

        let params = ParameterSet {
            probability_dynamic_increase: 1.0,
            probability_dynamic_decrease: 1.0,
            ..ParameterSet::default()
        };
        let mut rng = SimRng::new(0);
        let mut d = DynamicPotential::new();
        d.update(&b, &params, &mut rng).unwrap();
        assert_eq!(d.value(cell), 1);
    }

    #[test]
    fn unjammed_cells_decay_to_zero() {
        let (b, room) = corridor(3);
        let cell = b.cell_at(room, 0, 0).unwrap();
        let params = ParameterSet {
            probability_dynamic_decrease: 1.0,
            ..ParameterSet::default()
        };
        let mut rng = SimRng::new(0);
        let mut d = DynamicPotential::new();
        d.increase(cell);
        d.increase(cell);
        d.update(&b, &params, &mut rng).unwrap();
        assert_eq!(d.value(cell), 1);
        d.update(&b, &params, &mut rng).unwrap();
        assert_eq!(d.value(cell), 0);
        assert!(d.is_empty());
    }

    #[test]
    fn update_is_deterministic() {
        let (mut b, room) = corridor(4);
        b.place_individual(b.cell_at(room, 0, 0).unwrap(), IndividualId(0)).unwrap();
        let params = ParameterSet::default();

        let run = |seed: u64| {
            let mut rng = SimRng::new(seed);
            let mut d = DynamicPotential::new();
            for x in 0..4 {
                d.increase(b.cell_at(room, x, 0).unwrap());
            }
            for _ in 0..20 {
                d.update(&b, &params, &mut rng).unwrap();
            }
            (0..4).map(|x| d.value(b.cell_at(room, x, 0).unwrap())).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }
}

#[cfg(test)]
mod set {
    use super::*;

    #[test]
    fn registration_order_defines_ids() {
        let mut set = PotentialSet::new();
        let p0 = set.register_static(StaticPotential::new("a"));
        let p1 = set.register_static(StaticPotential::new("b"));
        assert!(p0 < p1);
        assert_eq!(set.get(p0).unwrap().name(), "a");
        assert!(set.get(egress_core::PotentialId(9)).is_err());
    }

    #[test]
    fn min_potential_breaks_ties_by_registration_order() {
        let cell = CellId(0);
        let mut a = StaticPotential::new("a");
        a.set_potential(cell, 5.0).unwrap();
        let mut b = StaticPotential::new("b");
        b.set_potential(cell, 5.0).unwrap();
        let mut c = StaticPotential::new("c");
        c.set_potential(cell, 9.0).unwrap();

        let mut set = PotentialSet::new();
        let pa = set.register_static(a);
        set.register_static(b);
        set.register_static(c);
        assert_eq!(set.min_potential_for(cell), Some((pa, 5.0)));
    }

    #[test]
    fn min_potential_skips_unreachable_and_safe() {
        let cell = CellId(0);
        let unreachable = StaticPotential::new("far");
        let mut safe = StaticPotential::new("safe");
        safe.set_potential(cell, 0.0).unwrap();
        let mut exit = StaticPotential::new("exit");
        exit.set_potential(cell, 3.0).unwrap();

        let mut set = PotentialSet::new();
        set.register_static(unreachable);
        let safe_id = set.register_safe_potential(safe);
        let exit_id = set.register_static(exit);

        assert_eq!(set.safe_potential(), Some(safe_id));
        assert_eq!(set.min_potential_for(cell), Some((exit_id, 3.0)));
    }

    #[test]
    fn no_reachable_potential_is_none() {
        let set = PotentialSet::new();
        assert!(set.min_potential_for(CellId(0)).is_none());
    }
}
