//! The frozen initial configuration packaged with a recording.

use egress_agent::Population;
use egress_grid::Building;
use egress_potential::PotentialSet;

/// Everything needed to replay an action log from scratch: the building
/// (floors, rooms, cells, door links), the population as it stood at
/// recording start, all potentials, and the speed calibration.
///
/// All members are arena-based, so `Clone` is a true deep copy — a cloned
/// configuration shares nothing with its source.
#[derive(Clone, Debug)]
pub struct InitialConfiguration {
    pub building:           Building,
    pub population:         Population,
    pub potentials:         PotentialSet,
    pub absolute_max_speed: f64,
}
