//! Tunable model parameters shared by the engine and the rule set.

/// Knobs of the evacuation model.
///
/// Loaded or constructed by the application and handed to the simulation
/// builder; rules read the active set through their state accessor.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSet {
    /// Calibrated maximum walking speed in m/s.  Together with the 0.4 m cell
    /// edge this fixes the real-time length of one step.
    pub absolute_max_speed: f64,

    /// Per-step probability that a jammed cell (occupied, no free neighbor)
    /// raises the dynamic potential by one.
    pub probability_dynamic_increase: f64,

    /// Per-step probability that a non-jammed cell's dynamic potential decays
    /// by one.
    pub probability_dynamic_decrease: f64,

    /// Weight of the dynamic potential when the movement rule scores target
    /// cells.  0 disables crowd avoidance entirely.
    pub dynamic_potential_weight: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            absolute_max_speed:           1.8,
            probability_dynamic_increase: 0.3,
            probability_dynamic_decrease: 0.2,
            dynamic_potential_weight:     0.5,
        }
    }
}
