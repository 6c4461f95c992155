//! Host-side run observation.

use egress_agent::Population;
use egress_core::Step;
use egress_grid::Building;

use crate::sim::SimulationResult;

/// Per-step population summary handed to observers.
#[derive(Copy, Clone, Debug)]
pub struct StepReport {
    /// Individuals still in the simulation (safe-but-unflushed included).
    pub active:    usize,
    pub evacuated: usize,
    pub dead:      usize,
    /// Run progress in `[0, 1]`; see
    /// [`EvacuationSimulation::progress`](crate::EvacuationSimulation::progress).
    pub progress:  f64,
}

/// Callbacks around the run loop.  All methods default to no-ops, so an
/// observer implements only what it cares about.
pub trait SimulationObserver {
    /// Called before the step's rules run.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called after the step completed, with read access to the grid and
    /// population for rendering or statistics.
    fn on_step_end(
        &mut self,
        _step:       Step,
        _report:     &StepReport,
        _building:   &Building,
        _population: &Population,
    ) {
    }

    /// Called once after the run terminated.
    fn on_finished(&mut self, _result: &SimulationResult) {}
}

/// Observes nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}
