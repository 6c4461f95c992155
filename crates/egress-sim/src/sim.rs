//! The evacuation state machine and step scheduler.

use egress_agent::{DeathCause, IndividualBuilder, Population};
use egress_core::{AutomatonState, CellId, IndividualId, SimRng, Step, StepTiming};
use egress_grid::{Building, GridError};
use egress_potential::PotentialSet;
use egress_replay::{InitialConfiguration, Recording};
use egress_rules::{EvacuationState, RuleSet};

use crate::config::SimulationConfig;
use crate::observer::{SimulationObserver, StepReport};
use crate::runtime::EvacuationRuntime;
use crate::{SimResult, SimulationError};

/// Outcome of one completed run.
#[derive(Copy, Clone, Debug)]
pub struct SimulationResult {
    /// Steps executed.
    pub steps:     Step,
    pub evacuated: usize,
    pub dead:      usize,
}

/// One evacuation run: grid, population, potentials, rules, and the
/// `Ready → Running → Finished` lifecycle around them.
///
/// Structure is assembled through [`SimulationBuilder`](crate::SimulationBuilder)
/// while `Ready`; [`initialize`](Self::initialize) starts the run;
/// [`step`](Self::step) executes one step; [`run`](Self::run) drives the
/// whole loop.  Every lifecycle transition is recorded as a
/// `StateChanged` action when recording is active.
pub struct EvacuationSimulation {
    runtime: EvacuationRuntime,
    rules:   RuleSet,
    config:  SimulationConfig,
    state:   AutomatonState,
}

impl EvacuationSimulation {
    pub(crate) fn new(
        building:   Building,
        potentials: PotentialSet,
        rules:      RuleSet,
        config:     SimulationConfig,
        timing:     StepTiming,
    ) -> Self {
        let runtime = EvacuationRuntime::new(
            building,
            potentials,
            config.parameters.clone(),
            timing,
            config.seed,
        );
        Self {
            runtime,
            rules,
            config,
            state: AutomatonState::Ready,
        }
    }

    /// Rebuild a simulation from a recording's frozen starting point, with
    /// fresh rules and configuration.  This is the replay entry point: apply
    /// the recorded actions step by step, or re-run with different rules.
    pub fn from_initial_configuration(
        initial:    InitialConfiguration,
        rules:      RuleSet,
        mut config: SimulationConfig,
    ) -> SimResult<Self> {
        config.parameters.absolute_max_speed = initial.absolute_max_speed;
        let timing = StepTiming::new(initial.absolute_max_speed)?;
        let mut sim = Self::new(initial.building, initial.potentials, rules, config, timing);
        sim.runtime.population = initial.population;
        Ok(sim)
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> AutomatonState {
        self.state
    }

    #[inline]
    pub fn building(&self) -> &Building {
        &self.runtime.building
    }

    #[inline]
    pub fn population(&self) -> &Population {
        &self.runtime.population
    }

    #[inline]
    pub fn potentials(&self) -> &PotentialSet {
        &self.runtime.potentials
    }

    #[inline]
    pub fn timing(&self) -> StepTiming {
        self.runtime.timing
    }

    /// The step currently reached (0 before the first step).
    #[inline]
    pub fn current_step(&self) -> Step {
        self.runtime.step
    }

    /// Fractional step the run must pass before it may finish.
    #[inline]
    pub fn needed_time(&self) -> f64 {
        self.runtime.needed_time
    }

    /// Run progress in `[0, 1]`: the larger of the step fraction and the
    /// resolved (evacuated or dead) population fraction.
    pub fn progress(&self) -> f64 {
        let population = &self.runtime.population;
        let step_fraction = self.runtime.step.as_f64() / self.config.step_limit as f64;
        let resolved_fraction = if population.initial_count() == 0 {
            0.0
        } else {
            (population.evacuated_count() + population.dead_count()) as f64
                / population.initial_count() as f64
        };
        step_fraction.max(resolved_fraction).min(1.0)
    }

    fn require(&self, required: AutomatonState) -> SimResult<()> {
        if self.state != required {
            return Err(SimulationError::IllegalState { required, actual: self.state });
        }
        Ok(())
    }

    // ── Population setup (Ready only) ─────────────────────────────────────

    /// Build an individual from `builder`, place it on the empty cell
    /// `cell`, and assign the minimum reachable exit potential if one
    /// exists.  An unreachable individual stays unassigned; the initial
    /// potential rule resolves it at initialization.
    pub fn add_individual(
        &mut self,
        builder: &IndividualBuilder,
        cell:    CellId,
    ) -> SimResult<IndividualId> {
        self.require(AutomatonState::Ready)?;
        if self.runtime.building.cell(cell)?.is_occupied() {
            return Err(GridError::CellOccupied(cell).into());
        }
        let id = self.runtime.population.add(builder, cell)?;
        self.runtime.building.place_individual(cell, id)?;
        if let Some((potential, _)) = self.runtime.potentials.min_potential_for(cell) {
            self.runtime.population.assign_potential(id, potential)?;
        }
        Ok(id)
    }

    // ── Recording ─────────────────────────────────────────────────────────

    /// Freeze the current state as the recording's starting point and begin
    /// recording.  Must happen while `Ready`, after the population is
    /// placed, so the snapshot covers every individual.
    pub fn start_recording(&mut self) -> SimResult<()> {
        self.require(AutomatonState::Ready)?;
        self.runtime.recorder.set_initial_configuration(
            &self.runtime.building,
            &self.runtime.population,
            &self.runtime.potentials,
            self.runtime.timing.absolute_max_speed(),
        )?;
        self.runtime.recorder.start()?;
        Ok(())
    }

    pub fn stop_recording(&mut self) {
        self.runtime.recorder.stop();
    }

    /// The recording so far.  Fails if recording was never started.
    pub fn recording(&self) -> SimResult<Recording> {
        Ok(self.runtime.recorder.recording()?)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start the run: transition to `Running` and apply every primary rule
    /// to every individual, in registration order, then flush the batch of
    /// marked individuals.  Initialization actions fill the recording's
    /// bucket 0.
    pub fn initialize(&mut self) -> SimResult<()> {
        self.require(AutomatonState::Ready)?;
        self.state = AutomatonState::Running;
        self.runtime.record_state_change(AutomatonState::Running)?;

        let ids: Vec<IndividualId> = self.runtime.population.active().to_vec();
        for id in ids {
            for rule in self.rules.primary_rules() {
                if !self.runtime.population.is_active(id) {
                    break;
                }
                let cell = self.runtime.population.get(id)?.cell();
                rule.execute(cell, &mut self.runtime)?;
            }
        }
        self.runtime.evacuate_marked()?;
        self.runtime.recorder.next_step();
        Ok(())
    }

    /// Execute one step: arrange the individuals per the configured
    /// iteration order, apply every loop rule to each (re-reading the
    /// current cell before each rule, since an earlier rule may have moved
    /// the individual), flush the evacuation batch, and update the dynamic
    /// potential.
    pub fn step(&mut self) -> SimResult<StepReport> {
        self.require(AutomatonState::Running)?;
        self.runtime.step = self.runtime.step + 1;

        let mut ids: Vec<IndividualId> = self.runtime.population.active().to_vec();
        self.config.order.arrange(
            &mut ids,
            &self.runtime.population,
            &self.runtime.potentials,
            &mut self.runtime.rng,
        );

        for id in ids {
            for rule in self.rules.loop_rules() {
                if !self.runtime.population.is_active(id) {
                    break;
                }
                let cell = self.runtime.population.get(id)?.cell();
                rule.execute(cell, &mut self.runtime)?;
            }
        }
        self.runtime.evacuate_marked()?;
        self.runtime.update_dynamic()?;
        self.runtime.recorder.next_step();
        Ok(self.report())
    }

    fn report(&self) -> StepReport {
        let population = &self.runtime.population;
        StepReport {
            active:    population.active_count(),
            evacuated: population.evacuated_count(),
            dead:      population.dead_count(),
            progress:  self.progress(),
        }
    }

    /// `true` once the run may stop: the step limit is reached, or everyone
    /// is resolved and every scheduled crossing has finished.
    pub fn is_finished(&self) -> bool {
        self.runtime.step.0 >= self.config.step_limit
            || (self.runtime.population.not_safe_count() == 0
                && self.runtime.step.as_f64() > self.runtime.needed_time)
    }

    /// End the run: every individual that is not safe dies of
    /// `NotEnoughTime`, the automaton transitions to `Finished`, and the
    /// outcome is summarized.
    pub fn terminate(&mut self) -> SimResult<SimulationResult> {
        self.require(AutomatonState::Running)?;

        let ids: Vec<IndividualId> = self.runtime.population.active().to_vec();
        for id in ids {
            if !self.runtime.population.get(id)?.is_safe() {
                self.runtime.set_dead(id, DeathCause::NotEnoughTime)?;
            }
        }
        self.runtime.record_state_change(AutomatonState::Finished)?;
        self.state = AutomatonState::Finished;
        Ok(SimulationResult {
            steps:     self.runtime.step,
            evacuated: self.runtime.population.evacuated_count(),
            dead:      self.runtime.population.dead_count(),
        })
    }

    /// Drive the whole run: initialize if still `Ready`, step until
    /// [`is_finished`](Self::is_finished), then terminate.  Hosts that need
    /// finer control call [`step`](Self::step) themselves.
    pub fn run(&mut self, observer: &mut dyn SimulationObserver) -> SimResult<SimulationResult> {
        if self.state == AutomatonState::Ready {
            self.initialize()?;
        }
        self.require(AutomatonState::Running)?;

        while !self.is_finished() {
            let step = self.runtime.step + 1;
            observer.on_step_start(step);
            let report = self.step()?;
            observer.on_step_end(
                self.runtime.step,
                &report,
                &self.runtime.building,
                &self.runtime.population,
            );
        }
        let result = self.terminate()?;
        observer.on_finished(&result);
        Ok(result)
    }

    /// Return to `Ready`: the building structure, potentials, rules, and
    /// configuration stay; individuals, locks, alarms, the dynamic field,
    /// the recorder, and the RNG stream are discarded.
    pub fn reset(&mut self) -> SimResult<()> {
        let cells: Vec<CellId> = self.runtime.building.cell_ids().collect();
        for cell in cells {
            if self.runtime.building.cell(cell)?.is_occupied() {
                self.runtime.building.clear_occupant(cell)?;
            }
            self.runtime.building.lock_cell(cell, 0.0)?;
        }
        let rooms: Vec<_> = self.runtime.building.rooms().map(|r| r.id()).collect();
        for room in rooms {
            self.runtime.building.set_room_alarmed(room, false)?;
        }
        self.runtime.population = Population::new();
        *self.runtime.potentials.dynamic_mut() = Default::default();
        self.runtime.recorder.reset();
        self.runtime.rng = SimRng::new(self.config.seed);
        self.runtime.step = Step::ZERO;
        self.runtime.needed_time = 0.0;
        self.state = AutomatonState::Ready;
        Ok(())
    }
}
