//! Population storage: the individual arena plus status index lists.
//!
//! The arena is append-only during a run; individuals never leave it.  Status
//! changes move ids between the `active`, `evacuated`, and `dead` index lists
//! so the engine can iterate the live population without scanning terminal
//! individuals.  `not_safe` counts active individuals that have not reached a
//! safe area yet — the run-termination predicate reads it every step.

use egress_core::{AssignmentId, CellId, IndividualId, PotentialId, Step};

use crate::individual::{DeathCause, Individual, IndividualBuilder, IndividualStatus};
use crate::{AgentError, AgentResult};

/// All individuals of one run.
#[derive(Clone, Debug, Default)]
pub struct Population {
    individuals: Vec<Individual>,
    active:      Vec<IndividualId>,
    evacuated:   Vec<IndividualId>,
    dead:        Vec<IndividualId>,
    /// Safe individuals queued for batch evacuation at the end of the step.
    marked:      Vec<IndividualId>,
    /// Active individuals that are not yet safe.
    not_safe:    usize,
    /// Assignment-type names; `AssignmentId` indexes this list.
    assignments: Vec<String>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Assignment types ──────────────────────────────────────────────────

    /// Register an assignment-type name and return its tag.
    pub fn register_assignment(&mut self, name: impl Into<String>) -> AssignmentId {
        let id = AssignmentId(self.assignments.len() as u16);
        self.assignments.push(name.into());
        id
    }

    pub fn assignment_name(&self, assignment: AssignmentId) -> Option<&str> {
        self.assignments.get(assignment.index()).map(String::as_str)
    }

    // ── Adding individuals ────────────────────────────────────────────────

    /// Build an individual from `builder` on `cell` and add it with the next
    /// free id.
    pub fn add(&mut self, builder: &IndividualBuilder, cell: CellId) -> AgentResult<IndividualId> {
        let id = IndividualId(self.individuals.len() as u32);
        let individual = builder.build(id, cell)?;
        self.individuals.push(individual);
        self.active.push(id);
        self.not_safe += 1;
        Ok(id)
    }

    /// Insert a fully built individual under its own id (replay path).
    ///
    /// Ids must arrive densely: the individual's id has to be the next free
    /// arena slot.  A taken id is a duplicate; a gap is rejected too.
    pub fn insert_with_id(&mut self, individual: Individual) -> AgentResult<()> {
        let id = individual.id();
        if id.index() < self.individuals.len() {
            return Err(AgentError::DuplicateIndividual(id));
        }
        if id.index() > self.individuals.len() {
            return Err(AgentError::NonContiguousId(id));
        }
        let active = !matches!(
            individual.status(),
            IndividualStatus::Dead | IndividualStatus::Evacuated
        );
        if active && !individual.is_safe() {
            self.not_safe += 1;
        }
        match individual.status() {
            IndividualStatus::Dead      => self.dead.push(id),
            IndividualStatus::Evacuated => self.evacuated.push(id),
            _                           => self.active.push(id),
        }
        self.individuals.push(individual);
        Ok(())
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn get(&self, id: IndividualId) -> AgentResult<&Individual> {
        self.individuals
            .get(id.index())
            .ok_or(AgentError::IndividualNotFound(id))
    }

    pub fn get_mut(&mut self, id: IndividualId) -> AgentResult<&mut Individual> {
        self.individuals
            .get_mut(id.index())
            .ok_or(AgentError::IndividualNotFound(id))
    }

    /// Ids of individuals still in the simulation (including safe ones not
    /// yet flushed), in add order.
    #[inline]
    pub fn active(&self) -> &[IndividualId] {
        &self.active
    }

    #[inline]
    pub fn evacuated(&self) -> &[IndividualId] {
        &self.evacuated
    }

    #[inline]
    pub fn dead(&self) -> &[IndividualId] {
        &self.dead
    }

    /// `true` while the individual is neither dead nor evacuated.
    pub fn is_active(&self, id: IndividualId) -> bool {
        self.individuals.get(id.index()).is_some_and(|i| {
            !matches!(i.status(), IndividualStatus::Dead | IndividualStatus::Evacuated)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    // ── Counts ────────────────────────────────────────────────────────────

    /// Total individuals ever added.
    #[inline]
    pub fn initial_count(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn evacuated_count(&self) -> usize {
        self.evacuated.len()
    }

    #[inline]
    pub fn dead_count(&self) -> usize {
        self.dead.len()
    }

    /// Active individuals that have not reached a safe area.  Zero means the
    /// run may finish as soon as all crossings flush.
    #[inline]
    pub fn not_safe_count(&self) -> usize {
        self.not_safe
    }

    // ── Status transitions ────────────────────────────────────────────────

    /// Alarm one individual (starts evacuating).
    pub fn set_alarmed(&mut self, id: IndividualId) -> AgentResult<()> {
        self.get_mut(id)?.promote(IndividualStatus::Alarmed)
    }

    /// Mark an individual safe at `step`.
    pub fn set_safe(&mut self, id: IndividualId, step: Step) -> AgentResult<()> {
        let individual = self.get_mut(id)?;
        individual.promote(IndividualStatus::Safe)?;
        individual.set_safety_time(step);
        self.not_safe -= 1;
        Ok(())
    }

    /// Kill an individual.  It leaves the active list immediately; the caller
    /// clears its grid cell.
    pub fn set_dead(&mut self, id: IndividualId, cause: DeathCause) -> AgentResult<()> {
        let individual = self.get_mut(id)?;
        individual.promote(IndividualStatus::Dead)?;
        individual.set_death_cause(cause);
        // The lattice guarantees the individual was not safe.
        self.not_safe -= 1;
        self.active.retain(|&i| i != id);
        self.dead.push(id);
        Ok(())
    }

    /// Queue a safe individual for batch evacuation.  Marking twice is a
    /// no-op.
    pub fn mark_for_removal(&mut self, id: IndividualId) -> AgentResult<()> {
        let individual = self.get(id)?;
        if individual.status() != IndividualStatus::Safe {
            return Err(AgentError::InvalidTransition {
                from: individual.status(),
                to:   IndividualStatus::Evacuated,
            });
        }
        if !self.marked.contains(&id) {
            self.marked.push(id);
        }
        Ok(())
    }

    /// Evacuate every marked individual in one batch; returns the ids in
    /// marking order so the caller can clear their cells and record exits.
    pub fn remove_marked(&mut self) -> AgentResult<Vec<IndividualId>> {
        let marked = std::mem::take(&mut self.marked);
        for &id in &marked {
            self.get_mut(id)?.promote(IndividualStatus::Evacuated)?;
            self.active.retain(|&i| i != id);
            self.evacuated.push(id);
        }
        Ok(marked)
    }

    // ── Plain attribute updates ───────────────────────────────────────────

    pub fn assign_potential(&mut self, id: IndividualId, potential: PotentialId) -> AgentResult<()> {
        self.get_mut(id)?.set_potential(Some(potential));
        Ok(())
    }
}
