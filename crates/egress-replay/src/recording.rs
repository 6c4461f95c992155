//! The finished recording: frozen configuration plus time-indexed log.

use egress_core::Step;

use crate::action::Action;
use crate::config::InitialConfiguration;

/// A replay-ready run: the initial configuration and one action bucket per
/// step (bucket 0 holds initialization actions).
#[derive(Clone, Debug)]
pub struct Recording {
    initial: InitialConfiguration,
    actions: Vec<Vec<Action>>,
}

impl Recording {
    pub(crate) fn new(initial: InitialConfiguration, actions: Vec<Vec<Action>>) -> Self {
        Self { initial, actions }
    }

    #[inline]
    pub fn initial(&self) -> &InitialConfiguration {
        &self.initial
    }

    /// Number of recorded time buckets.
    pub fn step_count(&self) -> usize {
        self.actions.len()
    }

    /// Actions of one step, in emission order.
    pub fn actions_at(&self, step: Step) -> &[Action] {
        self.actions
            .get(step.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of recorded actions.
    pub fn action_count(&self) -> usize {
        self.actions.iter().map(Vec::len).sum()
    }

    /// All actions flattened in time order, tagged with their step.
    pub fn iter(&self) -> impl Iterator<Item = (Step, &Action)> {
        self.actions
            .iter()
            .enumerate()
            .flat_map(|(step, bucket)| bucket.iter().map(move |a| (Step(step as u64), a)))
    }
}
