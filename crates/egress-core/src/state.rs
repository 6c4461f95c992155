//! Automaton lifecycle states.

/// Lifecycle of an evacuation run.
///
/// Transitions are strictly forward: `Ready → Running → Finished`.  The
/// engine enforces them; the recorder logs each transition as an action so
/// replays can reconstruct the lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutomatonState {
    /// Structure may be edited, individuals added.  No stepping yet.
    #[default]
    Ready,
    /// Stepping in progress; structural edits are rejected.
    Running,
    /// Run complete.  Only `reset` leaves this state.
    Finished,
}

impl AutomatonState {
    pub fn as_str(self) -> &'static str {
        match self {
            AutomatonState::Ready    => "ready",
            AutomatonState::Running  => "running",
            AutomatonState::Finished => "finished",
        }
    }
}

impl std::fmt::Display for AutomatonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
