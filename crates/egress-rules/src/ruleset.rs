//! Ordered rule collections with primary and loop phases.

use crate::basic::{EvacuateRule, InitialPotentialRule, MovementRule, ReactionRule, SaveRule};
use crate::rule::EvacuationRule;
use crate::RuleSetError;

struct RuleEntry {
    rule:    Box<dyn EvacuationRule>,
    primary: bool,
    looped:  bool,
}

/// The rules of one run, in registration order.
///
/// Each rule belongs to the primary phase (run once per individual at
/// initialization), the loop phase (run once per individual per step), or
/// both.  At most one rule in the whole set may be the movement rule;
/// registering a second one is a construction error.
#[derive(Default)]
pub struct RuleSet {
    entries:  Vec<RuleEntry>,
    movement: Option<usize>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in evacuation behavior:
    ///
    /// | Phase   | Order                                          |
    /// |---------|------------------------------------------------|
    /// | primary | `InitialPotentialRule`                         |
    /// | loop    | `ReactionRule` → `MovementRule` → `SaveRule` → `EvacuateRule` |
    ///
    /// `SaveRule` must precede `EvacuateRule`: only individuals already
    /// marked safe are queued for removal, and both run after the movement
    /// rule so they observe the moved position.
    pub fn default_evacuation() -> Self {
        let mut set = Self::new();
        set.push(Box::new(InitialPotentialRule), true, false);
        set.push(Box::new(ReactionRule), false, true);
        set.push(Box::new(MovementRule), false, true);
        set.push(Box::new(SaveRule), false, true);
        set.push(Box::new(EvacuateRule), false, true);
        set
    }

    /// Add a rule to both phases.
    pub fn add(&mut self, rule: Box<dyn EvacuationRule>) -> Result<(), RuleSetError> {
        self.add_with_phases(rule, true, true)
    }

    /// Add a rule to the selected phases.  Fails if `rule` is a movement
    /// rule and the set already has one.
    pub fn add_with_phases(
        &mut self,
        rule:    Box<dyn EvacuationRule>,
        primary: bool,
        looped:  bool,
    ) -> Result<(), RuleSetError> {
        if rule.is_movement_rule() {
            if let Some(existing) = self.movement {
                return Err(RuleSetError::SecondMovementRule {
                    existing: self.entries[existing].rule.name(),
                    rejected: rule.name(),
                });
            }
        }
        self.push(rule, primary, looped);
        Ok(())
    }

    /// Append without the second-movement-rule check; the caller holds that
    /// invariant.
    fn push(&mut self, rule: Box<dyn EvacuationRule>, primary: bool, looped: bool) {
        if rule.is_movement_rule() {
            self.movement = Some(self.entries.len());
        }
        self.entries.push(RuleEntry { rule, primary, looped });
    }

    /// The movement rule, if one was registered.
    pub fn movement_rule(&self) -> Option<&dyn EvacuationRule> {
        self.movement.map(|i| self.entries[i].rule.as_ref())
    }

    /// Primary-phase rules in registration order.
    pub fn primary_rules(&self) -> impl Iterator<Item = &dyn EvacuationRule> {
        self.entries
            .iter()
            .filter(|e| e.primary)
            .map(|e| e.rule.as_ref())
    }

    /// Loop-phase rules in registration order.
    pub fn loop_rules(&self) -> impl Iterator<Item = &dyn EvacuationRule> {
        self.entries
            .iter()
            .filter(|e| e.looped)
            .map(|e| e.rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
