//! Ability cooldown timers.

use crate::types::AbilityId;

/// Turns left before an ability can be used again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownEntry {
    pub ability: AbilityId,
    pub turns_remaining: u32,
}

/// Cooldowns owned by one combatant.
///
/// Entries only exist while `turns_remaining > 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    entries: Vec<CooldownEntry>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a cooldown. A length of zero clears it.
    pub fn start(&mut self, ability: AbilityId, turns: u32) {
        self.entries.retain(|e| e.ability != ability);
        if turns > 0 {
            self.entries.push(CooldownEntry {
                ability,
                turns_remaining: turns,
            });
        }
    }

    pub fn remaining(&self, ability: AbilityId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.ability == ability)
            .map_or(0, |e| e.turns_remaining)
    }

    pub fn is_ready(&self, ability: AbilityId) -> bool {
        self.remaining(ability) == 0
    }

    /// Decrements every entry by one (floor 0) and drops finished ones.
    ///
    /// Returns the abilities that became ready.
    pub fn tick(&mut self) -> Vec<AbilityId> {
        for entry in self.entries.iter_mut() {
            entry.turns_remaining = entry.turns_remaining.saturating_sub(1);
        }
        let ready = self
            .entries
            .iter()
            .filter(|e| e.turns_remaining == 0)
            .map(|e| e.ability)
            .collect();
        self.entries.retain(|e| e.turns_remaining > 0);
        ready
    }

    pub fn iter(&self) -> impl Iterator<Item = &CooldownEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrements_by_exactly_one_per_tick() {
        let mut cooldowns = Cooldowns::new();
        let id = AbilityId(3);
        cooldowns.start(id, 3);

        for expected in [2, 1] {
            assert!(cooldowns.tick().is_empty());
            assert_eq!(cooldowns.remaining(id), expected);
        }
        assert_eq!(cooldowns.tick(), vec![id]);
        assert_eq!(cooldowns.remaining(id), 0);
        assert!(cooldowns.is_empty());

        // Never below zero, never resurrected.
        assert!(cooldowns.tick().is_empty());
        assert_eq!(cooldowns.remaining(id), 0);
    }

    #[test]
    fn zero_length_cooldown_leaves_no_entry() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(AbilityId(1), 0);
        assert!(cooldowns.is_empty());
        assert!(cooldowns.is_ready(AbilityId(1)));
    }

    #[test]
    fn restart_replaces_existing_entry() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(AbilityId(1), 2);
        cooldowns.start(AbilityId(1), 5);
        assert_eq!(cooldowns.iter().count(), 1);
        assert_eq!(cooldowns.remaining(AbilityId(1)), 5);
    }
}
