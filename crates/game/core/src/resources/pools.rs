//! Mana pool and power-point counters.

use crate::types::AbilityId;

/// Mana available to one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManaPool {
    pub current: u32,
    pub max: u32,
    /// Mana restored at the start of each of the owner's turns.
    pub regen: u32,
}

impl ManaPool {
    pub const fn new(current: u32, max: u32, regen: u32) -> Self {
        Self {
            current: if current > max { max } else { current },
            max,
            regen,
        }
    }

    /// Pool starting at its maximum.
    pub const fn full(max: u32, regen: u32) -> Self {
        Self::new(max, max, regen)
    }

    pub const fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Deducts `cost`. Returns false (and changes nothing) if unaffordable.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    /// Applies one turn of regeneration, capped at max. Returns mana restored.
    pub fn regenerate(&mut self) -> u32 {
        let restored = self.regen.min(self.max.saturating_sub(self.current));
        self.current += restored;
        restored
    }
}

/// Remaining uses of one power-point ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerPointEntry {
    pub ability: AbilityId,
    pub remaining: u8,
}

/// Per-combatant power-point counters.
///
/// Counters start at the ability's maximum the first time they are queried
/// and never regenerate during a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerPoints {
    entries: Vec<PowerPointEntry>,
}

impl PowerPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining uses, defaulting to `max` for abilities never used.
    pub fn remaining(&self, ability: AbilityId, max: u8) -> u8 {
        self.entries
            .iter()
            .find(|e| e.ability == ability)
            .map_or(max, |e| e.remaining)
    }

    /// Consumes one use. Returns false if none are left.
    pub fn consume(&mut self, ability: AbilityId, max: u8) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.ability == ability) {
            if entry.remaining == 0 {
                return false;
            }
            entry.remaining -= 1;
            return true;
        }
        if max == 0 {
            return false;
        }
        self.entries.push(PowerPointEntry {
            ability,
            remaining: max - 1,
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerPointEntry> {
        self.entries.iter()
    }
}
