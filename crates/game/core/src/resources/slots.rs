//! Equipped-ability slots.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::types::{AbilityId, Rarity};

/// Abilities a combatant has equipped, bounded by its rarity tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedAbilities {
    slots: ArrayVec<AbilityId, { CombatConfig::MAX_EQUIP_SLOTS }>,
    capacity: u8,
}

impl EquippedAbilities {
    pub fn for_rarity(rarity: Rarity) -> Self {
        Self {
            slots: ArrayVec::new(),
            capacity: rarity.equip_slots().min(CombatConfig::MAX_EQUIP_SLOTS) as u8,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity()
    }

    pub fn contains(&self, ability: AbilityId) -> bool {
        self.slots.contains(&ability)
    }

    pub fn iter(&self) -> impl Iterator<Item = AbilityId> + '_ {
        self.slots.iter().copied()
    }

    /// Appends `ability` if there is room and it is not already equipped.
    pub(crate) fn push(&mut self, ability: AbilityId) -> bool {
        if self.is_full() || self.contains(ability) {
            return false;
        }
        self.slots.try_push(ability).is_ok()
    }

    /// Replaces `old` in place with `new`. Returns false if `old` is absent.
    pub(crate) fn replace(&mut self, old: AbilityId, new: AbilityId) -> bool {
        match self.slots.iter_mut().find(|slot| **slot == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, ability: AbilityId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| *slot != ability);
        before != self.slots.len()
    }
}
