//! Mutable per-battle combatant state.

use crate::effects::StatusEffects;
use crate::env::CharacterDefinition;
use crate::resources::{Cooldowns, EquippedAbilities, ManaPool, PowerPoints};
use crate::scheduler::TurnQueueEntry;
use crate::types::{
    CharacterClass, CharacterId, CombatantId, Controller, Element, Rarity, Side, StatKind,
};

/// One fighter inside a session.
///
/// Built from a [`CharacterDefinition`] at session start and mutated every
/// turn. `attack`, `defense` and `speed` are post-equipment values; status
/// effects are applied on top at resolution time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub controller: Controller,
    pub character: CharacterId,
    pub level: u32,
    pub class: CharacterClass,
    pub element: Element,
    pub rarity: Rarity,

    pub hp: u32,
    pub max_hp: u32,
    pub mana: ManaPool,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub priority: i32,
    pub fainted: bool,

    pub effects: StatusEffects,
    pub cooldowns: Cooldowns,
    pub equipped: EquippedAbilities,
    pub power_points: PowerPoints,
}

impl CombatantSnapshot {
    /// Fresh snapshot at full HP and mana with nothing equipped.
    pub fn from_definition(
        id: CombatantId,
        side: Side,
        controller: Controller,
        definition: &CharacterDefinition,
    ) -> Self {
        Self {
            id,
            name: definition.name.clone(),
            side,
            controller,
            character: definition.id,
            level: definition.level,
            class: definition.class,
            element: definition.element,
            rarity: definition.rarity,
            hp: definition.max_hp,
            max_hp: definition.max_hp,
            mana: ManaPool::full(definition.max_mana, definition.mana_regen),
            attack: definition.attack,
            defense: definition.defense,
            speed: definition.speed,
            priority: definition.priority,
            fainted: definition.max_hp == 0,
            effects: StatusEffects::empty(),
            cooldowns: Cooldowns::new(),
            equipped: EquippedAbilities::for_rarity(definition.rarity),
            power_points: PowerPoints::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted
    }

    /// Current HP as a fraction of max (0 when max is 0).
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    /// Removes up to `amount` HP, flooring at zero and marking the faint.
    ///
    /// Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if self.hp == 0 {
            self.fainted = true;
        }
        lost
    }

    /// Speed after speed-modifying effects, used when the queue is rebuilt.
    pub fn effective_speed(&self) -> u32 {
        (f64::from(self.speed) * self.effects.modifier(StatKind::Speed)).round() as u32
    }

    pub fn queue_entry(&self) -> TurnQueueEntry {
        TurnQueueEntry {
            actor: self.id,
            side: self.side,
            speed: self.effective_speed(),
            priority: self.priority,
        }
    }
}
