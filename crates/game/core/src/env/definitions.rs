//! Character, team and mission definitions.

use crate::session::RewardTable;
use crate::types::{
    AbilityId, CharacterClass, CharacterId, Element, MissionId, Rarity, TeamId, UserId,
};

/// Persisted character template a combatant snapshot is built from.
///
/// Stats are final values after equipment; effects apply on top in battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterDefinition {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    pub level: u32,
    pub max_hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_mana: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_regen: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    /// Scheduler priority; higher acts first regardless of speed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
    /// Abilities equipped at session start, validated against rarity slots.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
}

/// Ordered group of characters a user brings into battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamDefinition {
    pub id: TeamId,
    pub owner: UserId,
    pub name: String,
    pub members: Vec<CharacterId>,
}

impl TeamDefinition {
    pub const MAX_MEMBERS: usize = 5;
}

/// PvE encounter or raid stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionDefinition {
    pub id: MissionId,
    pub name: String,
    /// Campaign island this mission belongs to.
    pub island: u32,
    /// Position on the island; campaign progress only moves forward.
    pub sequence: u32,
    pub enemies: Vec<CharacterId>,
    /// Base reward before the performance multiplier.
    pub reward: RewardTable,
}
