//! Read-only definitions the engine consults while resolving turns.
//!
//! Character, team and mission definitions are plain data handed to the
//! engine at session start. Abilities are looked up by id on every turn
//! through [`AbilityOracle`]; the [`CombatEnv`] aggregate bundles that oracle
//! with the effect catalog and balance config so the engine needs no
//! knowledge of where definitions come from.
mod definitions;

pub use definitions::{CharacterDefinition, MissionDefinition, TeamDefinition};

use std::collections::BTreeMap;

use crate::ability::Ability;
use crate::config::CombatConfig;
use crate::effects::EffectCatalog;
use crate::types::AbilityId;

/// Read-only ability lookup.
pub trait AbilityOracle {
    fn ability(&self, id: AbilityId) -> Option<&Ability>;
}

/// In-memory ability table keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbilityTable {
    abilities: BTreeMap<AbilityId, Ability>,
}

impl AbilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an ability. Returns the previous definition.
    pub fn insert(&mut self, ability: Ability) -> Option<Ability> {
        self.abilities.insert(ability.id, ability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl AbilityOracle for AbilityTable {
    fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.get(&id)
    }
}

impl FromIterator<Ability> for AbilityTable {
    fn from_iter<T: IntoIterator<Item = Ability>>(iter: T) -> Self {
        Self {
            abilities: iter.into_iter().map(|a| (a.id, a)).collect(),
        }
    }
}

/// Everything the engine reads while resolving a session.
#[derive(Clone)]
pub struct CombatEnv<'a> {
    abilities: &'a dyn AbilityOracle,
    effects: &'a EffectCatalog,
    config: &'a CombatConfig,
    basic_attack: Ability,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        abilities: &'a dyn AbilityOracle,
        effects: &'a EffectCatalog,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            abilities,
            effects,
            config,
            basic_attack: Ability::basic_attack(config.basic_attack_power),
        }
    }

    /// Looks up an ability; [`Ability::BASIC_ATTACK`] always resolves.
    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        if id == Ability::BASIC_ATTACK {
            Some(&self.basic_attack)
        } else {
            self.abilities.ability(id)
        }
    }

    pub fn basic_attack(&self) -> &Ability {
        &self.basic_attack
    }

    pub fn effects(&self) -> &'a EffectCatalog {
        self.effects
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("effects", &self.effects.len())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
