//! Loaded and cross-checked content.

use std::collections::BTreeMap;

use raid_core::{
    AbilityOracle, AbilityTable, CharacterDefinition, CharacterId, CombatConfig, CombatEnv,
    EffectCatalog, MissionDefinition, MissionId, TeamDefinition, TeamId,
};

use crate::loaders::LoadResult;

/// Every definition the engine needs, keyed by id.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub effects: EffectCatalog,
    pub abilities: AbilityTable,
    pub characters: BTreeMap<CharacterId, CharacterDefinition>,
    pub teams: BTreeMap<TeamId, TeamDefinition>,
    pub missions: BTreeMap<MissionId, MissionDefinition>,
}

impl ContentBundle {
    pub fn character(&self, id: CharacterId) -> Option<&CharacterDefinition> {
        self.characters.get(&id)
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamDefinition> {
        self.teams.get(&id)
    }

    pub fn mission(&self, id: MissionId) -> Option<&MissionDefinition> {
        self.missions.get(&id)
    }

    /// Combat environment borrowing this bundle's tables.
    pub fn env(&self) -> CombatEnv<'_> {
        CombatEnv::new(&self.abilities, &self.effects, &self.config)
    }

    /// Checks every cross-reference between catalogs.
    pub fn validate(&self) -> LoadResult<()> {
        for ability in self.abilities.iter() {
            let Some(application) = &ability.effect else {
                continue;
            };
            if !self.effects.contains(&application.effect) {
                anyhow::bail!(
                    "Ability {} references unknown effect '{}'",
                    ability.id,
                    application.effect
                );
            }
        }

        for character in self.characters.values() {
            for ability in &character.abilities {
                if self.abilities.ability(*ability).is_none() {
                    anyhow::bail!(
                        "Character {} equips unknown ability {}",
                        character.id,
                        ability
                    );
                }
            }
            let slots = character.rarity.equip_slots();
            if character.abilities.len() > slots {
                anyhow::bail!(
                    "Character {} equips {} abilities but {} rarity allows {}",
                    character.id,
                    character.abilities.len(),
                    character.rarity,
                    slots
                );
            }
        }

        for team in self.teams.values() {
            if let Some(missing) = team
                .members
                .iter()
                .find(|id| !self.characters.contains_key(id))
            {
                anyhow::bail!("Team {} lists unknown character {}", team.id, missing);
            }
        }

        for mission in self.missions.values() {
            if let Some(missing) = mission
                .enemies
                .iter()
                .find(|id| !self.characters.contains_key(id))
            {
                anyhow::bail!("Mission {} fields unknown character {}", mission.id, missing);
            }
        }

        Ok(())
    }
}
