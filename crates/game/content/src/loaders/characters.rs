//! Character and team catalog loaders.

use std::collections::BTreeMap;
use std::path::Path;

use raid_core::{CharacterDefinition, CharacterId, TeamDefinition, TeamId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Character catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterCatalog {
    pub characters: Vec<CharacterDefinition>,
}

/// Team catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCatalog {
    pub teams: Vec<TeamDefinition>,
}

/// Loader for character templates (both heroes and enemies).
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<CharacterId, CharacterDefinition>> {
        let catalog: CharacterCatalog = read_ron(path, "character catalog")?;

        let mut characters = BTreeMap::new();
        for character in catalog.characters {
            if character.max_hp == 0 {
                anyhow::bail!("Character {} ('{}') has no HP", character.id, character.name);
            }
            let id = character.id;
            if characters.insert(id, character).is_some() {
                anyhow::bail!("Duplicate character id {}", id);
            }
        }
        Ok(characters)
    }
}

/// Loader for team compositions.
pub struct TeamLoader;

impl TeamLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<TeamId, TeamDefinition>> {
        let catalog: TeamCatalog = read_ron(path, "team catalog")?;

        let mut teams = BTreeMap::new();
        for team in catalog.teams {
            if team.members.is_empty() || team.members.len() > TeamDefinition::MAX_MEMBERS {
                anyhow::bail!(
                    "Team {} must have 1..={} members, has {}",
                    team.id,
                    TeamDefinition::MAX_MEMBERS,
                    team.members.len()
                );
            }
            let id = team.id;
            if teams.insert(id, team).is_some() {
                anyhow::bail!("Duplicate team id {}", id);
            }
        }
        Ok(teams)
    }
}
