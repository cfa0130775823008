//! Ability catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use raid_core::{Ability, AbilityTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<Ability>,
}

/// Loader for ability definitions from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability catalog from a RON file.
    ///
    /// Ids must be unique and may not use the reserved basic-attack id.
    pub fn load(path: &Path) -> LoadResult<AbilityTable> {
        let catalog: AbilityCatalog = read_ron(path, "ability catalog")?;
        Self::build(catalog.abilities)
    }

    pub fn build(abilities: Vec<Ability>) -> LoadResult<AbilityTable> {
        let mut seen = BTreeSet::new();
        for ability in &abilities {
            if ability.id == Ability::BASIC_ATTACK {
                anyhow::bail!(
                    "Ability '{}' uses the reserved basic attack id {}",
                    ability.name,
                    ability.id
                );
            }
            if !seen.insert(ability.id) {
                anyhow::bail!("Duplicate ability id {}", ability.id);
            }
            if !(0.0..=100.0).contains(&ability.accuracy) {
                anyhow::bail!(
                    "Ability {} accuracy {} is outside 0..=100",
                    ability.id,
                    ability.accuracy
                );
            }
        }
        Ok(abilities.into_iter().collect())
    }
}
