//! Content factory for building a bundle from a data directory.

use std::path::{Path, PathBuf};

use raid_core::{CombatConfig, EffectCatalog};

use crate::bundle::ContentBundle;
use crate::loaders::{
    AbilityLoader, CharacterLoader, ConfigLoader, EffectLoader, LoadResult, MissionLoader,
    TeamLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional, defaults otherwise)
/// ├── effects.ron      (optional, overrides the builtin catalog)
/// ├── abilities.ron
/// ├── characters.ron
/// ├── teams.ron
/// └── missions.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(CombatConfig::default())
        }
    }

    /// Builtin effect catalog plus `effects.ron` overrides when present.
    pub fn load_effects(&self) -> LoadResult<EffectCatalog> {
        let path = self.data_dir.join("effects.ron");
        if path.exists() {
            EffectLoader::catalog(&path)
        } else {
            Ok(EffectCatalog::builtin())
        }
    }

    /// Loads every catalog and cross-checks references between them.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            effects: self.load_effects()?,
            abilities: AbilityLoader::load(&self.data_dir.join("abilities.ron"))?,
            characters: CharacterLoader::load(&self.data_dir.join("characters.ron"))?,
            teams: TeamLoader::load(&self.data_dir.join("teams.ron"))?,
            missions: MissionLoader::load(&self.data_dir.join("missions.ron"))?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
