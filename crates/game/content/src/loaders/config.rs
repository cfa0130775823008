//! Combat configuration loader.

use std::path::Path;

use raid_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat balance configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Omitted keys keep their [`CombatConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.grades.is_empty() {
            anyhow::bail!("Config must define at least one grade bucket");
        }
        if !(0.0..1.0).contains(&config.variance) {
            anyhow::bail!("Config variance must be in [0, 1), got {}", config.variance);
        }

        Ok(config)
    }
}
