//! Effect catalog overrides.

use std::path::Path;

use raid_core::{EffectCatalog, EffectDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Effect override structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectOverrides {
    pub effects: Vec<EffectDefinition>,
}

/// Loader for effect definitions layered over the builtin catalog.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EffectDefinition>> {
        let overrides: EffectOverrides = read_ron(path, "effect overrides")?;
        for effect in &overrides.effects {
            if effect.name.is_empty() {
                anyhow::bail!("Effect definitions need a name");
            }
            if effect.duration == 0 {
                anyhow::bail!("Effect '{}' has zero duration", effect.name);
            }
        }
        Ok(overrides.effects)
    }

    /// Builtin catalog with the file's definitions replacing or adding entries.
    pub fn catalog(path: &Path) -> LoadResult<EffectCatalog> {
        let mut catalog = EffectCatalog::builtin();
        for effect in Self::load(path)? {
            catalog.insert(effect);
        }
        Ok(catalog)
    }
}
