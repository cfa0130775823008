//! Content loaders for reading combat data from files.
//!
//! Every loader reads one file and returns plain `raid-core` types; the
//! [`ContentFactory`] ties them to a data directory and cross-checks the
//! result into a [`crate::ContentBundle`].

pub mod abilities;
pub mod characters;
pub mod config;
pub mod effects;
pub mod factory;
pub mod missions;

pub use abilities::AbilityLoader;
pub use characters::{CharacterLoader, TeamLoader};
pub use config::ConfigLoader;
pub use effects::EffectLoader;
pub use factory::ContentFactory;
pub use missions::MissionLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses a RON file; `what` names the catalog in error messages.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content).map_err(|e| {
        anyhow::anyhow!("Failed to parse {} RON at {}: {}", what, path.display(), e)
    })
}
