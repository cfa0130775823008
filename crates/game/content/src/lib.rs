//! Data-driven combat content and loaders.
//!
//! This crate houses the static definitions the engine reads during battle:
//! - Ability definitions (data-driven via RON)
//! - Character and team templates (data-driven via RON)
//! - Missions and raid stages (data-driven via RON)
//! - Effect catalog overrides (data-driven via RON)
//! - Combat balance configuration (data-driven via TOML)
//!
//! Content is consumed by the runtime's definition store and never appears in
//! session state; sessions only carry ids and snapshots.

#[cfg(feature = "loaders")]
pub mod bundle;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use bundle::ContentBundle;
#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, CharacterLoader, ConfigLoader, ContentFactory, EffectLoader, LoadResult,
    MissionLoader, TeamLoader,
};

use std::path::PathBuf;

/// Directory of the content pack shipped with this crate.
pub fn default_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
