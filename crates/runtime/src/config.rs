//! Runtime configuration.

use std::env;

use raid_core::{AntiCheatConfig, CombatConfig};

/// Configuration shared by the battle service.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub anticheat: AntiCheatConfig,
    /// Mixed into every session seed so seeds cannot be predicted from ids.
    pub seed_salt: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            anticheat: AntiCheatConfig::default(),
            seed_salt: "raid".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults with `combat` taken from loaded content.
    pub fn with_combat(combat: CombatConfig) -> Self {
        Self {
            combat,
            ..Self::default()
        }
    }

    /// Applies environment overrides on top of `self`.
    ///
    /// Unset or unparsable variables leave the current value in place.
    pub fn from_env(mut self) -> Self {
        if let Some(secs) = read_env::<u64>("RAID_SESSION_TTL_SECS") {
            self.combat.session_ttl_ms = secs.max(1).saturating_mul(1_000);
        }

        if let Some(variance) = read_env::<f64>("RAID_VARIANCE") {
            self.combat.variance = variance.clamp(0.0, 0.5);
        }

        if let Some(chance) = read_env::<f64>("RAID_AI_BASIC_ATTACK_CHANCE") {
            self.combat.ai_basic_attack_chance = chance.clamp(0.0, 100.0);
        }

        if let Some(salt) = env::var("RAID_SEED_SALT").ok().filter(|s| !s.is_empty()) {
            self.seed_salt = salt;
        }

        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
