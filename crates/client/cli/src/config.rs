//! CLI configuration read from the environment.
use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use raid_core::{MissionId, ModeKind, TeamId, UserId};
use raid_runtime::Opposition;

/// What the autopilot plays and how.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub user: UserId,
    pub team: TeamId,
    pub mode: ModeKind,
    /// Mission id for PvE and raids, opposing team id for PvP.
    pub target: u32,
    /// Simulated think time between turns, in milliseconds.
    pub think_ms: (u64, u64),
    /// Seed for the autopilot's own choices; entropy when unset.
    pub seed: Option<u64>,
    /// Give up (abandon) after this many submitted turns.
    pub max_turns: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: raid_content::default_data_dir(),
            user: UserId(1),
            team: TeamId(1),
            mode: ModeKind::Raid,
            target: 1,
            think_ms: (800, 2_500),
            seed: None,
            max_turns: 200,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RAID_DATA_DIR` - Content directory (default: the bundled pack)
    /// - `RAID_USER` - Acting user id (default: 1)
    /// - `RAID_TEAM` - Team to field (default: 1)
    /// - `RAID_MODE` - `pve`, `raid` or `pvp` (default: raid)
    /// - `RAID_TARGET` - Mission id, or team id for PvP (default: 1)
    /// - `RAID_THINK_MIN_MS` / `RAID_THINK_MAX_MS` - Think time range
    /// - `RAID_CLI_SEED` - Autopilot seed (default: random)
    /// - `RAID_MAX_TURNS` - Turn limit before abandoning (default: 200)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RAID_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(user) = read_env::<u64>("RAID_USER") {
            config.user = UserId(user);
        }
        if let Some(team) = read_env::<u32>("RAID_TEAM") {
            config.team = TeamId(team);
        }
        if let Ok(mode) = env::var("RAID_MODE") {
            config.mode = mode
                .trim()
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| anyhow!("RAID_MODE must be pve, raid or pvp, got '{}'", mode))?;
        }
        if let Some(target) = read_env::<u32>("RAID_TARGET") {
            config.target = target;
        }

        let min = read_env::<u64>("RAID_THINK_MIN_MS").unwrap_or(config.think_ms.0);
        let max = read_env::<u64>("RAID_THINK_MAX_MS").unwrap_or(config.think_ms.1);
        config.think_ms = (min, max.max(min));

        config.seed = read_env::<u64>("RAID_CLI_SEED");
        if let Some(limit) = read_env::<u32>("RAID_MAX_TURNS") {
            config.max_turns = limit.max(1);
        }

        Ok(config)
    }

    pub fn opposition(&self) -> Opposition {
        match self.mode {
            ModeKind::Pvp => Opposition::Team(TeamId(self.target)),
            ModeKind::Pve | ModeKind::Raid => Opposition::Mission(MissionId(self.target)),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
