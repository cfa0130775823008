//! Mission catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use raid_core::{MissionDefinition, MissionId, TeamDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Mission catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionCatalog {
    pub missions: Vec<MissionDefinition>,
}

/// Loader for PvE missions and raid stages.
pub struct MissionLoader;

impl MissionLoader {
    /// Load mission catalog from a RON file.
    ///
    /// `(island, sequence)` pairs must be unique so campaign progress is
    /// unambiguous.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<MissionId, MissionDefinition>> {
        let catalog: MissionCatalog = read_ron(path, "mission catalog")?;

        let mut missions: BTreeMap<MissionId, MissionDefinition> = BTreeMap::new();
        for mission in catalog.missions {
            if mission.enemies.is_empty() || mission.enemies.len() > TeamDefinition::MAX_MEMBERS {
                anyhow::bail!(
                    "Mission {} must field 1..={} enemies",
                    mission.id,
                    TeamDefinition::MAX_MEMBERS
                );
            }
            if let Some(clash) = missions
                .values()
                .find(|m| m.island == mission.island && m.sequence == mission.sequence)
            {
                anyhow::bail!(
                    "Missions {} and {} share island {} sequence {}",
                    clash.id,
                    mission.id,
                    mission.island,
                    mission.sequence
                );
            }
            let id = mission.id;
            if missions.insert(id, mission).is_some() {
                anyhow::bail!("Duplicate mission id {}", id);
            }
        }
        Ok(missions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_missions_and_rejects_sequence_clash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missions.ron");
        std::fs::write(
            &path,
            r#"(missions: [
                (id: 1, name: "Tide Caves", island: 1, sequence: 1, enemies: [100],
                 reward: (tokens: 50, xp: 120)),
                (id: 2, name: "Coral Gate", island: 1, sequence: 2, enemies: [100, 101],
                 reward: (tokens: 80, xp: 200)),
            ])"#,
        )
        .unwrap();
        let missions = MissionLoader::load(&path).unwrap();
        assert_eq!(missions[&MissionId(2)].reward.xp, 200);

        std::fs::write(
            &path,
            r#"(missions: [
                (id: 1, name: "A", island: 1, sequence: 1, enemies: [100], reward: (tokens: 1, xp: 1)),
                (id: 2, name: "B", island: 1, sequence: 1, enemies: [100], reward: (tokens: 1, xp: 1)),
            ])"#,
        )
        .unwrap();
        assert!(MissionLoader::load(&path).is_err());
    }
}
