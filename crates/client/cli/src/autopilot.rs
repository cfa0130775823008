//! Scripted player: picks actions and paces them like a person would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raid_core::resources;
use raid_core::{
    AbilityOracle, AbilityTable, BattleSession, CombatantId, PlayerAction, Side, TargetShape,
};

pub struct Autopilot {
    abilities: AbilityTable,
    rng: StdRng,
    think_ms: (u64, u64),
}

impl Autopilot {
    pub fn new(abilities: AbilityTable, think_ms: (u64, u64), seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            abilities,
            rng,
            think_ms,
        }
    }

    /// Milliseconds to wait before the next submission.
    pub fn think(&mut self) -> u64 {
        let (min, max) = self.think_ms;
        self.rng.gen_range(min..=max)
    }

    /// Strongest usable ability against the weakest living enemy.
    ///
    /// Falls back to a basic attack when nothing equipped is ready. `None`
    /// when the actor or every enemy is gone.
    pub fn choose(&self, session: &BattleSession, actor: CombatantId) -> Option<PlayerAction> {
        let me = session.combatant(actor)?;
        let target = weakest_enemy(session)?;

        let best = me
            .equipped
            .iter()
            .filter_map(|id| self.abilities.ability(id))
            .filter(|ability| resources::can_use(ability, me).is_ok())
            .max_by_key(|ability| ability.power);

        Some(match best {
            Some(ability) => PlayerAction::Ability {
                ability: ability.id,
                target: match ability.target {
                    TargetShape::Single => Some(target),
                    TargetShape::AllEnemies | TargetShape::SelfTarget => None,
                },
            },
            None => PlayerAction::BasicAttack { target },
        })
    }
}

pub fn weakest_enemy(session: &BattleSession) -> Option<CombatantId> {
    session
        .living(Side::Enemy)
        .min_by_key(|c| (c.hp, c.id))
        .map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raid_core::{
        Ability, AbilityId, BattleEngine, BattleMode, CharacterClass, CharacterDefinition,
        CharacterId, CombatConfig, CombatEnv, EffectCatalog, MissionId, RewardTable, SessionId,
        SessionSeed, UserId,
    };

    const BLAST: AbilityId = AbilityId(5);
    const JAB: AbilityId = AbilityId(6);

    fn fighter(id: u32, hp: u32, abilities: Vec<AbilityId>) -> CharacterDefinition {
        CharacterDefinition {
            id: CharacterId(id),
            name: format!("fighter-{id}"),
            class: CharacterClass::Warrior,
            element: Default::default(),
            rarity: Default::default(),
            level: 10,
            max_hp: hp,
            max_mana: 40,
            mana_regen: 0,
            attack: 10,
            defense: 10,
            speed: 50 - id,
            priority: 0,
            abilities,
        }
    }

    fn session(table: &AbilityTable, loadout: Vec<AbilityId>) -> BattleSession {
        let catalog = EffectCatalog::builtin();
        let config = CombatConfig::default();
        let engine = BattleEngine::new(CombatEnv::new(table, &catalog, &config));
        let seed = SessionSeed {
            id: SessionId(1),
            user: UserId(1),
            mode: BattleMode::Pve {
                mission: MissionId(1),
            },
            seed: 3,
            started_at: 0,
            reward: RewardTable::default(),
        };
        engine
            .start(
                seed,
                &[fighter(1, 100, loadout)],
                &[fighter(2, 300, vec![]), fighter(3, 200, vec![])],
            )
            .unwrap()
    }

    #[test]
    fn prefers_strongest_affordable_ability_on_weakest_enemy() {
        let table: AbilityTable = [
            Ability::new(BLAST, "Blast", 80).with_mana(30),
            Ability::new(JAB, "Jab", 20),
        ]
        .into_iter()
        .collect();
        let pilot = Autopilot::new(table.clone(), (0, 0), Some(1));
        let session = session(&table, vec![JAB, BLAST]);

        assert_eq!(
            pilot.choose(&session, CombatantId(1)),
            Some(PlayerAction::Ability {
                ability: BLAST,
                target: Some(CombatantId(3)),
            })
        );
    }

    #[test]
    fn falls_back_to_basic_attack() {
        let table: AbilityTable = [Ability::new(BLAST, "Blast", 80).with_mana(90)]
            .into_iter()
            .collect();
        let pilot = Autopilot::new(table.clone(), (0, 0), Some(1));
        let session = session(&table, vec![BLAST]);

        assert_eq!(
            pilot.choose(&session, CombatantId(1)),
            Some(PlayerAction::BasicAttack {
                target: CombatantId(3)
            })
        );
    }

    #[test]
    fn think_time_stays_in_range() {
        let mut pilot = Autopilot::new(AbilityTable::new(), (800, 2_500), Some(9));
        for _ in 0..100 {
            let delay = pilot.think();
            assert!((800..=2_500).contains(&delay));
        }
    }
}
