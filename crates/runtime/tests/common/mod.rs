//! Shared fixture: a tiny content bundle and a service wired to inspectable
//! in-memory collaborators.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use raid_content::ContentBundle;
use raid_core::{
    AbilityTable, BattleSession, CharacterClass, CharacterDefinition, CharacterId, CombatConfig,
    CombatantId, EffectCatalog, MissionDefinition, MissionId, PlayerAction, Rarity, RewardTable,
    SessionId, TeamDefinition, TeamId, UserId,
};
use raid_runtime::{
    BattleService, InMemoryActionLog, InMemoryIntel, InMemoryLedger, InMemoryProgress,
    InMemorySessionRepo, ManualClock, RuntimeConfig, SessionRepository, StaticDefinitions,
};

pub const USER: UserId = UserId(7);
pub const RIVAL: UserId = UserId(8);
pub const START: u64 = 1_000_000;

/// USER's knight.
pub const KNIGHT_TEAM: TeamId = TeamId(1);
/// RIVAL's slime.
pub const RIVAL_TEAM: TeamId = TeamId(2);
/// USER's squire, no match for anything.
pub const SQUIRE_TEAM: TeamId = TeamId(3);

/// Island 1, stage 1: one slime.
pub const SLIME_STAGE: MissionId = MissionId(1);
/// Island 1, stage 2: a dragon.
pub const DRAGON_STAGE: MissionId = MissionId(2);

/// First player combatant; the knight or squire in every fixture session.
pub const LEAD: CombatantId = CombatantId(1);
/// First enemy combatant.
pub const FOE: CombatantId = CombatantId(2);

pub fn character(
    id: u32,
    name: &str,
    class: CharacterClass,
    hp: u32,
    attack: u32,
    defense: u32,
    speed: u32,
) -> CharacterDefinition {
    CharacterDefinition {
        id: CharacterId(id),
        name: name.to_string(),
        class,
        element: Default::default(),
        rarity: Rarity::Common,
        level: 10,
        max_hp: hp,
        max_mana: 50,
        mana_regen: 5,
        attack,
        defense,
        speed,
        priority: 0,
        abilities: Vec::new(),
    }
}

pub fn bundle() -> ContentBundle {
    let characters = [
        character(1, "Knight", CharacterClass::Warrior, 500, 60, 20, 30),
        character(2, "Slime", CharacterClass::Warrior, 100, 10, 0, 10),
        character(3, "Dragon", CharacterClass::Warrior, 5_000, 200, 100, 10),
        character(4, "Squire", CharacterClass::Mage, 20, 1, 0, 30),
    ]
    .into_iter()
    .map(|c| (c.id, c))
    .collect();

    let teams = [
        (KNIGHT_TEAM, USER, vec![CharacterId(1)]),
        (RIVAL_TEAM, RIVAL, vec![CharacterId(2)]),
        (SQUIRE_TEAM, USER, vec![CharacterId(4)]),
    ]
    .into_iter()
    .map(|(id, owner, members)| {
        (
            id,
            TeamDefinition {
                id,
                owner,
                name: id.to_string(),
                members,
            },
        )
    })
    .collect();

    let missions = [
        (SLIME_STAGE, 1, CharacterId(2)),
        (DRAGON_STAGE, 2, CharacterId(3)),
    ]
    .into_iter()
    .map(|(id, sequence, enemy)| {
        (
            id,
            MissionDefinition {
                id,
                name: id.to_string(),
                island: 1,
                sequence,
                enemies: vec![enemy],
                reward: RewardTable::new(100, 200),
            },
        )
    })
    .collect::<BTreeMap<_, _>>();

    ContentBundle {
        config: CombatConfig::default(),
        effects: EffectCatalog::builtin(),
        abilities: AbilityTable::new(),
        characters,
        teams,
        missions,
    }
}

/// Service plus handles on every in-memory collaborator.
pub struct Harness {
    pub service: BattleService,
    pub clock: Arc<ManualClock>,
    pub sessions: Arc<InMemorySessionRepo>,
    pub actions: Arc<InMemoryActionLog>,
    pub ledger: Arc<InMemoryLedger>,
    pub progress: Arc<InMemoryProgress>,
    pub intel: Arc<InMemoryIntel>,
}

impl Harness {
    pub fn new() -> Self {
        let repo = Arc::new(InMemorySessionRepo::new());
        Self::build(repo.clone(), repo)
    }

    /// Harness whose service saves through `sessions`, which should wrap
    /// `repo`.
    pub fn with_sessions(
        sessions: Arc<dyn SessionRepository>,
        repo: Arc<InMemorySessionRepo>,
    ) -> Self {
        Self::build(sessions, repo)
    }

    fn build(sessions: Arc<dyn SessionRepository>, repo: Arc<InMemorySessionRepo>) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let bundle = bundle();
        let config = RuntimeConfig::with_combat(bundle.config.clone());
        let clock = Arc::new(ManualClock::new(START));
        let actions = Arc::new(InMemoryActionLog::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let progress = Arc::new(InMemoryProgress::new());
        let intel = Arc::new(InMemoryIntel::new());

        let service = BattleService::builder()
            .config(config)
            .definitions(Arc::new(StaticDefinitions::new(bundle)))
            .sessions(sessions)
            .actions(actions.clone())
            .ledger(ledger.clone())
            .progress(progress.clone())
            .intel(intel.clone())
            .clock(clock.clone())
            .build()
            .unwrap();

        Self {
            service,
            clock,
            sessions: repo,
            actions,
            ledger,
            progress,
            intel,
        }
    }

    /// Strikes the first enemy with the lead combatant until the session
    /// ends, three seconds apart.
    pub fn fight_to_the_end(&self, id: SessionId) -> BattleSession {
        let mut session = self.service.load_session(id).unwrap();
        for _ in 0..40 {
            if session.is_terminal() {
                break;
            }
            self.clock.advance(3_000);
            session = self.service.submit_turn(id, USER, LEAD, strike(FOE)).unwrap().0;
        }
        session
    }
}

pub fn strike(target: CombatantId) -> PlayerAction {
    PlayerAction::BasicAttack { target }
}
