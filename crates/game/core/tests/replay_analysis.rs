use raid_core::anticheat::bot;
use raid_core::{
    AbilityTable, AntiCheatConfig, BattleEngine, BattleMode, CharacterClass, CharacterDefinition,
    CharacterId, CombatConfig, CombatEnv, CombatantId, EffectCatalog, Evidence, FlagKind,
    FlagSeverity, PlayerAction, RewardTable, ReplayValidator, SessionId, SessionSeed, UserId,
};

fn fighter(id: u32, hp: u32, speed: u32) -> CharacterDefinition {
    CharacterDefinition {
        id: CharacterId(id),
        name: format!("fighter-{id}"),
        class: CharacterClass::Guardian,
        element: Default::default(),
        rarity: Default::default(),
        level: 1,
        max_hp: hp,
        max_mana: 0,
        mana_regen: 0,
        attack: 1,
        defense: 1_000,
        speed,
        priority: 0,
        abilities: Vec::new(),
    }
}

#[test]
fn six_hundred_actions_in_a_minute_is_high() {
    let config = AntiCheatConfig::default();
    let timestamps: Vec<u64> = (0..600).map(|i| i * 100).collect();

    let evidence = bot::analyze(&timestamps, &config);
    let apm = evidence
        .iter()
        .find_map(|e| match e {
            Evidence::ActionsPerMinute { apm, .. } => Some(*apm),
            _ => None,
        })
        .expect("apm evidence");
    assert!(apm >= 600.0);
    assert!(evidence.iter().any(|e| e.severity(&config) == FlagSeverity::High));
}

#[test]
fn scripted_session_log_is_flagged() {
    let abilities = AbilityTable::new();
    let catalog = EffectCatalog::builtin();
    let config = CombatConfig::default();
    let engine = BattleEngine::new(CombatEnv::new(&abilities, &catalog, &config));

    let seed = SessionSeed {
        id: SessionId(3),
        user: UserId(5),
        mode: BattleMode::Pvp {
            opponent: UserId(6),
        },
        seed: 9,
        started_at: 0,
        reward: RewardTable::default(),
    };
    let mut session = engine
        .start(seed, &[fighter(1, 10_000, 20)], &[fighter(2, 10_000, 10)])
        .unwrap();

    // A perfectly regular 50 ms cadence.
    for i in 1..=30u64 {
        engine
            .submit_turn(
                &mut session,
                CombatantId(1),
                PlayerAction::BasicAttack {
                    target: CombatantId(2),
                },
                i * 50,
            )
            .unwrap();
    }

    let flags = ReplayValidator::default().validate(&session.log);
    assert_eq!(flags.len(), 1);
    let flag = &flags[0];
    assert_eq!(flag.subject, UserId(5));
    assert_eq!(flag.kind, FlagKind::Bot);
    assert_eq!(flag.severity, FlagSeverity::High);
    assert!(flag
        .evidence
        .iter()
        .any(|e| matches!(e, Evidence::RegularIntervals { .. })));
    // Flags are advisory; the session keeps running.
    assert!(!session.is_terminal());
}
