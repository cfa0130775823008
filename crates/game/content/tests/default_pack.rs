use raid_content::{ContentFactory, default_data_dir};
use raid_core::{
    AbilityId, AbilityOracle, BattleEngine, BattleMode, CharacterId, MissionId, Rarity,
    RewardTable, SessionId, SessionSeed, SessionStatus, TeamId, UserId,
};

#[test]
fn shipped_pack_loads_and_cross_checks() {
    let bundle = ContentFactory::new(default_data_dir()).load_bundle().unwrap();

    assert!(bundle.abilities.len() >= 10);
    assert_eq!(bundle.teams.len(), 3);
    assert_eq!(bundle.missions.len(), 4);
    assert_eq!(bundle.effects.get("bleed").unwrap().duration, 3);
    assert_eq!(bundle.config.pvp_reward, RewardTable::new(40, 150));

    let wyrm = bundle.character(CharacterId(110)).unwrap();
    assert_eq!(wyrm.abilities.len(), 3);

    let frost_lance = bundle.abilities.ability(AbilityId(12)).unwrap();
    assert_eq!(frost_lance.unlock.min_rarity, Some(Rarity::Uncommon));
}

#[test]
fn shipped_team_can_start_first_mission() {
    let bundle = ContentFactory::new(default_data_dir()).load_bundle().unwrap();
    let team = bundle.team(TeamId(1)).unwrap();
    let mission = bundle.mission(MissionId(1)).unwrap();

    let players: Vec<_> = team
        .members
        .iter()
        .map(|id| bundle.character(*id).unwrap().clone())
        .collect();
    let enemies: Vec<_> = mission
        .enemies
        .iter()
        .map(|id| bundle.character(*id).unwrap().clone())
        .collect();

    let engine = BattleEngine::new(bundle.env());
    let session = engine
        .start(
            SessionSeed {
                id: SessionId(1),
                user: team.owner,
                mode: BattleMode::Pve {
                    mission: mission.id,
                },
                seed: 11,
                started_at: 0,
                reward: mission.reward,
            },
            &players,
            &enemies,
        )
        .unwrap();

    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.combatants.len(), 6);
    assert_eq!(session.user, UserId(1));
    // Every hero starts with its full loadout equipped.
    let astrid = &session.combatants[0];
    assert_eq!(astrid.equipped.len(), 3);
}
