mod common;

use common::*;
use raid_core::{
    BattleError, BattleMode, FlagKind, FlagSeverity, ModeKind, SessionStatus, TurnOutcome,
};
use raid_runtime::{Account, Asset, Opposition, ProgressStore, RuntimeError};

const TTL: u64 = 900_000;

/// A raid stage from start to payout.
#[test]
fn raid_stage_completes_pays_and_advances_campaign() {
    let harness = Harness::new();
    let service = &harness.service;

    // Start: the knight outpaces the slime, so nothing has happened yet.
    let session = service
        .start_session(
            USER,
            ModeKind::Raid,
            KNIGHT_TEAM,
            Opposition::Mission(SLIME_STAGE),
        )
        .unwrap();
    assert_eq!(
        session.mode,
        BattleMode::Raid {
            mission: SLIME_STAGE,
            island: 1,
            sequence: 1,
        }
    );
    assert_eq!(session.status, SessionStatus::InProgress);
    assert!(session.log.is_empty());
    assert_eq!(session.expires_at, START + TTL);

    // First exchange: our strike, then the slime's reply within the same call.
    harness.clock.advance(2_000);
    let (session, result) = service
        .submit_turn(session.id, USER, LEAD, strike(FOE))
        .unwrap();
    assert_eq!(result.actor, LEAD);
    assert!(!result.ai);
    assert!(matches!(result.outcome, TurnOutcome::Hit { .. }));
    assert_eq!(session.expires_at, START + 2_000 + TTL);

    // Fight on until the slime is gone.
    let session = harness.fight_to_the_end(session.id);
    assert_eq!(session.status, SessionStatus::Completed);
    let reward = session.reward.expect("completed sessions carry a reward");
    assert!(reward.tokens >= 100);

    // Payout is balanced and credited to the owner.
    let tokens = i64::try_from(reward.tokens).unwrap();
    let xp = i64::try_from(reward.xp).unwrap();
    assert_eq!(harness.ledger.balance(Account::User(USER), Asset::Tokens), tokens);
    assert_eq!(harness.ledger.balance(Account::Treasury, Asset::Tokens), -tokens);
    assert_eq!(harness.ledger.balance(Account::User(USER), Asset::Xp), xp);
    assert!(raid_runtime::is_balanced(&harness.ledger.entries(session.id)));

    assert_eq!(
        harness.progress.campaign_position(USER).unwrap(),
        Some((1, 1))
    );

    // The stored copy matches what the last call returned.
    assert_eq!(service.load_session(session.id).unwrap(), session);

    // Closed sessions reject further turns.
    let err = service
        .submit_turn(session.id, USER, LEAD, strike(FOE))
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::SessionClosed(SessionStatus::Completed))
    ));
    assert!(err.is_rejection());
}

#[test]
fn pve_mission_pays_without_touching_campaign() {
    let harness = Harness::new();
    let session = harness
        .service
        .start_session(
            USER,
            ModeKind::Pve,
            KNIGHT_TEAM,
            Opposition::Mission(SLIME_STAGE),
        )
        .unwrap();

    let session = harness.fight_to_the_end(session.id);
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(harness.ledger.entries(session.id).len(), 4);
    assert_eq!(harness.progress.campaign_position(USER).unwrap(), None);
}

#[test]
fn lost_raid_pays_nothing() {
    let harness = Harness::new();
    let session = harness
        .service
        .start_session(
            USER,
            ModeKind::Raid,
            KNIGHT_TEAM,
            Opposition::Mission(DRAGON_STAGE),
        )
        .unwrap();

    let session = harness.fight_to_the_end(session.id);
    assert_eq!(session.status, SessionStatus::Failed);
    assert!(session.reward.is_none());
    assert!(harness.ledger.entries(session.id).is_empty());
    assert_eq!(harness.progress.campaign_position(USER).unwrap(), None);
}

#[test]
fn one_open_session_per_mode_kind() {
    let harness = Harness::new();
    let service = &harness.service;

    let first = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    harness.clock.advance(1_000);
    let again = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(DRAGON_STAGE))
        .unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(again, first);

    let raid = service
        .start_session(USER, ModeKind::Raid, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    assert_ne!(raid.id, first.id);

    // Once the PvE session is over a new one can start.
    harness.fight_to_the_end(first.id);
    let next = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    assert_ne!(next.id, first.id);
}

#[test]
fn stale_open_session_is_expired_before_starting_anew() {
    let harness = Harness::new();
    let service = &harness.service;

    let stale = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    harness.clock.advance(TTL + 1);

    let fresh = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    assert_ne!(fresh.id, stale.id);
    assert_eq!(
        service.load_session(stale.id).unwrap().status,
        SessionStatus::Expired
    );
}

#[test]
fn late_turn_expires_the_session() {
    let harness = Harness::new();
    let service = &harness.service;

    let session = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    harness.clock.advance(TTL + 1);

    let err = service
        .submit_turn(session.id, USER, LEAD, strike(FOE))
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::SessionExpired { .. })
    ));

    let stored = service.load_session(session.id).unwrap();
    assert_eq!(stored.status, SessionStatus::Expired);
    assert!(stored.log.is_empty());
    assert!(service.expire_stale().unwrap().is_empty());
}

#[test]
fn sweep_expires_only_sessions_past_deadline() {
    let harness = Harness::new();
    let service = &harness.service;

    let old = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    harness.clock.advance(TTL / 2);
    let recent = service
        .start_session(RIVAL, ModeKind::Pve, RIVAL_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();

    harness.clock.advance(TTL / 2 + 1);
    assert_eq!(service.expire_stale().unwrap(), vec![old.id]);
    assert_eq!(
        service.load_session(recent.id).unwrap().status,
        SessionStatus::InProgress
    );

    harness.clock.advance(TTL);
    assert_eq!(service.expire_stale().unwrap(), vec![recent.id]);
}

#[test]
fn rejected_turn_leaves_stored_session_untouched() {
    let harness = Harness::new();
    let service = &harness.service;

    let session = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    harness.clock.advance(1_000);

    let err = service
        .submit_turn(session.id, USER, FOE, strike(LEAD))
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::WrongTurn { .. })
    ));
    assert!(err.is_rejection());

    let err = service
        .submit_turn(session.id, RIVAL, LEAD, strike(FOE))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NotSessionOwner { .. }));

    assert_eq!(service.load_session(session.id).unwrap(), session);
}

#[test]
fn ownership_is_enforced() {
    let harness = Harness::new();
    let service = &harness.service;

    let err = service
        .start_session(RIVAL, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NotTeamOwner { .. }));

    let session = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    let err = service.abandon_session(session.id, RIVAL).unwrap_err();
    assert!(matches!(err, RuntimeError::NotSessionOwner { .. }));

    let abandoned = service.abandon_session(session.id, USER).unwrap();
    assert_eq!(abandoned.status, SessionStatus::Abandoned);
    assert!(abandoned.reward.is_none());

    let err = service.abandon_session(session.id, USER).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::SessionClosed(SessionStatus::Abandoned))
    ));
}

#[test]
fn unknown_references_are_reported() {
    let harness = Harness::new();
    let service = &harness.service;

    let err = service
        .start_session(
            USER,
            ModeKind::Pve,
            raid_core::TeamId(99),
            Opposition::Mission(SLIME_STAGE),
        )
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Definition(_)));

    let err = service.load_session(raid_core::SessionId(404)).unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound(_)));
}

#[test]
fn opposition_must_fit_the_mode() {
    let harness = Harness::new();
    let service = &harness.service;

    let err = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Team(RIVAL_TEAM))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidOpposition { .. }));

    let err = service
        .start_session(USER, ModeKind::Pvp, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidOpposition { .. }));

    // A user cannot fight their own team.
    let err = service
        .start_session(USER, ModeKind::Pvp, KNIGHT_TEAM, Opposition::Team(SQUIRE_TEAM))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidOpposition { .. }));
}

#[test]
fn pvp_results_feed_head_to_head_record() {
    use raid_runtime::PlayerIntel;

    let harness = Harness::new();
    let service = &harness.service;

    let won = service
        .start_session(USER, ModeKind::Pvp, KNIGHT_TEAM, Opposition::Team(RIVAL_TEAM))
        .unwrap();
    assert_eq!(won.mode, BattleMode::Pvp { opponent: RIVAL });
    let won = harness.fight_to_the_end(won.id);
    assert_eq!(won.status, SessionStatus::Completed);
    let reward = won.reward.unwrap();
    assert_eq!(
        harness.ledger.balance(Account::User(USER), Asset::Tokens),
        i64::try_from(reward.tokens).unwrap()
    );

    let lost = service
        .start_session(USER, ModeKind::Pvp, SQUIRE_TEAM, Opposition::Team(RIVAL_TEAM))
        .unwrap();
    let lost = harness.fight_to_the_end(lost.id);
    assert_eq!(lost.status, SessionStatus::Failed);

    let record = harness.intel.collusion_context(USER, RIVAL).head_to_head;
    assert_eq!(record.matches, 2);
    assert_eq!(record.wins, 1);
}

#[test]
fn replay_review_reports_shared_network() {
    let harness = Harness::new();
    harness.intel.set_network(USER, "10.0.0.8");
    harness.intel.set_network(RIVAL, "10.0.0.8");

    let session = harness
        .service
        .start_session(USER, ModeKind::Pvp, KNIGHT_TEAM, Opposition::Team(RIVAL_TEAM))
        .unwrap();
    let session = harness.fight_to_the_end(session.id);

    let flags = harness.service.validate_replay(session.id).unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].kind, FlagKind::Collusion);
    assert_eq!(flags[0].subject, USER);
    assert_eq!(flags[0].counterpart, Some(RIVAL));
    assert_eq!(flags[0].severity, FlagSeverity::High);

    // Advisory only: the outcome and payout stand.
    assert_eq!(
        harness.service.load_session(session.id).unwrap().status,
        SessionStatus::Completed
    );
    assert!(!harness.ledger.entries(session.id).is_empty());
}

#[test]
fn calm_pve_replay_raises_nothing() {
    let harness = Harness::new();
    let session = harness
        .service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    let session = harness.fight_to_the_end(session.id);
    assert!(harness.service.validate_replay(session.id).unwrap().is_empty());
}

#[test]
fn locks_do_not_outlive_the_calls_that_take_them() {
    let harness = Harness::new();
    let service = &harness.service;

    let session = service
        .start_session(USER, ModeKind::Pve, KNIGHT_TEAM, Opposition::Mission(SLIME_STAGE))
        .unwrap();
    harness.clock.advance(2_000);
    service
        .submit_turn(session.id, USER, LEAD, strike(FOE))
        .unwrap();
    assert_eq!(service.sessions_in_flight(), 0);

    let session = harness.fight_to_the_end(session.id);
    assert!(session.is_terminal());
    assert_eq!(service.sessions_in_flight(), 0);

    // Reads, reviews and late submissions on a closed session.
    for _ in 0..5 {
        service.load_session(session.id).unwrap();
        service.validate_replay(session.id).unwrap();
        assert!(
            service
                .submit_turn(session.id, USER, LEAD, strike(FOE))
                .is_err()
        );
        assert!(service.abandon_session(session.id, USER).is_err());
    }
    assert!(service.load_session(raid_core::SessionId(404)).is_err());
    assert_eq!(service.sessions_in_flight(), 0);
}
