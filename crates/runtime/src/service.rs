//! Transactional surface around the battle engine.
//!
//! Every call that changes a session follows the same shape: take the
//! session's lock, load the committed record, run the engine, then save.
//! The engine only commits to the loaded copy on success, and a failed save
//! leaves the stored record as it was, so a turn is either fully persisted
//! or never happened.

use std::fmt;
use std::sync::{Arc, Mutex};

use raid_core::{
    AntiCheatFlag, BattleEngine, BattleError, BattleMode, BattleSession, CharacterDefinition,
    CharacterId, CombatEnv, CombatError, CombatantId, MissionId, ModeKind, PlayerAction,
    ReplayValidator, RewardIntent, SessionId, SessionSeed, SessionStatus, TeamId, TurnResult,
    UserId,
};
use tracing::{debug, info, info_span, warn};

use crate::clock::{Clock, SystemClock};
use crate::collaborators::{
    Account, Asset, DefinitionStore, InMemoryIntel, InMemoryLedger, InMemoryProgress, LedgerEntry,
    PlayerIntel, ProgressStore, RewardLedger, is_balanced,
};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::locks::SessionLocks;
use crate::repository::{
    ActionLogRepository, InMemoryActionLog, InMemorySessionRepo, SessionRecord, SessionRepository,
};
use crate::seed::{derive_seed, seed_fingerprint};

/// What a new session is fought against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opposition {
    /// A PvE mission or raid stage.
    Mission(MissionId),
    /// Another user's team, played by the AI.
    Team(TeamId),
}

impl fmt::Display for Opposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opposition::Mission(id) => write!(f, "{}", id),
            Opposition::Team(id) => write!(f, "{}", id),
        }
    }
}

/// Battle service shared by request handlers.
pub struct BattleService {
    config: RuntimeConfig,
    definitions: Arc<dyn DefinitionStore>,
    sessions: Arc<dyn SessionRepository>,
    actions: Arc<dyn ActionLogRepository>,
    ledger: Arc<dyn RewardLedger>,
    progress: Arc<dyn ProgressStore>,
    intel: Arc<dyn PlayerIntel>,
    clock: Arc<dyn Clock>,
    locks: SessionLocks,
    /// Serializes session creation so the one-open-session rule holds.
    starts: Mutex<()>,
    validator: ReplayValidator,
}

impl BattleService {
    pub fn builder() -> BattleServiceBuilder {
        BattleServiceBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn engine(&self) -> BattleEngine<'_> {
        BattleEngine::new(CombatEnv::new(
            self.definitions.abilities(),
            self.definitions.effect_catalog(),
            &self.config.combat,
        ))
    }

    /// Creates and persists a session for `user`'s `team`.
    ///
    /// A user holds at most one open session per mode kind: while one is
    /// open it is returned unchanged instead. An open session already past
    /// its deadline is expired first. AI combatants faster than every player
    /// act before this returns.
    pub fn start_session(
        &self,
        user: UserId,
        kind: ModeKind,
        team: TeamId,
        target: Opposition,
    ) -> Result<BattleSession> {
        let span = info_span!("start_session", %user, %kind, %team, %target);
        let _enter = span.enter();

        let team_def = self.definitions.team(team)?;
        if team_def.owner != user {
            return Err(RuntimeError::NotTeamOwner { team, user });
        }

        let _start = self.starts.lock().map_err(|_| RuntimeError::LockPoisoned)?;
        if let Some(existing) = self.resume_open(user, kind)? {
            return Ok(existing);
        }

        let players = self.roster(&team_def.members)?;
        let (mode, enemies, reward) = self.opposition(user, kind, target)?;

        let id = self.sessions.next_id()?;
        let started_at = self.clock.now_ms();
        let seed = derive_seed(&self.config.seed_salt, user, id, &mode, started_at);
        let session = self.engine().start(
            SessionSeed {
                id,
                user,
                mode,
                seed,
                started_at,
                reward,
            },
            &players,
            &enemies,
        )?;

        self.actions.append(id, &session.log)?;
        self.sessions.create(&SessionRecord::from_session(&session)?)?;
        info!(
            session = %id,
            seed = %seed_fingerprint(&self.config.seed_salt, user, id, &mode, started_at),
            combatants = session.combatants.len(),
            ai_turns = session.log.len(),
            "session started"
        );

        if session.is_terminal() {
            self.settle(&session)?;
        }
        Ok(session)
    }

    /// Resolves `user`'s action for `actor`, then any AI turns that follow.
    ///
    /// Returns the updated session and the result of the submitted action;
    /// AI results are in the session log. A session found past its deadline
    /// is moved to `Expired` and the call fails with `SessionExpired`.
    pub fn submit_turn(
        &self,
        id: SessionId,
        user: UserId,
        actor: CombatantId,
        action: PlayerAction,
    ) -> Result<(BattleSession, TurnResult)> {
        let span = info_span!("submit_turn", session = %id, %actor);
        let _enter = span.enter();

        let lock = self.locks.handle(id)?;
        let _guard = lock.lock()?;

        let mut session = self.load_unlocked(id)?;
        if !session.is_owned_by(user) {
            return Err(RuntimeError::NotSessionOwner { session: id, user });
        }

        let now = self.clock.now_ms();
        let engine = self.engine();
        let logged = session.log.len();
        match engine.submit_turn(&mut session, actor, action, now) {
            Ok(result) => {
                self.commit(&session, logged)?;
                debug!(
                    turn = result.sequence,
                    round = result.round,
                    outcome = ?result.outcome,
                    ai_turns = session.log.len() - logged - 1,
                    "turn resolved"
                );
                if session.is_terminal() {
                    self.settle(&session)?;
                }
                Ok((session, result))
            }
            Err(err @ BattleError::SessionExpired { .. }) => {
                if engine.expire(&mut session, now) {
                    self.commit(&session, logged)?;
                    info!("session expired");
                }
                Err(err.into())
            }
            Err(err) => {
                warn!(
                    error = %err,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "turn rejected"
                );
                Err(err.into())
            }
        }
    }

    /// Owner gives up an open session.
    pub fn abandon_session(&self, id: SessionId, user: UserId) -> Result<BattleSession> {
        let span = info_span!("abandon_session", session = %id, %user);
        let _enter = span.enter();

        let lock = self.locks.handle(id)?;
        let _guard = lock.lock()?;

        let mut session = self.load_unlocked(id)?;
        if !session.is_owned_by(user) {
            return Err(RuntimeError::NotSessionOwner { session: id, user });
        }
        self.engine().abandon(&mut session, user)?;
        self.commit(&session, session.log.len())?;

        info!(turn = session.turn, "session abandoned");
        Ok(session)
    }

    /// Runs the replay heuristics over a session's log.
    ///
    /// PvP sessions also get a collusion check against the opponent. Flags
    /// are advisory and never change the session.
    pub fn validate_replay(&self, id: SessionId) -> Result<Vec<AntiCheatFlag>> {
        let span = info_span!("validate_replay", session = %id);
        let _enter = span.enter();

        let session = self.load_session(id)?;
        let mut flags = self.validator.validate(&session.log);
        if let BattleMode::Pvp { opponent } = session.mode {
            let context = self.intel.collusion_context(session.user, opponent);
            flags.extend(self.validator.check_collusion(&context));
        }

        for flag in &flags {
            warn!(
                subject = %flag.subject,
                kind = %flag.kind,
                severity = %flag.severity,
                evidence = flag.evidence.len(),
                "anti-cheat flag raised"
            );
        }
        Ok(flags)
    }

    /// Sessions some call is working on right now.
    pub fn sessions_in_flight(&self) -> usize {
        self.locks.len()
    }

    pub fn load_session(&self, id: SessionId) -> Result<BattleSession> {
        let lock = self.locks.handle(id)?;
        let _guard = lock.lock()?;
        self.load_unlocked(id)
    }

    /// Moves every open session past its deadline to `Expired`.
    pub fn expire_stale(&self) -> Result<Vec<SessionId>> {
        let span = info_span!("expire_stale");
        let _enter = span.enter();

        let now = self.clock.now_ms();
        let engine = self.engine();
        let mut expired = Vec::new();
        for id in self.sessions.list_open()? {
            let lock = self.locks.handle(id)?;
            let _guard = lock.lock()?;

            let mut session = self.load_unlocked(id)?;
            if engine.expire(&mut session, now) {
                self.commit(&session, session.log.len())?;
                expired.push(id);
                info!(session = %id, expires_at = session.expires_at, "session expired");
            }
        }
        Ok(expired)
    }

    /// The user's open session of `kind`, unless it has run out of time.
    fn resume_open(&self, user: UserId, kind: ModeKind) -> Result<Option<BattleSession>> {
        let Some(id) = self.sessions.find_open(user, kind)? else {
            return Ok(None);
        };

        let lock = self.locks.handle(id)?;
        let _guard = lock.lock()?;
        let mut session = self.load_unlocked(id)?;
        if !self.engine().expire(&mut session, self.clock.now_ms()) {
            info!(session = %id, turn = session.turn, "resuming open session");
            return Ok(Some(session));
        }
        self.commit(&session, session.log.len())?;
        info!(session = %id, "stale session expired");
        Ok(None)
    }

    fn load_unlocked(&self, id: SessionId) -> Result<BattleSession> {
        let record = self
            .sessions
            .load(id)?
            .ok_or(RuntimeError::SessionNotFound(id))?;
        let log = self.actions.load(id)?;
        let committed = record.turn as usize;
        if log.len() > committed {
            warn!(
                session = %id,
                stored = log.len(),
                committed,
                "dropping uncommitted log entries"
            );
            self.actions.truncate(id, committed)?;
        }
        Ok(record.into_session(log)?)
    }

    /// Appends the turns past `logged` and saves the record.
    ///
    /// The record goes last so a failure leaves the previous commit intact;
    /// stray log entries are dropped on the next load.
    fn commit(&self, session: &BattleSession, logged: usize) -> Result<()> {
        let fresh = session.log.get(logged..).unwrap_or_default();
        if !fresh.is_empty() {
            self.actions.append(session.id, fresh)?;
        }
        self.sessions.save(&SessionRecord::from_session(session)?)?;
        Ok(())
    }

    /// Pays out and records progress for a session that just ended.
    fn settle(&self, session: &BattleSession) -> Result<()> {
        match session.status {
            SessionStatus::Completed => {
                if let Some(reward) = session.reward {
                    self.pay(session, &reward)?;
                }
                match session.mode {
                    BattleMode::Raid {
                        island, sequence, ..
                    } => {
                        self.progress
                            .advance_campaign(session.user, island, sequence)?;
                    }
                    BattleMode::Pvp { opponent } => {
                        self.intel.record_match(session.user, opponent, true);
                    }
                    BattleMode::Pve { .. } => {}
                }
                info!(
                    session = %session.id,
                    rounds = session.round(),
                    damage_dealt = session.damage_dealt,
                    damage_taken = session.damage_taken,
                    "session completed"
                );
            }
            SessionStatus::Failed => {
                if let BattleMode::Pvp { opponent } = session.mode {
                    self.intel.record_match(session.user, opponent, false);
                }
                info!(session = %session.id, rounds = session.round(), "session failed");
            }
            SessionStatus::InProgress | SessionStatus::Expired | SessionStatus::Abandoned => {}
        }
        Ok(())
    }

    fn pay(&self, session: &BattleSession, reward: &RewardIntent) -> Result<()> {
        let entries = reward_entries(session.user, reward);
        if !is_balanced(&entries) {
            return Err(RuntimeError::UnbalancedLedger(session.id));
        }
        if !entries.is_empty() {
            self.ledger.record_reward(session.id, &entries)?;
        }
        info!(
            session = %session.id,
            grade = %reward.grade,
            tokens = reward.tokens,
            xp = reward.xp,
            "reward recorded"
        );
        Ok(())
    }

    fn roster(&self, members: &[CharacterId]) -> Result<Vec<CharacterDefinition>> {
        members
            .iter()
            .map(|id| self.definitions.character(*id).map_err(RuntimeError::from))
            .collect()
    }

    fn opposition(
        &self,
        user: UserId,
        kind: ModeKind,
        target: Opposition,
    ) -> Result<(BattleMode, Vec<CharacterDefinition>, raid_core::RewardTable)> {
        let invalid = || RuntimeError::InvalidOpposition {
            kind,
            target: target.to_string(),
        };

        match (kind, target) {
            (ModeKind::Pve | ModeKind::Raid, Opposition::Mission(id)) => {
                let mission = self.definitions.mission(id)?;
                let mode = if kind == ModeKind::Raid {
                    BattleMode::Raid {
                        mission: id,
                        island: mission.island,
                        sequence: mission.sequence,
                    }
                } else {
                    BattleMode::Pve { mission: id }
                };
                Ok((mode, self.roster(&mission.enemies)?, mission.reward))
            }
            (ModeKind::Pvp, Opposition::Team(id)) => {
                let team = self.definitions.team(id)?;
                if team.owner == user {
                    return Err(invalid());
                }
                Ok((
                    BattleMode::Pvp {
                        opponent: team.owner,
                    },
                    self.roster(&team.members)?,
                    self.config.combat.pvp_reward,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

/// Balanced postings paying `reward` to `user` out of the treasury.
fn reward_entries(user: UserId, reward: &RewardIntent) -> Vec<LedgerEntry> {
    let mut entries = Vec::new();
    for (asset, amount) in [(Asset::Tokens, reward.tokens), (Asset::Xp, reward.xp)] {
        if amount == 0 {
            continue;
        }
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        entries.push(LedgerEntry {
            account: Account::User(user),
            asset,
            amount,
        });
        entries.push(LedgerEntry {
            account: Account::Treasury,
            asset,
            amount: -amount,
        });
    }
    entries
}

/// Builder for [`BattleService`].
///
/// Only the definition store is required; everything else defaults to the
/// in-memory implementations and the system clock.
pub struct BattleServiceBuilder {
    config: RuntimeConfig,
    definitions: Option<Arc<dyn DefinitionStore>>,
    sessions: Option<Arc<dyn SessionRepository>>,
    actions: Option<Arc<dyn ActionLogRepository>>,
    ledger: Option<Arc<dyn RewardLedger>>,
    progress: Option<Arc<dyn ProgressStore>>,
    intel: Option<Arc<dyn PlayerIntel>>,
    clock: Option<Arc<dyn Clock>>,
}

impl BattleServiceBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            definitions: None,
            sessions: None,
            actions: None,
            ledger: None,
            progress: None,
            intel: None,
            clock: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn definitions(mut self, definitions: Arc<dyn DefinitionStore>) -> Self {
        self.definitions = Some(definitions);
        self
    }

    pub fn sessions(mut self, sessions: Arc<dyn SessionRepository>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn actions(mut self, actions: Arc<dyn ActionLogRepository>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn ledger(mut self, ledger: Arc<dyn RewardLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressStore>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn intel(mut self, intel: Arc<dyn PlayerIntel>) -> Self {
        self.intel = Some(intel);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<BattleService> {
        let definitions = self.definitions.ok_or(RuntimeError::MissingDefinitions)?;
        let validator = ReplayValidator::new(self.config.anticheat.clone());

        Ok(BattleService {
            definitions,
            sessions: self
                .sessions
                .unwrap_or_else(|| Arc::new(InMemorySessionRepo::new())),
            actions: self
                .actions
                .unwrap_or_else(|| Arc::new(InMemoryActionLog::new())),
            ledger: self
                .ledger
                .unwrap_or_else(|| Arc::new(InMemoryLedger::new())),
            progress: self
                .progress
                .unwrap_or_else(|| Arc::new(InMemoryProgress::new())),
            intel: self.intel.unwrap_or_else(|| Arc::new(InMemoryIntel::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            locks: SessionLocks::new(),
            starts: Mutex::new(()),
            validator,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_entries_balance_and_skip_zero() {
        let reward = RewardIntent {
            tokens: 80,
            xp: 0,
            grade: raid_core::Grade::A,
            multiplier: 1.5,
        };
        let entries = reward_entries(UserId(3), &reward);
        assert_eq!(entries.len(), 2);
        assert!(is_balanced(&entries));
        assert_eq!(entries[0].amount, 80);
        assert_eq!(entries[1].account, Account::Treasury);
    }

    #[test]
    fn builder_requires_definitions() {
        assert!(matches!(
            BattleService::builder().build(),
            Err(RuntimeError::MissingDefinitions)
        ));
    }

    #[test]
    fn opposition_display() {
        assert_eq!(Opposition::Mission(MissionId(4)).to_string(), "mission:4");
        assert_eq!(Opposition::Team(TeamId(2)).to_string(), "team:2");
    }
}
