//! Persisted shape of a battle session.

use raid_core::{
    BattleMode, BattleSession, CombatantSnapshot, RewardIntent, RewardTable, SessionId, SessionRng,
    SessionStatus, StatusEffects, TurnQueue, TurnResult, UserId,
};
use serde::{Deserialize, Serialize};

use super::{RepositoryError, Result};

/// Row stored for one session.
///
/// Scalars are plain columns so stores can index and query them; queue,
/// combatant and team-effect state travel as JSON blobs. The turn log lives
/// in the action-log repository. The simulation never touches this type:
/// [`SessionRecord::from_session`] and [`SessionRecord::into_session`] are
/// the only conversions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user: UserId,
    pub mode: BattleMode,
    pub status: SessionStatus,
    pub turn: u32,
    pub round: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub starting_hp: [u32; 2],
    pub team_ticked_round: [u32; 2],
    pub rng_state: u64,
    pub base_reward: RewardTable,
    pub started_at: u64,
    pub expires_at: u64,
    pub last_action_at: u64,
    pub reward: Option<RewardIntent>,

    pub turn_queue: String,
    pub combatant_states: String,
    /// Team-wide effects, player side first.
    pub active_effects: String,
}

impl SessionRecord {
    pub fn from_session(session: &BattleSession) -> Result<Self> {
        Ok(Self {
            id: session.id,
            user: session.user,
            mode: session.mode,
            status: session.status,
            turn: session.turn,
            round: session.round(),
            damage_dealt: session.damage_dealt,
            damage_taken: session.damage_taken,
            starting_hp: session.starting_hp,
            team_ticked_round: session.team_ticked_round,
            rng_state: session.rng.state(),
            base_reward: session.base_reward,
            started_at: session.started_at,
            expires_at: session.expires_at,
            last_action_at: session.last_action_at,
            reward: session.reward,
            turn_queue: serde_json::to_string(&session.queue)
                .map_err(RepositoryError::json("turn_queue"))?,
            combatant_states: serde_json::to_string(&session.combatants)
                .map_err(RepositoryError::json("combatant_states"))?,
            active_effects: serde_json::to_string(&session.team_effects)
                .map_err(RepositoryError::json("active_effects"))?,
        })
    }

    /// Rebuilds the session from this record and its stored log.
    ///
    /// Log entries past `turn` are dropped; fewer entries than `turn` means
    /// the log and record disagree.
    pub fn into_session(self, mut log: Vec<TurnResult>) -> Result<BattleSession> {
        let queue: TurnQueue = serde_json::from_str(&self.turn_queue)
            .map_err(RepositoryError::json("turn_queue"))?;
        let combatants: Vec<CombatantSnapshot> = serde_json::from_str(&self.combatant_states)
            .map_err(RepositoryError::json("combatant_states"))?;
        let team_effects: [StatusEffects; 2] = serde_json::from_str(&self.active_effects)
            .map_err(RepositoryError::json("active_effects"))?;

        if queue.round() != self.round {
            return Err(RepositoryError::CorruptedData {
                session: self.id,
                reason: format!("round column {} but queue at {}", self.round, queue.round()),
            });
        }
        let turns = self.turn as usize;
        if log.len() < turns {
            return Err(RepositoryError::CorruptedData {
                session: self.id,
                reason: format!("{} turns recorded but {} logged", turns, log.len()),
            });
        }
        log.truncate(turns);

        Ok(BattleSession {
            id: self.id,
            user: self.user,
            mode: self.mode,
            status: self.status,
            turn: self.turn,
            queue,
            combatants,
            team_effects,
            team_ticked_round: self.team_ticked_round,
            damage_dealt: self.damage_dealt,
            damage_taken: self.damage_taken,
            starting_hp: self.starting_hp,
            rng: SessionRng::from_state(self.rng_state),
            base_reward: self.base_reward,
            started_at: self.started_at,
            expires_at: self.expires_at,
            last_action_at: self.last_action_at,
            log,
            reward: self.reward,
        })
    }
}
