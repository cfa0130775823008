//! Battle session aggregate.
//!
//! A [`BattleSession`] is the aggregate root the engine mutates: combatants,
//! turn queue, team-wide effects, RNG state, the turn log and, once the
//! battle is won, the reward intent. The engine never persists it; the
//! runtime serializes it at its own boundary.
mod combatant;
mod log;
mod reward;

pub use combatant::CombatantSnapshot;
pub use log::{AppliedEffect, EffectHolder, SkipReason, Strike, TurnOutcome, TurnResult};
pub use reward::{Grade, RewardIntent, RewardTable, grade_performance};

use strum::{AsRefStr, Display, EnumString};

use crate::effects::StatusEffects;
use crate::rng::SessionRng;
use crate::scheduler::{SchedulerError, TurnQueue, TurnQueueEntry};
use crate::types::{CombatantId, MissionId, SessionId, Side, UserId};

/// What kind of battle a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleMode {
    /// Single PvE mission.
    Pve { mission: MissionId },
    /// Campaign raid stage on an island.
    Raid {
        mission: MissionId,
        island: u32,
        sequence: u32,
    },
    /// Asynchronous battle against another user's AI-driven team.
    Pvp { opponent: UserId },
}

/// Mode discriminant; a user may hold one open session per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModeKind {
    Pve,
    Raid,
    Pvp,
}

impl BattleMode {
    pub const fn kind(&self) -> ModeKind {
        match self {
            BattleMode::Pve { .. } => ModeKind::Pve,
            BattleMode::Raid { .. } => ModeKind::Raid,
            BattleMode::Pvp { .. } => ModeKind::Pvp,
        }
    }

    pub const fn is_pvp(&self) -> bool {
        matches!(self, BattleMode::Pvp { .. })
    }
}

/// Lifecycle state. Every state except `InProgress` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    /// Every enemy fainted.
    Completed,
    /// Every player combatant fainted.
    Failed,
    Abandoned,
    Expired,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

/// Identity and randomness a session starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSeed {
    pub id: SessionId,
    pub user: UserId,
    pub mode: BattleMode,
    pub seed: u64,
    /// Unix ms.
    pub started_at: u64,
    /// Base payout before grading. PvP sessions use the configured PvP table instead.
    pub reward: RewardTable,
}

/// One battle, from start to terminal state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    pub id: SessionId,
    pub user: UserId,
    pub mode: BattleMode,
    pub status: SessionStatus,
    /// Number of resolved turns, AI turns included.
    pub turn: u32,
    pub queue: TurnQueue,
    /// Players first in team order, then enemies; index is not the id.
    pub combatants: Vec<CombatantSnapshot>,
    /// Team-wide effects, indexed by [`Side::index`].
    pub team_effects: [StatusEffects; 2],
    /// Round in which each side's team effects last ticked.
    pub team_ticked_round: [u32; 2],
    /// Damage the player side dealt, DoT included.
    pub damage_dealt: u64,
    /// Damage the player side received, DoT included.
    pub damage_taken: u64,
    /// Total HP of each side at session start, indexed by [`Side::index`].
    pub starting_hp: [u32; 2],
    pub rng: SessionRng,
    pub base_reward: RewardTable,
    pub started_at: u64,
    pub expires_at: u64,
    pub last_action_at: u64,
    pub log: Vec<TurnResult>,
    pub reward: Option<RewardIntent>,
}

impl BattleSession {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn round(&self) -> u32 {
        self.queue.round()
    }

    pub fn current(&self) -> Result<&TurnQueueEntry, SchedulerError> {
        self.queue.current()
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut CombatantSnapshot> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &CombatantSnapshot> {
        self.combatants.iter().filter(move |c| c.side == side)
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &CombatantSnapshot> {
        self.side(side).filter(|c| c.is_alive())
    }

    pub fn living_ids(&self) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    pub fn is_defeated(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    pub fn team_effects(&self, side: Side) -> &StatusEffects {
        &self.team_effects[side.index()]
    }

    /// Fraction of the side's starting HP that is gone.
    pub fn hp_lost_fraction(&self, side: Side) -> f64 {
        let start = self.starting_hp[side.index()];
        if start == 0 {
            return 0.0;
        }
        let remaining: u64 = self.side(side).map(|c| u64::from(c.hp)).sum();
        let lost = u64::from(start).saturating_sub(remaining);
        lost as f64 / f64::from(start)
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user == user
    }
}
