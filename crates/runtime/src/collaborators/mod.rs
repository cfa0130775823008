//! Services the battle service depends on but does not own.
//!
//! - [`DefinitionStore`]: read-only character, team, mission and ability data
//! - [`RewardLedger`]: balanced payout of completed sessions
//! - [`ProgressStore`]: campaign position per user
//! - [`PlayerIntel`]: relationship facts used by collusion checks
//!
//! [`memory`] provides in-process implementations for tests and the CLI.

pub mod memory;

pub use memory::{InMemoryIntel, InMemoryLedger, InMemoryProgress, StaticDefinitions};

use raid_core::{
    AbilityOracle, CharacterDefinition, CharacterId, CollusionContext, EffectCatalog,
    MissionDefinition, MissionId, SessionId, TeamDefinition, TeamId, UserId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("unknown {0}")]
    UnknownCharacter(CharacterId),
    #[error("unknown {0}")]
    UnknownTeam(TeamId),
    #[error("unknown {0}")]
    UnknownMission(MissionId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("reward for {0} was already recorded")]
    AlreadyRecorded(SessionId),
    #[error("ledger lock was poisoned")]
    LockPoisoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("progress lock was poisoned")]
    LockPoisoned,
}

/// Read-only lookup of content definitions.
pub trait DefinitionStore: Send + Sync {
    fn character(&self, id: CharacterId) -> Result<CharacterDefinition, DefinitionError>;
    fn team(&self, id: TeamId) -> Result<TeamDefinition, DefinitionError>;
    fn mission(&self, id: MissionId) -> Result<MissionDefinition, DefinitionError>;
    fn abilities(&self) -> &dyn AbilityOracle;
    fn effect_catalog(&self) -> &EffectCatalog;
}

/// Side of a ledger posting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Account {
    User(UserId),
    /// Source of every reward.
    Treasury,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    Tokens,
    Xp,
}

/// One signed posting; credits are positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub account: Account,
    pub asset: Asset,
    pub amount: i64,
}

/// Whether every asset's postings sum to zero.
pub fn is_balanced(entries: &[LedgerEntry]) -> bool {
    [Asset::Tokens, Asset::Xp].iter().all(|asset| {
        entries
            .iter()
            .filter(|e| e.asset == *asset)
            .map(|e| i128::from(e.amount))
            .sum::<i128>()
            == 0
    })
}

pub trait RewardLedger: Send + Sync {
    /// Records the payout of one session. Called at most once per session.
    fn record_reward(&self, session: SessionId, entries: &[LedgerEntry]) -> Result<(), LedgerError>;
}

pub trait ProgressStore: Send + Sync {
    /// Marks `(island, sequence)` as cleared; never moves progress backwards.
    fn advance_campaign(
        &self,
        user: UserId,
        island: u32,
        sequence: u32,
    ) -> Result<(), ProgressError>;

    /// Furthest `(island, sequence)` cleared by `user`.
    fn campaign_position(&self, user: UserId) -> Result<Option<(u32, u32)>, ProgressError>;
}

pub trait PlayerIntel: Send + Sync {
    fn collusion_context(&self, player: UserId, opponent: UserId) -> CollusionContext;

    /// Records a finished PvP match between the two users.
    fn record_match(&self, player: UserId, opponent: UserId, player_won: bool);
}
