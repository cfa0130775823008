//! Unified error type surfaced by the battle service.
//!
//! Wraps engine, repository and collaborator failures so callers can bubble
//! them up with consistent context.

use raid_core::{BattleError, ModeKind, SessionId, TeamId, UserId};
use thiserror::Error;

pub use crate::collaborators::{DefinitionError, LedgerError, ProgressError};
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error("{0} not found")]
    SessionNotFound(SessionId),

    #[error("{user} does not own {session}")]
    NotSessionOwner { session: SessionId, user: UserId },

    #[error("{user} does not own {team}")]
    NotTeamOwner { team: TeamId, user: UserId },

    #[error("{kind} battles cannot be fought against {target}")]
    InvalidOpposition { kind: ModeKind, target: String },

    #[error("reward entries for {0} do not balance")]
    UnbalancedLedger(SessionId),

    #[error("session lock was poisoned")]
    LockPoisoned,

    #[error("battle service requires a definition store before building")]
    MissingDefinitions,
}

impl RuntimeError {
    /// Whether the caller sent a request the rules reject (as opposed to an
    /// infrastructure failure).
    pub fn is_rejection(&self) -> bool {
        match self {
            RuntimeError::Battle(err) => err.is_validation() || err.is_session_closed(),
            RuntimeError::NotSessionOwner { .. }
            | RuntimeError::NotTeamOwner { .. }
            | RuntimeError::InvalidOpposition { .. } => true,
            _ => false,
        }
    }
}
