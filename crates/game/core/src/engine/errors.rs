//! Errors surfaced by the battle engine.

use crate::error::{CombatError, ErrorSeverity};
use crate::resources::ResourceError;
use crate::scheduler::SchedulerError;
use crate::session::SessionStatus;
use crate::types::{AbilityId, CharacterId, CombatantId, Side, UserId};

/// Why a chosen target was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("a target is required")]
    Missing,
    #[error("no such combatant")]
    Unknown,
    #[error("target has fainted")]
    Fainted,
    #[error("target is on the wrong side")]
    WrongSide,
}

/// Errors returned by [`BattleEngine`](super::BattleEngine).
///
/// Any error means the session passed in is unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BattleError {
    #[error("session is {0}")]
    SessionClosed(SessionStatus),

    #[error("session expired at {expires_at} (now {now})")]
    SessionExpired { expires_at: u64, now: u64 },

    #[error("not {actual}'s turn: {expected} acts next")]
    WrongTurn {
        expected: CombatantId,
        actual: CombatantId,
    },

    #[error("combatant {0} is not controlled by the session owner")]
    NotPlayerControlled(CombatantId),

    #[error("{0} does not own this session")]
    NotSessionOwner(UserId),

    #[error("invalid target {target:?}: {reason}")]
    InvalidTarget {
        target: Option<CombatantId>,
        reason: TargetError,
    },

    #[error("unknown ability {0}")]
    UnknownAbility(AbilityId),

    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("{0} side has no combatants")]
    EmptyRoster(Side),

    #[error("{side} side has {size} combatants (max {max})")]
    RosterTooLarge { side: Side, size: usize, max: usize },

    #[error("cannot equip loadout of {character}: {source}")]
    InvalidLoadout {
        character: CharacterId,
        source: ResourceError,
    },

    #[error("combatant {0} is not in this session")]
    UnknownCombatant(CombatantId),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl BattleError {
    /// Rejected input; the caller may submit something else.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.severity(),
            ErrorSeverity::Validation | ErrorSeverity::Recoverable
        )
    }

    /// No action will ever succeed on this session again.
    pub fn is_session_closed(&self) -> bool {
        self.severity() == ErrorSeverity::Closed
    }
}

impl CombatError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        use BattleError::*;
        match self {
            SessionClosed(_) | SessionExpired { .. } => ErrorSeverity::Closed,
            Resource(inner) => inner.severity(),
            UnknownEffect(_) | UnknownCombatant(_) | Scheduler(_) => ErrorSeverity::Internal,
            WrongTurn { .. }
            | NotPlayerControlled(_)
            | NotSessionOwner(_)
            | InvalidTarget { .. }
            | UnknownAbility(_)
            | EmptyRoster(_)
            | RosterTooLarge { .. }
            | InvalidLoadout { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            SessionClosed(_) => "BATTLE_SESSION_CLOSED",
            SessionExpired { .. } => "BATTLE_SESSION_EXPIRED",
            WrongTurn { .. } => "BATTLE_WRONG_TURN",
            NotPlayerControlled(_) => "BATTLE_NOT_PLAYER_CONTROLLED",
            NotSessionOwner(_) => "BATTLE_NOT_SESSION_OWNER",
            InvalidTarget { .. } => "BATTLE_INVALID_TARGET",
            UnknownAbility(_) => "BATTLE_UNKNOWN_ABILITY",
            UnknownEffect(_) => "BATTLE_UNKNOWN_EFFECT",
            Resource(inner) => inner.error_code(),
            EmptyRoster(_) => "BATTLE_EMPTY_ROSTER",
            RosterTooLarge { .. } => "BATTLE_ROSTER_TOO_LARGE",
            InvalidLoadout { .. } => "BATTLE_INVALID_LOADOUT",
            UnknownCombatant(_) => "BATTLE_UNKNOWN_COMBATANT",
            Scheduler(inner) => inner.error_code(),
        }
    }
}
