//! Append-only record of resolved turns.
//!
//! The same log feeds the client's battle playback, persistence, and the
//! anti-cheat replay validator.

use crate::effects::{ApplyOutcome, ControlFlags};
use crate::types::{AbilityId, CombatantId, Side, UserId};

/// Why an actor's turn was consumed without acting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// Blocked by the listed crowd-control effects.
    Controlled(ControlFlags),
    /// Fainted from damage-over-time during upkeep.
    FaintedDuringUpkeep,
}

/// What happened when the action resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnOutcome {
    /// Damage landed; for area abilities this is the total across targets.
    Hit { damage: u32, critical: bool },
    /// Every accuracy roll failed. The turn is still consumed.
    Miss,
    Skipped { reason: SkipReason },
    /// No damage was rolled (self-target or zero-power ability).
    Support,
}

/// Per-target line of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strike {
    pub target: CombatantId,
    pub damage: u32,
    pub critical: bool,
    pub missed: bool,
    pub hp_after: u32,
}

/// Who received an applied effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectHolder {
    Combatant(CombatantId),
    Team(Side),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedEffect {
    pub effect: String,
    pub holder: EffectHolder,
    pub outcome: ApplyOutcome,
}

/// Immutable record of one resolved action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResult {
    /// 1-based position in the session log.
    pub sequence: u32,
    pub round: u32,
    pub actor: CombatantId,
    /// Submitting user; `None` for AI-controlled turns.
    pub user: Option<UserId>,
    /// Chosen target (first struck combatant for area abilities).
    pub target: Option<CombatantId>,
    pub ability: AbilityId,
    pub outcome: TurnOutcome,
    pub strikes: Vec<Strike>,
    pub effects_applied: Vec<AppliedEffect>,
    /// Effects on the actor that expired during upkeep.
    pub effects_expired: Vec<String>,
    /// Damage-over-time the actor took during upkeep.
    pub dot_damage: u32,
    pub target_hp_after: Option<u32>,
    pub actor_hp_after: u32,
    /// Combatants that fainted during this turn, in order.
    pub fainted: Vec<CombatantId>,
    pub ai: bool,
    /// Wall-clock time the action was submitted (unix ms).
    pub submitted_at: u64,
}

impl TurnResult {
    pub fn total_damage(&self) -> u32 {
        self.strikes.iter().map(|s| s.damage).sum()
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Skipped { .. })
    }
}
