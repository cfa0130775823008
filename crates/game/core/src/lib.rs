//! Deterministic combat rules for raids, PvE missions and PvP battles.
//!
//! `raid-core` defines the canonical resolution rules (damage, effects,
//! resources, scheduling, the session state machine and replay analysis) as
//! pure APIs that both the runtime and offline tools reuse. All session
//! mutation flows through [`engine::BattleEngine`]; every roll draws from the
//! session's own [`rng::SessionRng`], so the same inputs always replay the
//! same battle.
pub mod ability;
pub mod anticheat;
pub mod combat;
pub mod config;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod resources;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod types;

pub use ability::{
    Ability, DamageType, EffectApplication, EffectScope, ResourceModel, TargetShape,
    UnlockRequirements,
};
pub use anticheat::{
    AntiCheatConfig, AntiCheatFlag, CollusionContext, Evidence, FlagKind, FlagSeverity,
    HeadToHead, ReplayValidator,
};
pub use combat::{DamageContext, Resolution, VarianceBand, resolve_action};
pub use config::{CombatConfig, GradeBucket};
pub use effects::{
    ActiveEffect, ApplyOutcome, ControlFlags, EffectCatalog, EffectDefinition, EffectKind,
    StatusEffects,
};
pub use engine::{BattleEngine, BattleError, PlayerAction, TargetError};
pub use env::{
    AbilityOracle, AbilityTable, CharacterDefinition, CombatEnv, MissionDefinition,
    TeamDefinition,
};
pub use error::{CombatError, ErrorSeverity};
pub use resources::{ResourceError, UnlockGate};
pub use rng::{BattleRng, SessionRng, compute_seed};
pub use scheduler::{SchedulerError, TurnQueue, TurnQueueEntry};
pub use session::{
    BattleMode, BattleSession, CombatantSnapshot, Grade, ModeKind, RewardIntent, RewardTable,
    SessionSeed, SessionStatus, SkipReason, TurnOutcome, TurnResult,
};
pub use types::{
    AbilityId, CharacterClass, CharacterId, CombatantId, Controller, Element, MissionId, Rarity,
    SessionId, Side, StatKind, TeamId, UserId,
};
