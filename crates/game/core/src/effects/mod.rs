//! Buff/debuff definitions and per-holder effect tracking.
//!
//! - [`catalog`]: the static table of named effect definitions
//! - [`status`]: stacking, duration, DoT and crowd-control rules for one holder

pub mod catalog;
pub mod status;

pub use catalog::{ControlFlags, EffectCatalog, EffectDefinition, EffectKind};
pub use status::{ActGate, ActiveEffect, ApplyOutcome, StatusEffects, TickReport};
