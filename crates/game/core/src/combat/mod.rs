//! Combat resolution system.
//!
//! Pure functions for resolving one exchange between two combatants. Nothing
//! here mutates a combatant; the engine applies the returned damage and
//! effects itself.
//!
//! # Pipeline
//!
//! 0. accuracy roll (skipped for self-target abilities)
//! 1. base value from power and offense
//! 2. defense reduction (skipped for true damage)
//! 3. element and class multipliers
//! 4. critical roll
//! 5. passives, then defensive effects
//! 6. variance
//! 7. round and clamp to at least 1

pub mod class;
pub mod damage;
pub mod elements;
pub mod hit;
pub mod result;

pub use class::{class_multiplier, crit_bonus, passive_multiplier};
pub use damage::{
    DamageContext, VarianceBand, defense_reduction, finalize_damage, pre_variance_damage,
};
pub use elements::element_multiplier;
pub use hit::{check_hit, crit_chance, hit_chance};
pub use result::{HitResult, Resolution, resolve_action, roll_effect};
