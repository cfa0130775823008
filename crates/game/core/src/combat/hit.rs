//! Accuracy and critical-hit chances.

use crate::ability::Ability;
use crate::config::CombatConfig;
use crate::rng::BattleRng;
use crate::session::CombatantSnapshot;
use crate::types::StatKind;

use super::class::crit_bonus;

/// Hit chance in percent.
///
/// # Formula
///
/// ```text
/// hit_chance = ability.accuracy × attacker accuracy modifier
/// clamped to [0, 100]
/// ```
///
/// Blind (×0.6) and focus (×1.2) feed in through the modifier.
pub fn hit_chance(ability: &Ability, attacker: &CombatantSnapshot) -> f64 {
    (ability.accuracy * attacker.effects.modifier(StatKind::Accuracy)).clamp(0.0, 100.0)
}

/// Rolls a d100 against `chance`; a roll at or under the chance hits.
pub fn check_hit(chance: f64, rng: &mut impl BattleRng) -> bool {
    f64::from(rng.roll_d100()) <= chance
}

/// Critical chance in percent.
///
/// # Formula
///
/// ```text
/// crit = base + crit_per_ten_levels × level / 10 + class bonus
/// ```
pub fn crit_chance(attacker: &CombatantSnapshot, config: &CombatConfig) -> f64 {
    config.base_crit_chance
        + config.crit_per_ten_levels * f64::from(attacker.level) / 10.0
        + crit_bonus(attacker.class)
}
