//! Damage calculation.

use crate::ability::{Ability, DamageType};
use crate::config::CombatConfig;
use crate::effects::StatusEffects;
use crate::session::CombatantSnapshot;
use crate::types::StatKind;

use super::class::{class_multiplier, passive_multiplier};
use super::elements::element_multiplier;

/// Half-width of the uniform damage variance, chosen per call site.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarianceBand(pub f64);

impl VarianceBand {
    /// Player-vs-player battles.
    pub const PVP: Self = Self(0.10);
    /// Raid and PvE encounters.
    pub const RAID: Self = Self(0.15);

    pub fn from_config(config: &CombatConfig) -> Self {
        Self(config.variance)
    }
}

/// Everything besides the two combatants that shapes one exchange.
#[derive(Clone, Copy, Debug)]
pub struct DamageContext<'a> {
    pub config: &'a CombatConfig,
    /// Team-wide effects of the attacker's side.
    pub attacker_team: &'a StatusEffects,
    /// Team-wide effects of the defender's side.
    pub defender_team: &'a StatusEffects,
    pub variance: VarianceBand,
}

/// Fraction of damage removed by `defense`.
///
/// # Formula
///
/// ```text
/// reduction = min(def / (def + K), max_reduction)
/// ```
pub fn defense_reduction(defense: u32, config: &CombatConfig) -> f64 {
    let defense = f64::from(defense);
    let denominator = defense + config.defense_constant;
    if denominator <= 0.0 {
        return 0.0;
    }
    (defense / denominator).min(config.max_defense_reduction)
}

/// Deterministic part of the damage formula (everything but variance and clamping).
///
/// # Formula
///
/// ```text
/// offense = attack                  (physical, true)
///         = attack × magic_scaling  (magical)
/// value   = power × offense × attack_mods / attack_reference
/// value  *= 1 - defense_reduction   (skipped for true damage)
/// value  *= element × class × crit × passives
/// value  /= defense_mods            (skipped for true damage)
/// ```
///
/// Attack and defense modifiers are the holder's own effects multiplied by
/// the holder's team effects.
pub fn pre_variance_damage(
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    ability: &Ability,
    ctx: &DamageContext<'_>,
    critical: bool,
) -> f64 {
    let config = ctx.config;
    let offense = match ability.damage_type {
        DamageType::Magical => f64::from(attacker.attack) * config.magic_scaling,
        DamageType::Physical | DamageType::True => f64::from(attacker.attack),
    };
    let attack_mods =
        attacker.effects.modifier(StatKind::Attack) * ctx.attacker_team.modifier(StatKind::Attack);

    let mut value = f64::from(ability.power) * offense * attack_mods / config.attack_reference;

    let true_damage = ability.damage_type == DamageType::True;
    if !true_damage {
        value *= 1.0 - defense_reduction(defender.defense, config);
    }

    value *= element_multiplier(ability.element, defender.element);
    value *= class_multiplier(attacker.class, defender.class);
    if critical {
        value *= config.crit_multiplier;
    }
    value *= passive_multiplier(
        attacker.class,
        attacker.hp_fraction(),
        defender.class,
        defender.hp_fraction(),
    );

    if !true_damage {
        let defense_mods = defender.effects.modifier(StatKind::Defense)
            * ctx.defender_team.modifier(StatKind::Defense);
        if defense_mods > 0.0 {
            value /= defense_mods;
        }
    }

    value
}

/// Applies variance, rounds, and enforces the 1-damage floor.
pub fn finalize_damage(pre_variance: f64, variance_factor: f64) -> u32 {
    let value = (pre_variance * variance_factor).round();
    if value.is_finite() && value >= 1.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}
