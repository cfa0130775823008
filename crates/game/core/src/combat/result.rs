//! Action resolution.

use crate::ability::{Ability, EffectApplication, TargetShape};
use crate::rng::BattleRng;
use crate::session::CombatantSnapshot;

use super::damage::{DamageContext, finalize_damage, pre_variance_damage};
use super::hit::{check_hit, crit_chance, hit_chance};

/// A successful accuracy roll.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitResult {
    /// Zero only for abilities that do not deal damage.
    pub damage: u32,
    pub critical: bool,
    /// The ability's effect, when its chance roll succeeded. Applying it is
    /// up to the caller.
    pub triggered_effect: Option<EffectApplication>,
}

/// Outcome of one attacker/defender exchange.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    Miss,
    Hit(HitResult),
}

impl Resolution {
    pub fn damage(&self) -> u32 {
        match self {
            Resolution::Miss => 0,
            Resolution::Hit(hit) => hit.damage,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Resolution::Miss)
    }
}

/// Rolls the ability's effect chance.
pub fn roll_effect(ability: &Ability, rng: &mut impl BattleRng) -> Option<EffectApplication> {
    ability
        .effect
        .as_ref()
        .filter(|effect| rng.chance(effect.chance))
        .cloned()
}

/// Resolves `ability` from `attacker` against `defender`.
///
/// Pure apart from the RNG. Rolls are drawn in a fixed order (accuracy,
/// critical, variance, effect chance) so a replay with the same RNG state
/// reproduces the same result.
///
/// A miss consumes the turn but deals nothing and triggers nothing. Damage
/// is never below 1 for abilities that deal damage.
pub fn resolve_action(
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    ability: &Ability,
    ctx: &DamageContext<'_>,
    rng: &mut impl BattleRng,
) -> Resolution {
    if ability.target != TargetShape::SelfTarget
        && !check_hit(hit_chance(ability, attacker), rng)
    {
        return Resolution::Miss;
    }

    if !ability.deals_damage() {
        return Resolution::Hit(HitResult {
            damage: 0,
            critical: false,
            triggered_effect: roll_effect(ability, rng),
        });
    }

    let critical = rng.chance(crit_chance(attacker, ctx.config));
    let pre_variance = pre_variance_damage(attacker, defender, ability, ctx, critical);
    let damage = finalize_damage(pre_variance, rng.variance(ctx.variance.0));

    Resolution::Hit(HitResult {
        damage,
        critical,
        triggered_effect: roll_effect(ability, rng),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::EffectScope;
    use crate::combat::VarianceBand;
    use crate::config::CombatConfig;
    use crate::effects::{EffectCatalog, StatusEffects};
    use crate::rng::{ScriptedRng, SessionRng};
    use crate::session::test_support::combatant;
    use crate::types::{AbilityId, CombatantId, Side};

    fn no_crit_config() -> CombatConfig {
        CombatConfig {
            base_crit_chance: 0.0,
            crit_per_ten_levels: 0.0,
            ..CombatConfig::default()
        }
    }

    #[test]
    fn damage_lands_inside_variance_band() {
        let config = no_crit_config();
        let empty = StatusEffects::empty();
        let ctx = DamageContext {
            config: &config,
            attacker_team: &empty,
            defender_team: &empty,
            variance: VarianceBand::PVP,
        };
        let attacker = combatant(CombatantId(1), Side::Player, 100, 50, 10, 10);
        let defender = combatant(CombatantId(2), Side::Enemy, 100, 10, 20, 10);
        let ability = Ability::new(AbilityId(1), "Slash", 40);

        for seed in 0..200 {
            let mut rng = SessionRng::from_seed(seed);
            let resolution = resolve_action(&attacker, &defender, &ability, &ctx, &mut rng);
            let Resolution::Hit(hit) = resolution else {
                panic!("100 accuracy never misses");
            };
            assert!(!hit.critical);
            assert!((60..=73).contains(&hit.damage), "damage {} out of band", hit.damage);
        }
    }

    #[test]
    fn damage_never_below_one() {
        let config = no_crit_config();
        let empty = StatusEffects::empty();
        let ctx = DamageContext {
            config: &config,
            attacker_team: &empty,
            defender_team: &empty,
            variance: VarianceBand::RAID,
        };
        let attacker = combatant(CombatantId(1), Side::Player, 100, 1, 10, 10);
        let defender = combatant(CombatantId(2), Side::Enemy, 100, 10, u32::MAX, 10);
        let ability = Ability::new(AbilityId(1), "Poke", 1);

        for seed in 0..50 {
            let mut rng = SessionRng::from_seed(seed);
            assert_eq!(
                resolve_action(&attacker, &defender, &ability, &ctx, &mut rng).damage(),
                1
            );
        }
    }

    #[test]
    fn miss_triggers_nothing() {
        let config = CombatConfig::default();
        let empty = StatusEffects::empty();
        let ctx = DamageContext {
            config: &config,
            attacker_team: &empty,
            defender_team: &empty,
            variance: VarianceBand::PVP,
        };
        let attacker = combatant(CombatantId(1), Side::Player, 100, 50, 10, 10);
        let defender = combatant(CombatantId(2), Side::Enemy, 100, 10, 20, 10);
        let ability = Ability::new(AbilityId(1), "Wild Swing", 40)
            .with_accuracy(50.0)
            .with_effect(EffectApplication::new(EffectCatalog::BURN, EffectScope::Target));

        // d100 roll of 100.
        let mut rng = ScriptedRng::new(vec![99]);
        assert_eq!(
            resolve_action(&attacker, &defender, &ability, &ctx, &mut rng),
            Resolution::Miss
        );
    }

    #[test]
    fn crit_multiplies_damage() {
        let config = CombatConfig {
            base_crit_chance: 100.0,
            ..CombatConfig::default()
        };
        let empty = StatusEffects::empty();
        let ctx = DamageContext {
            config: &config,
            attacker_team: &empty,
            defender_team: &empty,
            variance: VarianceBand(0.0),
        };
        let attacker = combatant(CombatantId(1), Side::Player, 100, 25, 10, 10);
        let defender = combatant(CombatantId(2), Side::Enemy, 100, 10, 0, 10);
        let ability = Ability::new(AbilityId(1), "Slash", 40);

        let mut rng = SessionRng::from_seed(1);
        let Resolution::Hit(hit) = resolve_action(&attacker, &defender, &ability, &ctx, &mut rng)
        else {
            panic!("expected a hit");
        };
        assert!(hit.critical);
        assert_eq!(hit.damage, 60);
    }

    #[test]
    fn guaranteed_effect_is_reported_not_applied() {
        let config = no_crit_config();
        let empty = StatusEffects::empty();
        let ctx = DamageContext {
            config: &config,
            attacker_team: &empty,
            defender_team: &empty,
            variance: VarianceBand::PVP,
        };
        let attacker = combatant(CombatantId(1), Side::Player, 100, 50, 10, 10);
        let defender = combatant(CombatantId(2), Side::Enemy, 100, 10, 20, 10);
        let ability = Ability::new(AbilityId(1), "Flame Slash", 40)
            .with_effect(EffectApplication::new(EffectCatalog::BURN, EffectScope::Target));

        let mut rng = SessionRng::from_seed(5);
        let Resolution::Hit(hit) = resolve_action(&attacker, &defender, &ability, &ctx, &mut rng)
        else {
            panic!("expected a hit");
        };
        assert_eq!(
            hit.triggered_effect.map(|e| e.effect),
            Some(EffectCatalog::BURN.to_string())
        );
        assert!(defender.effects.is_empty());
    }
}
