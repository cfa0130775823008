//! Action selection for AI-controlled combatants.

use crate::ability::TargetShape;
use crate::env::CombatEnv;
use crate::resources;
use crate::rng::BattleRng;
use crate::session::BattleSession;

use super::PlayerAction;

/// Picks an action for the combatant at `index`.
///
/// The target is always the living opponent with the lowest HP (lowest id
/// on ties). The basic attack is used when no equipped skill is usable, or
/// with `ai_basic_attack_chance`; otherwise a usable skill is drawn with
/// probability proportional to its power.
///
/// Returns `None` when no opponent is standing.
pub(crate) fn choose_action(
    env: &CombatEnv<'_>,
    session: &mut BattleSession,
    index: usize,
) -> Option<PlayerAction> {
    let actor = &session.combatants[index];
    let target = session
        .living(actor.side.opponent())
        .min_by_key(|c| (c.hp, c.id))?
        .id;

    let usable: Vec<_> = actor
        .equipped
        .iter()
        .filter_map(|id| env.ability(id))
        .filter(|ability| resources::can_use(ability, actor).is_ok())
        .map(|ability| (ability.id, ability.power.max(1), ability.target))
        .collect();

    let basic = PlayerAction::BasicAttack { target };
    if usable.is_empty() || session.rng.chance(env.config().ai_basic_attack_chance) {
        return Some(basic);
    }

    let total: u32 = usable.iter().map(|(_, weight, _)| weight).sum();
    let mut roll = session.rng.below(total as usize) as u32;
    for (ability, weight, shape) in usable {
        if roll < weight {
            let target = match shape {
                TargetShape::Single => Some(target),
                TargetShape::AllEnemies | TargetShape::SelfTarget => None,
            };
            return Some(PlayerAction::Ability { ability, target });
        }
        roll -= weight;
    }
    Some(basic)
}
