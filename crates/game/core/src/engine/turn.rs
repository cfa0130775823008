//! One turn: upkeep, resolution, terminal check, queue upkeep.
//!
//! Everything here mutates the session it is given. The engine only ever
//! hands in a working copy, so an error part-way through leaves the
//! caller's session untouched.

use crate::ability::{Ability, EffectApplication, EffectScope, TargetShape};
use crate::combat::{DamageContext, Resolution, VarianceBand, resolve_action, roll_effect};
use crate::effects::ActGate;
use crate::env::CombatEnv;
use crate::resources;
use crate::session::{
    AppliedEffect, BattleMode, BattleSession, EffectHolder, SessionStatus, SkipReason, Strike,
    TurnOutcome, TurnResult,
};
use crate::types::{CombatantId, Side};

use super::errors::{BattleError, TargetError};
use super::{PlayerAction, upkeep};

/// Variance band for the session's mode.
pub(crate) fn variance_for(env: &CombatEnv<'_>, mode: &BattleMode) -> VarianceBand {
    match mode {
        BattleMode::Pvp { .. } => VarianceBand::PVP,
        BattleMode::Raid { .. } => VarianceBand::RAID,
        BattleMode::Pve { .. } => VarianceBand::from_config(env.config()),
    }
}

/// Checks that `action`'s target fits the ability's target shape.
pub(crate) fn check_target(
    session: &BattleSession,
    actor: CombatantId,
    ability: &Ability,
    target: Option<CombatantId>,
) -> Result<(), BattleError> {
    let invalid = |reason| BattleError::InvalidTarget { target, reason };
    let actor_side = session
        .combatant(actor)
        .ok_or(BattleError::UnknownCombatant(actor))?
        .side;

    match (ability.target, target) {
        (TargetShape::Single, None) => Err(invalid(TargetError::Missing)),
        (TargetShape::SelfTarget, Some(id)) if id != actor => Err(invalid(TargetError::WrongSide)),
        (TargetShape::SelfTarget, _) | (TargetShape::AllEnemies, None) => Ok(()),
        (TargetShape::Single | TargetShape::AllEnemies, Some(id)) => {
            let target = session
                .combatant(id)
                .ok_or_else(|| invalid(TargetError::Unknown))?;
            if target.side == actor_side {
                Err(invalid(TargetError::WrongSide))
            } else if target.fainted {
                Err(invalid(TargetError::Fainted))
            } else {
                Ok(())
            }
        }
    }
}

/// What the action itself did, after upkeep.
struct Performed {
    outcome: TurnOutcome,
    strikes: Vec<Strike>,
    applied: Vec<AppliedEffect>,
}

/// Resolves one full turn for `actor` and appends it to the log.
pub(crate) fn play_turn(
    env: &CombatEnv<'_>,
    session: &mut BattleSession,
    actor: CombatantId,
    action: &PlayerAction,
    now_ms: u64,
    ai: bool,
) -> Result<TurnResult, BattleError> {
    let index = session
        .index_of(actor)
        .ok_or(BattleError::UnknownCombatant(actor))?;
    let round = session.round();

    let upkeep = upkeep::run(env, session, index);
    let mut fainted = Vec::new();
    if upkeep.fainted {
        fainted.push(actor);
    }

    let performed = if upkeep.fainted {
        Performed::skipped(SkipReason::FaintedDuringUpkeep)
    } else if let ActGate::Blocked(flags) = upkeep.gate {
        Performed::skipped(SkipReason::Controlled(flags))
    } else {
        perform(env, session, index, action, &mut fainted)?
    };

    session.turn += 1;
    let actor_state = &session.combatants[index];
    let target = performed.strikes.first().map(|s| s.target).or(action.target());
    let result = TurnResult {
        sequence: session.turn,
        round,
        actor,
        user: actor_state.controller.user(),
        target,
        ability: action.ability(),
        outcome: performed.outcome,
        target_hp_after: target.and_then(|id| session.combatant(id)).map(|c| c.hp),
        strikes: performed.strikes,
        effects_applied: performed.applied,
        effects_expired: upkeep.tick.expired,
        dot_damage: upkeep.dot_taken,
        actor_hp_after: actor_state.hp,
        fainted,
        ai,
        submitted_at: now_ms,
    };

    settle(session, !result.fainted.is_empty())?;
    session.log.push(result.clone());
    Ok(result)
}

/// Terminal check, then queue upkeep if the battle goes on.
fn settle(session: &mut BattleSession, roster_changed: bool) -> Result<(), BattleError> {
    if session.is_defeated(Side::Player) {
        session.status = SessionStatus::Failed;
    } else if session.is_defeated(Side::Enemy) {
        session.status = SessionStatus::Completed;
    }
    if session.is_terminal() {
        return Ok(());
    }

    session.queue.advance()?;
    if roster_changed {
        let living: Vec<_> = session
            .combatants
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| c.queue_entry())
            .collect();
        session.queue.rebuild(living);
    }
    Ok(())
}

impl Performed {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            outcome: TurnOutcome::Skipped { reason },
            strikes: Vec::new(),
            applied: Vec::new(),
        }
    }
}

fn perform(
    env: &CombatEnv<'_>,
    session: &mut BattleSession,
    index: usize,
    action: &PlayerAction,
    fainted: &mut Vec<CombatantId>,
) -> Result<Performed, BattleError> {
    let ability = env
        .ability(action.ability())
        .ok_or(BattleError::UnknownAbility(action.ability()))?;

    resources::spend(ability, &mut session.combatants[index])?;

    let attacker_side = session.combatants[index].side;
    let targets: Vec<usize> = match ability.target {
        TargetShape::Single => {
            let id = action.target().ok_or(BattleError::InvalidTarget {
                target: None,
                reason: TargetError::Missing,
            })?;
            let target = session.index_of(id).ok_or(BattleError::InvalidTarget {
                target: Some(id),
                reason: TargetError::Unknown,
            })?;
            vec![target]
        }
        TargetShape::AllEnemies => session
            .combatants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.side != attacker_side && c.is_alive())
            .map(|(i, _)| i)
            .collect(),
        TargetShape::SelfTarget => Vec::new(),
    };

    let variance = variance_for(env, &session.mode);
    let mut strikes = Vec::with_capacity(targets.len());
    let mut triggered: Vec<(usize, EffectApplication)> = Vec::new();

    for &target in &targets {
        let resolution = {
            let attacker = &session.combatants[index];
            let defender = &session.combatants[target];
            let ctx = DamageContext {
                config: env.config(),
                attacker_team: &session.team_effects[attacker.side.index()],
                defender_team: &session.team_effects[defender.side.index()],
                variance,
            };
            resolve_action(attacker, defender, ability, &ctx, &mut session.rng)
        };

        let defender = &mut session.combatants[target];
        match resolution {
            Resolution::Miss => strikes.push(Strike {
                target: defender.id,
                damage: 0,
                critical: false,
                missed: true,
                hp_after: defender.hp,
            }),
            Resolution::Hit(hit) => {
                let was_alive = defender.is_alive();
                let lost = defender.take_damage(hit.damage);
                if hit.damage > 0 {
                    defender.effects.wake_on_damage();
                }
                if was_alive && defender.fainted {
                    fainted.push(defender.id);
                }
                strikes.push(Strike {
                    target: defender.id,
                    damage: hit.damage,
                    critical: hit.critical,
                    missed: false,
                    hp_after: defender.hp,
                });
                let defender_side = defender.side;
                account(session, attacker_side, defender_side, lost);
                if let Some(application) = hit.triggered_effect {
                    triggered.push((target, application));
                }
            }
        }
    }

    if ability.target == TargetShape::SelfTarget {
        if let Some(application) = roll_effect(ability, &mut session.rng) {
            triggered.push((index, application));
        }
    }

    let applied = apply_effects(env, session, index, triggered)?;
    resources::start_cooldown(ability, &mut session.combatants[index]);

    Ok(Performed {
        outcome: summarize(ability, &strikes),
        strikes,
        applied,
    })
}

fn account(session: &mut BattleSession, attacker: Side, defender: Side, amount: u32) {
    if attacker == Side::Player && defender == Side::Enemy {
        session.damage_dealt += u64::from(amount);
    }
    if defender == Side::Player && attacker == Side::Enemy {
        session.damage_taken += u64::from(amount);
    }
}

/// Applies triggered effects by scope.
///
/// Target-scoped effects land on each struck combatant still standing.
/// Caster and team scopes apply once per action however many targets
/// triggered them.
fn apply_effects(
    env: &CombatEnv<'_>,
    session: &mut BattleSession,
    caster: usize,
    triggered: Vec<(usize, EffectApplication)>,
) -> Result<Vec<AppliedEffect>, BattleError> {
    let caster_side = session.combatants[caster].side;
    let mut applied = Vec::new();
    let mut once_applied = false;

    for (target, application) in triggered {
        let definition = env
            .effects()
            .get(&application.effect)
            .ok_or_else(|| BattleError::UnknownEffect(application.effect.clone()))?;
        let duration = application.duration.unwrap_or(definition.duration);

        let (holder, outcome) = match application.scope {
            EffectScope::Target => {
                let holder = &mut session.combatants[target];
                if holder.fainted {
                    continue;
                }
                (
                    EffectHolder::Combatant(holder.id),
                    holder.effects.apply(definition, duration),
                )
            }
            _ if once_applied => continue,
            EffectScope::Caster => {
                once_applied = true;
                let holder = &mut session.combatants[caster];
                (
                    EffectHolder::Combatant(holder.id),
                    holder.effects.apply(definition, duration),
                )
            }
            EffectScope::CasterTeam | EffectScope::TargetTeam => {
                once_applied = true;
                let side = if application.scope == EffectScope::CasterTeam {
                    caster_side
                } else {
                    caster_side.opponent()
                };
                (
                    EffectHolder::Team(side),
                    session.team_effects[side.index()].apply(definition, duration),
                )
            }
        };

        applied.push(AppliedEffect {
            effect: application.effect,
            holder,
            outcome,
        });
    }

    Ok(applied)
}

fn summarize(ability: &Ability, strikes: &[Strike]) -> TurnOutcome {
    if !strikes.is_empty() && strikes.iter().all(|s| s.missed) {
        return TurnOutcome::Miss;
    }
    if !ability.deals_damage() {
        return TurnOutcome::Support;
    }
    TurnOutcome::Hit {
        damage: strikes.iter().map(|s| s.damage).sum(),
        critical: strikes.iter().any(|s| s.critical),
    }
}
