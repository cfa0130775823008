//! Start-of-turn upkeep for the acting combatant.
//!
//! Order matters:
//!
//! 1. crowd-control gate, on the effects as they stand
//! 2. status tick (DoT, decrement, expire)
//! 3. team-effect tick, once per round per side
//! 4. cooldown decrement and mana regen

use crate::effects::{ActGate, TickReport};
use crate::env::CombatEnv;
use crate::resources;
use crate::session::BattleSession;
use crate::types::Side;

pub(crate) struct Upkeep {
    pub gate: ActGate,
    pub tick: TickReport,
    /// HP actually lost to damage-over-time.
    pub dot_taken: u32,
    /// The actor fainted from damage-over-time.
    pub fainted: bool,
}

pub(crate) fn run(env: &CombatEnv<'_>, session: &mut BattleSession, index: usize) -> Upkeep {
    let round = session.round();
    let gate = session.combatants[index]
        .effects
        .can_act(&mut session.rng, env.config().paralyze_block_chance);

    let actor = &mut session.combatants[index];
    let tick = actor.effects.tick(actor.max_hp);
    let dot_taken = actor.take_damage(tick.dot_damage);
    let fainted = dot_taken > 0 && actor.fainted;
    resources::begin_turn(actor);
    let side = actor.side;

    match side {
        Side::Player => session.damage_taken += u64::from(dot_taken),
        Side::Enemy => session.damage_dealt += u64::from(dot_taken),
    }

    let slot = side.index();
    if session.team_ticked_round[slot] != round {
        session.team_effects[slot].tick_durations();
        session.team_ticked_round[slot] = round;
    }

    Upkeep {
        gate,
        tick,
        dot_taken,
        fainted,
    }
}
