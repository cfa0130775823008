//! Battle/raid state machine.
//!
//! The [`BattleEngine`] is the only thing that mutates a [`BattleSession`].
//! It is purely reactive: it resolves the turn it is handed, then keeps
//! resolving AI turns until a user-controlled combatant is up or the battle
//! is over. Expiry is a comparison against the caller's clock, never a timer.
//!
//! # Validate, then mutate
//!
//! Every call either succeeds completely or returns an error with the
//! caller's session untouched. Turns are resolved on a working copy that
//! replaces the session only on success.

mod ai;
mod errors;
mod turn;
mod upkeep;

pub use errors::{BattleError, TargetError};

use crate::ability::Ability;
use crate::effects::StatusEffects;
use crate::env::{CharacterDefinition, CombatEnv, TeamDefinition};
use crate::resources;
use crate::rng::SessionRng;
use crate::scheduler::TurnQueue;
use crate::session::{
    BattleSession, CombatantSnapshot, RewardIntent, SessionSeed, SessionStatus, TurnResult,
    grade_performance,
};
use crate::types::{AbilityId, CombatantId, Controller, Side, UserId};

/// An action submitted for a user-controlled combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    /// Use an equipped ability. Area and self abilities take no target.
    Ability {
        ability: AbilityId,
        target: Option<CombatantId>,
    },
    /// Resource-free basic attack.
    BasicAttack { target: CombatantId },
}

impl PlayerAction {
    pub fn ability(&self) -> AbilityId {
        match self {
            PlayerAction::Ability { ability, .. } => *ability,
            PlayerAction::BasicAttack { .. } => Ability::BASIC_ATTACK,
        }
    }

    pub fn target(&self) -> Option<CombatantId> {
        match self {
            PlayerAction::Ability { target, .. } => *target,
            PlayerAction::BasicAttack { target } => Some(*target),
        }
    }
}

/// Drives sessions through their lifecycle.
#[derive(Clone, Debug)]
pub struct BattleEngine<'a> {
    env: CombatEnv<'a>,
}

impl<'a> BattleEngine<'a> {
    pub fn new(env: CombatEnv<'a>) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &CombatEnv<'a> {
        &self.env
    }

    /// Builds a session and resolves any AI turns that come before the
    /// first user-controlled actor.
    ///
    /// Players are user-controlled by `seed.user` and numbered first in the
    /// given order; enemies follow and are AI-controlled.
    pub fn start(
        &self,
        seed: SessionSeed,
        players: &[CharacterDefinition],
        enemies: &[CharacterDefinition],
    ) -> Result<BattleSession, BattleError> {
        check_roster(Side::Player, players)?;
        check_roster(Side::Enemy, enemies)?;

        let roster = players
            .iter()
            .map(|def| (Side::Player, Controller::User(seed.user), def))
            .chain(enemies.iter().map(|def| (Side::Enemy, Controller::Ai, def)));

        let mut combatants = Vec::with_capacity(players.len() + enemies.len());
        for (n, (side, controller, definition)) in roster.enumerate() {
            let id = CombatantId(n as u32 + 1);
            combatants.push(self.build_combatant(id, side, controller, definition)?);
        }

        let starting_hp = [Side::Player, Side::Enemy].map(|side| {
            combatants
                .iter()
                .filter(|c| c.side == side)
                .map(|c| c.hp)
                .fold(0u32, u32::saturating_add)
        });
        let queue = TurnQueue::build(
            combatants
                .iter()
                .filter(|c| c.is_alive())
                .map(|c| c.queue_entry()),
        );

        let mut session = BattleSession {
            id: seed.id,
            user: seed.user,
            mode: seed.mode,
            status: SessionStatus::InProgress,
            turn: 0,
            queue,
            combatants,
            team_effects: [StatusEffects::empty(), StatusEffects::empty()],
            team_ticked_round: [0; 2],
            damage_dealt: 0,
            damage_taken: 0,
            starting_hp,
            rng: SessionRng::from_seed(seed.seed),
            base_reward: seed.reward,
            started_at: seed.started_at,
            expires_at: seed.started_at.saturating_add(self.env.config().session_ttl_ms),
            last_action_at: seed.started_at,
            log: Vec::new(),
            reward: None,
        };

        self.run_ai(&mut session, seed.started_at)?;
        self.finish(&mut session);
        Ok(session)
    }

    /// Pre-flight checks for a submitted action, without touching the session.
    pub fn validate_action(
        &self,
        session: &BattleSession,
        actor: CombatantId,
        action: &PlayerAction,
        now_ms: u64,
    ) -> Result<(), BattleError> {
        if session.is_terminal() {
            return Err(BattleError::SessionClosed(session.status));
        }
        if now_ms > session.expires_at {
            return Err(BattleError::SessionExpired {
                expires_at: session.expires_at,
                now: now_ms,
            });
        }

        let expected = session.current()?.actor;
        if actor != expected {
            return Err(BattleError::WrongTurn {
                expected,
                actual: actor,
            });
        }

        let combatant = session
            .combatant(actor)
            .ok_or(BattleError::UnknownCombatant(actor))?;
        if combatant.controller != Controller::User(session.user) {
            return Err(BattleError::NotPlayerControlled(actor));
        }

        let ability = self
            .env
            .ability(action.ability())
            .ok_or(BattleError::UnknownAbility(action.ability()))?;
        turn::check_target(session, actor, ability, action.target())
    }

    /// Resolves `action` for `actor`, then any AI turns that follow.
    ///
    /// Returns the result of the submitted action itself; AI turns are in
    /// the session log. Each successful call pushes `expires_at` out by the
    /// session TTL.
    pub fn submit_turn(
        &self,
        session: &mut BattleSession,
        actor: CombatantId,
        action: PlayerAction,
        now_ms: u64,
    ) -> Result<TurnResult, BattleError> {
        self.validate_action(session, actor, &action, now_ms)?;

        let mut working = session.clone();
        let result = turn::play_turn(&self.env, &mut working, actor, &action, now_ms, false)?;
        self.run_ai(&mut working, now_ms)?;
        self.finish(&mut working);

        working.last_action_at = now_ms;
        working.expires_at = now_ms.saturating_add(self.env.config().session_ttl_ms);
        *session = working;
        Ok(result)
    }

    /// Owner gives up; the session becomes `Abandoned`.
    pub fn abandon(&self, session: &mut BattleSession, user: UserId) -> Result<(), BattleError> {
        if !session.is_owned_by(user) {
            return Err(BattleError::NotSessionOwner(user));
        }
        if session.is_terminal() {
            return Err(BattleError::SessionClosed(session.status));
        }
        session.status = SessionStatus::Abandoned;
        Ok(())
    }

    /// Moves an open session past its deadline to `Expired`.
    ///
    /// Returns whether the status changed.
    pub fn expire(&self, session: &mut BattleSession, now_ms: u64) -> bool {
        if session.is_terminal() || now_ms <= session.expires_at {
            return false;
        }
        session.status = SessionStatus::Expired;
        true
    }

    fn build_combatant(
        &self,
        id: CombatantId,
        side: Side,
        controller: Controller,
        definition: &CharacterDefinition,
    ) -> Result<CombatantSnapshot, BattleError> {
        let mut combatant = CombatantSnapshot::from_definition(id, side, controller, definition);
        for &ability_id in &definition.abilities {
            if ability_id == Ability::BASIC_ATTACK {
                continue;
            }
            let ability = self
                .env
                .ability(ability_id)
                .ok_or(BattleError::UnknownAbility(ability_id))?;
            resources::equip(ability, &mut combatant).map_err(|source| {
                BattleError::InvalidLoadout {
                    character: definition.id,
                    source,
                }
            })?;
        }
        Ok(combatant)
    }

    /// Resolves consecutive AI turns, bounded by the configured cap.
    fn run_ai(&self, session: &mut BattleSession, now_ms: u64) -> Result<(), BattleError> {
        let cap = self.env.config().ai_iteration_cap(session.queue.len());
        for _ in 0..cap {
            if session.is_terminal() {
                break;
            }
            let actor = session.current()?.actor;
            let index = session
                .index_of(actor)
                .ok_or(BattleError::UnknownCombatant(actor))?;
            if !session.combatants[index].controller.is_ai() {
                break;
            }
            let Some(action) = ai::choose_action(&self.env, session, index) else {
                break;
            };
            turn::play_turn(&self.env, session, actor, &action, now_ms, true)?;
        }
        Ok(())
    }

    /// Grades a completed session and stores its reward intent.
    fn finish(&self, session: &mut BattleSession) {
        if session.status != SessionStatus::Completed || session.reward.is_some() {
            return;
        }
        let config = self.env.config();
        let (grade, multiplier) = grade_performance(
            &config.grades,
            session.round(),
            session.hp_lost_fraction(Side::Player),
        );
        let base = if session.mode.is_pvp() {
            config.pvp_reward
        } else {
            session.base_reward
        };
        session.reward = Some(RewardIntent::from_table(base, grade, multiplier));
    }
}

fn check_roster(side: Side, roster: &[CharacterDefinition]) -> Result<(), BattleError> {
    if roster.iter().all(|definition| definition.max_hp == 0) {
        return Err(BattleError::EmptyRoster(side));
    }
    if roster.len() > TeamDefinition::MAX_MEMBERS {
        return Err(BattleError::RosterTooLarge {
            side,
            size: roster.len(),
            max: TeamDefinition::MAX_MEMBERS,
        });
    }
    Ok(())
}
