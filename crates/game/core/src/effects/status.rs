//! Active status effects for one combatant or one team side.
//!
//! # Stacking
//!
//! Re-applying an effect that is already present refreshes its duration to
//! the new value and adds one stack, up to [`CombatConfig::MAX_STACKS`].
//! Applications past the cap only refresh the duration.
//!
//! # Turn order
//!
//! The crowd-control gate ([`StatusEffects::can_act`]) is evaluated on the
//! effects as they stand at the start of the holder's turn, before
//! [`StatusEffects::tick`] decrements and expires them. A one-turn stun
//! therefore costs exactly one action.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::rng::BattleRng;
use crate::types::StatKind;

use super::catalog::{ControlFlags, EffectDefinition, EffectKind};

/// One effect currently held.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub name: String,
    pub kind: EffectKind,
    /// Always within `1..=MAX_STACKS`.
    pub stacks: u8,
    pub turns_remaining: u32,
    pub stat: Option<StatKind>,
    pub magnitude: f64,
    pub dot_fraction: f64,
    pub control: ControlFlags,
}

impl ActiveEffect {
    pub fn from_definition(definition: &EffectDefinition, duration: u32) -> Self {
        Self {
            name: definition.name.clone(),
            kind: definition.kind,
            stacks: 1,
            turns_remaining: duration,
            stat: definition.stat,
            magnitude: definition.magnitude,
            dot_fraction: definition.dot_fraction,
            control: definition.control,
        }
    }

    /// HP this effect removes at the start of the holder's turn.
    pub fn damage_per_turn(&self, max_hp: u32) -> u32 {
        if self.dot_fraction <= 0.0 {
            return 0;
        }
        let raw = f64::from(max_hp) * self.dot_fraction * f64::from(self.stacks);
        (raw.round() as u32).max(1)
    }
}

/// Result of applying an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// A new entry was created.
    Added,
    /// The existing entry gained a stack and its duration was refreshed.
    Stacked { stacks: u8 },
    /// Already at the stack cap; only the duration was refreshed.
    Refreshed,
    /// Zero duration or no room for another distinct effect.
    Rejected,
}

impl ApplyOutcome {
    pub fn applied(self) -> bool {
        !matches!(self, ApplyOutcome::Rejected)
    }
}

/// What one upkeep tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Total damage-over-time across all stacked DoT effects.
    pub dot_damage: u32,
    /// Names of effects that reached zero duration and were removed.
    pub expired: Vec<String>,
}

/// Result of the crowd-control gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActGate {
    Ready,
    /// The turn is lost to the given control.
    Blocked(ControlFlags),
}

impl ActGate {
    pub fn is_ready(self) -> bool {
        matches!(self, ActGate::Ready)
    }
}

/// Ordered set of active effects.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Applies `definition` for `duration` turns.
    pub fn apply(&mut self, definition: &EffectDefinition, duration: u32) -> ApplyOutcome {
        if duration == 0 {
            return ApplyOutcome::Rejected;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.name == definition.name) {
            existing.turns_remaining = duration;
            if existing.stacks < CombatConfig::MAX_STACKS {
                existing.stacks += 1;
                return ApplyOutcome::Stacked {
                    stacks: existing.stacks,
                };
            }
            return ApplyOutcome::Refreshed;
        }

        match self
            .effects
            .try_push(ActiveEffect::from_definition(definition, duration))
        {
            Ok(()) => ApplyOutcome::Added,
            Err(_) => ApplyOutcome::Rejected,
        }
    }

    /// Runs one turn of upkeep: DoT total, decrement, expire.
    pub fn tick(&mut self, max_hp: u32) -> TickReport {
        let dot_damage = self
            .effects
            .iter()
            .map(|e| e.damage_per_turn(max_hp))
            .fold(0u32, u32::saturating_add);

        for effect in self.effects.iter_mut() {
            effect.turns_remaining = effect.turns_remaining.saturating_sub(1);
        }

        let mut expired = Vec::new();
        self.effects.retain(|e| {
            if e.turns_remaining == 0 {
                expired.push(e.name.clone());
                false
            } else {
                true
            }
        });

        TickReport {
            dot_damage,
            expired,
        }
    }

    /// Decrements durations without dealing DoT (team-wide lists).
    pub fn tick_durations(&mut self) -> Vec<String> {
        self.tick(0).expired
    }

    /// Crowd-control gate for the holder's turn.
    ///
    /// Hard controls block without consuming randomness; paralyze rolls
    /// `paralyze_chance` percent once per check.
    pub fn can_act(&self, rng: &mut impl BattleRng, paralyze_chance: f64) -> ActGate {
        let controls = self.controls();
        let hard = controls & ControlFlags::HARD;
        if !hard.is_empty() {
            return ActGate::Blocked(hard);
        }
        if controls.contains(ControlFlags::PARALYZE) && rng.chance(paralyze_chance) {
            return ActGate::Blocked(ControlFlags::PARALYZE);
        }
        ActGate::Ready
    }

    /// Union of every control flag currently held.
    pub fn controls(&self) -> ControlFlags {
        self.effects
            .iter()
            .fold(ControlFlags::empty(), |acc, e| acc | e.control)
    }

    /// Removes sleep effects. Returns true if the holder woke up.
    pub fn wake_on_damage(&mut self) -> bool {
        let before = self.effects.len();
        self.effects
            .retain(|e| !e.control.contains(ControlFlags::SLEEP));
        before != self.effects.len()
    }

    /// Product of the magnitudes of every effect modifying `stat`.
    ///
    /// Distinct effects compound (1.3 × 1.3 = 1.69). Stacks of one effect do
    /// not raise its magnitude.
    pub fn modifier(&self, stat: StatKind) -> f64 {
        self.effects
            .iter()
            .filter(|e| e.stat == Some(stat))
            .map(|e| e.magnitude)
            .product()
    }

    /// Removes an effect by name. Returns true if it was present.
    pub fn cure(&mut self, name: &str) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.name != name);
        before != self.effects.len()
    }

    pub fn clear_debuffs(&mut self) -> Vec<String> {
        self.clear_kind(EffectKind::Debuff)
    }

    pub fn clear_buffs(&mut self) -> Vec<String> {
        self.clear_kind(EffectKind::Buff)
    }

    fn clear_kind(&mut self, kind: EffectKind) -> Vec<String> {
        let mut removed = Vec::new();
        self.effects.retain(|e| {
            if e.kind == kind {
                removed.push(e.name.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn has(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectCatalog;
    use crate::rng::ScriptedRng;

    fn catalog() -> EffectCatalog {
        EffectCatalog::builtin()
    }

    fn apply_default(effects: &mut StatusEffects, name: &str) -> ApplyOutcome {
        let catalog = catalog();
        let definition = catalog.get(name).unwrap();
        effects.apply(definition, definition.duration)
    }

    #[test]
    fn burn_twice_stacks_and_doubles_dot() {
        let mut effects = StatusEffects::empty();
        assert_eq!(apply_default(&mut effects, EffectCatalog::BURN), ApplyOutcome::Added);

        // One turn passes, then burn lands again.
        effects.tick(200);
        assert_eq!(effects.get(EffectCatalog::BURN).unwrap().turns_remaining, 2);

        assert_eq!(
            apply_default(&mut effects, EffectCatalog::BURN),
            ApplyOutcome::Stacked { stacks: 2 }
        );
        let burn = effects.get(EffectCatalog::BURN).unwrap();
        assert_eq!(burn.stacks, 2);
        assert_eq!(burn.turns_remaining, 3);

        // 5% × 2 stacks of 200 max HP
        let report = effects.tick(200);
        assert_eq!(report.dot_damage, 20);
    }

    #[test]
    fn stacks_cap_at_three_and_only_refresh_after() {
        let mut effects = StatusEffects::empty();
        for _ in 0..3 {
            apply_default(&mut effects, EffectCatalog::POISON);
        }
        assert_eq!(effects.get(EffectCatalog::POISON).unwrap().stacks, 3);

        effects.tick(100);
        assert_eq!(
            apply_default(&mut effects, EffectCatalog::POISON),
            ApplyOutcome::Refreshed
        );
        let poison = effects.get(EffectCatalog::POISON).unwrap();
        assert_eq!(poison.stacks, CombatConfig::MAX_STACKS);
        assert_eq!(poison.turns_remaining, 4);
    }

    #[test]
    fn expired_effects_are_reported_and_removed() {
        let mut effects = StatusEffects::empty();
        apply_default(&mut effects, EffectCatalog::STUN);
        apply_default(&mut effects, EffectCatalog::ATTACK_UP);

        let report = effects.tick(100);
        assert_eq!(report.expired, vec![EffectCatalog::STUN.to_string()]);
        assert!(!effects.has(EffectCatalog::STUN));
        assert!(effects.has(EffectCatalog::ATTACK_UP));
        assert!(effects.iter().all(|e| e.turns_remaining > 0));
    }

    #[test]
    fn hard_control_blocks_without_rolling() {
        let mut effects = StatusEffects::empty();
        apply_default(&mut effects, EffectCatalog::FREEZE);
        // An RNG that would always succeed the paralyze roll is never consulted.
        let mut rng = ScriptedRng::constant(0.0);
        assert_eq!(
            effects.can_act(&mut rng, 25.0),
            ActGate::Blocked(ControlFlags::FREEZE)
        );
    }

    #[test]
    fn paralyze_blocks_probabilistically() {
        let mut effects = StatusEffects::empty();
        apply_default(&mut effects, EffectCatalog::PARALYZE);

        let mut low_roll = ScriptedRng::constant(0.10);
        assert_eq!(
            effects.can_act(&mut low_roll, 25.0),
            ActGate::Blocked(ControlFlags::PARALYZE)
        );

        let mut high_roll = ScriptedRng::constant(0.90);
        assert_eq!(effects.can_act(&mut high_roll, 25.0), ActGate::Ready);
    }

    #[test]
    fn sleep_breaks_on_damage() {
        let mut effects = StatusEffects::empty();
        apply_default(&mut effects, EffectCatalog::SLEEP);
        apply_default(&mut effects, EffectCatalog::BURN);

        assert!(effects.wake_on_damage());
        assert!(!effects.has(EffectCatalog::SLEEP));
        assert!(effects.has(EffectCatalog::BURN));
        assert!(!effects.wake_on_damage());
    }

    #[test]
    fn distinct_buffs_compound() {
        let mut effects = StatusEffects::empty();
        apply_default(&mut effects, EffectCatalog::ATTACK_UP);
        effects.apply(
            &EffectDefinition::buff("rallied", StatKind::Attack, 1.3, 2),
            2,
        );

        assert!((effects.modifier(StatKind::Attack) - 1.69).abs() < 1e-9);
        assert!((effects.modifier(StatKind::Defense) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn capacity_rejects_extra_distinct_effects() {
        let mut effects = StatusEffects::empty();
        for i in 0..CombatConfig::MAX_STATUS_EFFECTS {
            let def = EffectDefinition::buff(format!("buff_{i}"), StatKind::Speed, 1.1, 2);
            assert_eq!(effects.apply(&def, 2), ApplyOutcome::Added);
        }
        let extra = EffectDefinition::buff("overflow", StatKind::Speed, 1.1, 2);
        assert_eq!(effects.apply(&extra, 2), ApplyOutcome::Rejected);
        assert_eq!(effects.len(), CombatConfig::MAX_STATUS_EFFECTS);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut effects = StatusEffects::empty();
        let def = catalog().get(EffectCatalog::BURN).unwrap().clone();
        assert_eq!(effects.apply(&def, 0), ApplyOutcome::Rejected);
        assert!(effects.is_empty());
    }

    #[test]
    fn clear_debuffs_keeps_buffs() {
        let mut effects = StatusEffects::empty();
        apply_default(&mut effects, EffectCatalog::BURN);
        apply_default(&mut effects, EffectCatalog::DEFENSE_UP);
        let removed = effects.clear_debuffs();
        assert_eq!(removed, vec![EffectCatalog::BURN.to_string()]);
        assert!(effects.has(EffectCatalog::DEFENSE_UP));
    }
}
