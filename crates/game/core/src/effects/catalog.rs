//! Static table of named buff and debuff definitions.
//!
//! The catalog is built once (builtin table plus content overrides) and then
//! only read. Sessions refer to effects by name.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::types::StatKind;

bitflags! {
    /// Crowd-control behaviour carried by an effect.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ControlFlags: u8 {
        /// Cannot act.
        const STUN = 1 << 0;
        /// Cannot act; removed as soon as the holder takes damage.
        const SLEEP = 1 << 1;
        /// Cannot act.
        const FREEZE = 1 << 2;
        /// Each action attempt is blocked with a fixed probability.
        const PARALYZE = 1 << 3;

        /// Controls that always block the turn.
        const HARD = Self::STUN.bits() | Self::SLEEP.bits() | Self::FREEZE.bits();
    }
}

/// Whether an effect helps or hurts its holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Buff,
    Debuff,
}

/// Definition of one named effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub name: String,
    pub kind: EffectKind,
    /// Stat this effect multiplies, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat: Option<StatKind>,
    /// Multiplier applied to `stat` (1.3 = +30%, 0.75 = -25%).
    #[cfg_attr(feature = "serde", serde(default = "EffectDefinition::neutral"))]
    pub magnitude: f64,
    /// Default duration in turns of the holder.
    pub duration: u32,
    /// Fraction of max HP lost per turn, per stack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dot_fraction: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub control: ControlFlags,
}

impl EffectDefinition {
    pub fn buff(name: impl Into<String>, stat: StatKind, magnitude: f64, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind: EffectKind::Buff,
            stat: Some(stat),
            magnitude,
            duration,
            dot_fraction: 0.0,
            control: ControlFlags::empty(),
        }
    }

    pub fn debuff(name: impl Into<String>, stat: StatKind, magnitude: f64, duration: u32) -> Self {
        Self {
            kind: EffectKind::Debuff,
            ..Self::buff(name, stat, magnitude, duration)
        }
    }

    pub fn damage_over_time(name: impl Into<String>, fraction: f64, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind: EffectKind::Debuff,
            stat: None,
            magnitude: Self::neutral(),
            duration,
            dot_fraction: fraction,
            control: ControlFlags::empty(),
        }
    }

    pub fn crowd_control(name: impl Into<String>, control: ControlFlags, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind: EffectKind::Debuff,
            stat: None,
            magnitude: Self::neutral(),
            duration,
            dot_fraction: 0.0,
            control,
        }
    }

    /// Attach a stat multiplier to an existing definition.
    pub fn with_stat(mut self, stat: StatKind, magnitude: f64) -> Self {
        self.stat = Some(stat);
        self.magnitude = magnitude;
        self
    }

    fn neutral() -> f64 {
        1.0
    }
}

/// Lookup table of effect definitions keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectCatalog {
    effects: BTreeMap<String, EffectDefinition>,
}

impl EffectCatalog {
    pub const BURN: &'static str = "burn";
    pub const POISON: &'static str = "poison";
    pub const BLEED: &'static str = "bleed";
    pub const STUN: &'static str = "stun";
    pub const SLEEP: &'static str = "sleep";
    pub const FREEZE: &'static str = "freeze";
    pub const PARALYZE: &'static str = "paralyze";
    pub const BLIND: &'static str = "blind";
    pub const ATTACK_UP: &'static str = "attack_up";
    pub const DEFENSE_UP: &'static str = "defense_up";
    pub const SPEED_UP: &'static str = "speed_up";
    pub const FOCUS: &'static str = "focus";
    pub const ATTACK_DOWN: &'static str = "attack_down";
    pub const DEFENSE_DOWN: &'static str = "defense_down";
    pub const WAR_CRY: &'static str = "war_cry";

    /// Empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog with the builtin effect table.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for definition in [
            EffectDefinition::damage_over_time(Self::BURN, 0.05, 3),
            EffectDefinition::damage_over_time(Self::POISON, 0.04, 4),
            EffectDefinition::damage_over_time(Self::BLEED, 0.06, 2),
            EffectDefinition::crowd_control(Self::STUN, ControlFlags::STUN, 1),
            EffectDefinition::crowd_control(Self::SLEEP, ControlFlags::SLEEP, 2),
            EffectDefinition::crowd_control(Self::FREEZE, ControlFlags::FREEZE, 1),
            EffectDefinition::crowd_control(Self::PARALYZE, ControlFlags::PARALYZE, 3)
                .with_stat(StatKind::Speed, 0.75),
            EffectDefinition::debuff(Self::BLIND, StatKind::Accuracy, 0.6, 2),
            EffectDefinition::buff(Self::ATTACK_UP, StatKind::Attack, 1.3, 3),
            EffectDefinition::buff(Self::DEFENSE_UP, StatKind::Defense, 1.3, 3),
            EffectDefinition::buff(Self::SPEED_UP, StatKind::Speed, 1.3, 3),
            EffectDefinition::buff(Self::FOCUS, StatKind::Accuracy, 1.2, 3),
            EffectDefinition::debuff(Self::ATTACK_DOWN, StatKind::Attack, 0.75, 3),
            EffectDefinition::debuff(Self::DEFENSE_DOWN, StatKind::Defense, 0.75, 3),
            EffectDefinition::buff(Self::WAR_CRY, StatKind::Attack, 1.2, 2),
        ] {
            catalog.insert(definition);
        }
        catalog
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, definition: EffectDefinition) {
        self.effects.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&EffectDefinition> {
        self.effects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl FromIterator<EffectDefinition> for EffectCatalog {
    fn from_iter<I: IntoIterator<Item = EffectDefinition>>(iter: I) -> Self {
        let mut catalog = Self::empty();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_burn_is_five_percent_for_three_turns() {
        let catalog = EffectCatalog::builtin();
        let burn = catalog.get(EffectCatalog::BURN).unwrap();
        assert_eq!(burn.kind, EffectKind::Debuff);
        assert_eq!(burn.duration, 3);
        assert!((burn.dot_fraction - 0.05).abs() < 1e-9);
    }

    #[test]
    fn hard_control_excludes_paralyze() {
        assert!(ControlFlags::HARD.contains(ControlFlags::STUN));
        assert!(ControlFlags::HARD.contains(ControlFlags::FREEZE));
        assert!(!ControlFlags::HARD.contains(ControlFlags::PARALYZE));
    }

    #[test]
    fn insert_overrides_builtin() {
        let mut catalog = EffectCatalog::builtin();
        let before = catalog.len();
        catalog.insert(EffectDefinition::damage_over_time(EffectCatalog::BURN, 0.08, 2));
        assert_eq!(catalog.len(), before);
        assert_eq!(catalog.get(EffectCatalog::BURN).unwrap().duration, 2);
    }
}
