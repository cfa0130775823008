//! Ability definitions.
//!
//! Abilities are immutable inside the engine. They come from the definition
//! store when a session starts and are looked up by id through
//! [`AbilityOracle`](crate::env::AbilityOracle) on every turn.

use crate::types::{AbilityId, CharacterClass, Element, Rarity};

/// How an ability's damage scales and which defenses apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Scales with attack, reduced by defense.
    #[default]
    Physical,
    /// Scales with attack × magic scaling, reduced by defense.
    Magical,
    /// Scales with attack, ignores defense and defensive effects.
    True,
}

/// Which combatants an ability hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetShape {
    /// One chosen opponent.
    #[default]
    Single,
    /// Every living opponent.
    AllEnemies,
    /// The caster only; never rolls accuracy or deals damage.
    SelfTarget,
}

/// The resource that gates an ability.
///
/// Each ability declares exactly one model. Mana abilities also honour their
/// cooldown; power-point abilities carry a per-combatant use counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceModel {
    /// No resource at all (basic attack).
    #[default]
    Free,
    /// Costs mana on every use.
    Mana { cost: u32 },
    /// Limited number of uses per session.
    PowerPoints { max: u8 },
}

/// Who receives the effect an ability carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectScope {
    /// Each combatant the ability hit.
    #[default]
    Target,
    /// The caster.
    Caster,
    /// The caster's whole side (team-wide effect list).
    CasterTeam,
    /// The opposing side (team-wide effect list).
    TargetTeam,
}

/// Buff or debuff carried by an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectApplication {
    /// Effect catalog name.
    pub effect: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: EffectScope,
    /// Chance in percent that a successful hit applies the effect.
    #[cfg_attr(feature = "serde", serde(default = "EffectApplication::always"))]
    pub chance: f64,
    /// Duration override; the catalog default applies when `None`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<u32>,
}

impl EffectApplication {
    pub fn new(effect: impl Into<String>, scope: EffectScope) -> Self {
        Self {
            effect: effect.into(),
            scope,
            chance: Self::always(),
            duration: None,
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }

    pub fn with_duration(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self
    }

    fn always() -> f64 {
        100.0
    }
}

/// Gates that must be met before an ability can be equipped or used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnlockRequirements {
    pub min_level: u32,
    /// Lowest character rarity tier allowed to hold the ability.
    pub min_rarity: Option<Rarity>,
    pub class: Option<CharacterClass>,
    pub element: Option<Element>,
}

/// Immutable ability definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: ResourceModel,
    /// Turns of the owner before the ability is ready again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    /// Base hit chance in percent.
    #[cfg_attr(feature = "serde", serde(default = "Ability::default_accuracy"))]
    pub accuracy: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetShape,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<EffectApplication>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlock: UnlockRequirements,
}

impl Ability {
    /// Reserved id of the resource-free basic attack.
    pub const BASIC_ATTACK: AbilityId = AbilityId(0);

    pub fn new(id: AbilityId, name: impl Into<String>, power: u32) -> Self {
        Self {
            id,
            name: name.into(),
            power,
            resource: ResourceModel::Free,
            cooldown: 0,
            accuracy: Self::default_accuracy(),
            element: Element::Neutral,
            damage_type: DamageType::Physical,
            target: TargetShape::Single,
            effect: None,
            unlock: UnlockRequirements::default(),
        }
    }

    /// The basic attack every combatant can fall back to.
    pub fn basic_attack(power: u32) -> Self {
        Self::new(Self::BASIC_ATTACK, "Basic Attack", power)
    }

    pub fn with_mana(mut self, cost: u32) -> Self {
        self.resource = ResourceModel::Mana { cost };
        self
    }

    pub fn with_power_points(mut self, max: u8) -> Self {
        self.resource = ResourceModel::PowerPoints { max };
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown = turns;
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_target(mut self, target: TargetShape) -> Self {
        self.target = target;
        self
    }

    pub fn with_effect(mut self, effect: EffectApplication) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_unlock(mut self, unlock: UnlockRequirements) -> Self {
        self.unlock = unlock;
        self
    }

    pub fn is_basic_attack(&self) -> bool {
        self.id == Self::BASIC_ATTACK
    }

    /// Whether resolving this ability rolls damage against opponents.
    pub fn deals_damage(&self) -> bool {
        self.power > 0 && self.target != TargetShape::SelfTarget
    }

    pub fn mana_cost(&self) -> u32 {
        match self.resource {
            ResourceModel::Mana { cost } => cost,
            ResourceModel::Free | ResourceModel::PowerPoints { .. } => 0,
        }
    }

    fn default_accuracy() -> f64 {
        100.0
    }
}
