//! Resource & cooldown management.
//!
//! Validates whether a combatant may use an ability and applies the resource
//! side of using it. All checks run before any mutation: [`can_use`] never
//! changes state and [`spend`] only deducts after re-checking.
//!
//! # Turn upkeep
//!
//! [`begin_turn`] runs at the start of the owner's own turn (not once per
//! global tick): cooldowns drop by one and mana regenerates up to its max.

mod cooldown;
mod pools;
mod slots;

pub use cooldown::{CooldownEntry, Cooldowns};
pub use pools::{ManaPool, PowerPointEntry, PowerPoints};
pub use slots::EquippedAbilities;

use crate::ability::{Ability, ResourceModel};
use crate::error::{CombatError, ErrorSeverity};
use crate::session::CombatantSnapshot;
use crate::types::{AbilityId, CharacterClass, Element, Rarity};

/// Which unlock gate an ability failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnlockGate {
    #[error("requires level {required} (combatant is level {actual})")]
    Level { required: u32, actual: u32 },

    #[error("requires rarity {required} or above (combatant is {actual})")]
    Rarity { required: Rarity, actual: Rarity },

    #[error("requires class {required}")]
    Class { required: CharacterClass },

    #[error("requires element {required}")]
    Element { required: Element },
}

/// Reasons a combatant cannot use or equip an ability.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceError {
    #[error("insufficient mana: have {have}, need {need}")]
    InsufficientMana { have: u32, need: u32 },

    #[error("no power points left for {ability}")]
    OutOfPowerPoints { ability: AbilityId },

    #[error("ability {ability} not unlocked: {gate}")]
    NotUnlocked { ability: AbilityId, gate: UnlockGate },

    #[error("ability {ability} on cooldown for {remaining} more turn(s)")]
    OnCooldown { ability: AbilityId, remaining: u32 },

    #[error("ability {ability} is not equipped")]
    NotEquipped { ability: AbilityId },

    #[error("combatant cannot act")]
    CannotAct,

    #[error("all {capacity} equip slots are in use")]
    SlotsFull { capacity: usize },

    #[error("ability {ability} is already equipped")]
    AlreadyEquipped { ability: AbilityId },
}

impl CombatError for ResourceError {
    fn severity(&self) -> ErrorSeverity {
        use ResourceError::*;
        match self {
            InsufficientMana { .. } | OutOfPowerPoints { .. } | OnCooldown { .. } => {
                ErrorSeverity::Recoverable
            }
            NotUnlocked { .. } | NotEquipped { .. } | SlotsFull { .. } | AlreadyEquipped { .. } => {
                ErrorSeverity::Validation
            }
            CannotAct => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ResourceError::*;
        match self {
            InsufficientMana { .. } => "RESOURCE_INSUFFICIENT_MANA",
            OutOfPowerPoints { .. } => "RESOURCE_OUT_OF_PP",
            NotUnlocked { .. } => "RESOURCE_NOT_UNLOCKED",
            OnCooldown { .. } => "RESOURCE_ON_COOLDOWN",
            NotEquipped { .. } => "RESOURCE_NOT_EQUIPPED",
            CannotAct => "RESOURCE_CANNOT_ACT",
            SlotsFull { .. } => "RESOURCE_SLOTS_FULL",
            AlreadyEquipped { .. } => "RESOURCE_ALREADY_EQUIPPED",
        }
    }
}

/// What [`begin_turn`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnUpkeep {
    pub mana_restored: u32,
    pub cooldowns_ready: Vec<AbilityId>,
}

/// Checks level, rarity, class and element gates in that order.
pub fn check_unlock(ability: &Ability, combatant: &CombatantSnapshot) -> Result<(), ResourceError> {
    let unlock = &ability.unlock;
    let gate = if combatant.level < unlock.min_level {
        Some(UnlockGate::Level {
            required: unlock.min_level,
            actual: combatant.level,
        })
    } else if let Some(rarity) = unlock.min_rarity.filter(|r| *r > combatant.rarity) {
        Some(UnlockGate::Rarity {
            required: rarity,
            actual: combatant.rarity,
        })
    } else if let Some(class) = unlock.class.filter(|c| *c != combatant.class) {
        Some(UnlockGate::Class { required: class })
    } else {
        unlock
            .element
            .filter(|e| *e != combatant.element)
            .map(|element| UnlockGate::Element { required: element })
    };

    match gate {
        Some(gate) => Err(ResourceError::NotUnlocked {
            ability: ability.id,
            gate,
        }),
        None => Ok(()),
    }
}

/// Validates that `combatant` may use `ability` right now. Never mutates.
pub fn can_use(ability: &Ability, combatant: &CombatantSnapshot) -> Result<(), ResourceError> {
    if combatant.fainted {
        return Err(ResourceError::CannotAct);
    }
    if ability.is_basic_attack() {
        return Ok(());
    }

    check_unlock(ability, combatant)?;

    if !combatant.equipped.contains(ability.id) {
        return Err(ResourceError::NotEquipped {
            ability: ability.id,
        });
    }

    let remaining = combatant.cooldowns.remaining(ability.id);
    if remaining > 0 {
        return Err(ResourceError::OnCooldown {
            ability: ability.id,
            remaining,
        });
    }

    match ability.resource {
        ResourceModel::Free => Ok(()),
        ResourceModel::Mana { cost } if !combatant.mana.can_afford(cost) => {
            Err(ResourceError::InsufficientMana {
                have: combatant.mana.current,
                need: cost,
            })
        }
        ResourceModel::Mana { .. } => Ok(()),
        ResourceModel::PowerPoints { max } => {
            if combatant.power_points.remaining(ability.id, max) == 0 {
                Err(ResourceError::OutOfPowerPoints {
                    ability: ability.id,
                })
            } else {
                Ok(())
            }
        }
    }
}

/// Deducts the ability's resource cost immediately.
pub fn spend(ability: &Ability, combatant: &mut CombatantSnapshot) -> Result<(), ResourceError> {
    can_use(ability, combatant)?;
    match ability.resource {
        ResourceModel::Free => {}
        ResourceModel::Mana { cost } => {
            combatant.mana.spend(cost);
        }
        ResourceModel::PowerPoints { max } => {
            combatant.power_points.consume(ability.id, max);
        }
    }
    Ok(())
}

/// Puts the ability on its full cooldown after it resolved.
pub fn start_cooldown(ability: &Ability, combatant: &mut CombatantSnapshot) {
    if !ability.is_basic_attack() {
        combatant.cooldowns.start(ability.id, ability.cooldown);
    }
}

/// Start-of-own-turn upkeep: cooldowns tick down and mana regenerates.
pub fn begin_turn(combatant: &mut CombatantSnapshot) -> TurnUpkeep {
    let cooldowns_ready = combatant.cooldowns.tick();
    let mana_restored = combatant.mana.regenerate();
    TurnUpkeep {
        mana_restored,
        cooldowns_ready,
    }
}

/// Equips `ability` into a free slot after checking eligibility.
pub fn equip(ability: &Ability, combatant: &mut CombatantSnapshot) -> Result<(), ResourceError> {
    check_unlock(ability, combatant)?;
    if combatant.equipped.contains(ability.id) {
        return Err(ResourceError::AlreadyEquipped {
            ability: ability.id,
        });
    }
    if !combatant.equipped.push(ability.id) {
        return Err(ResourceError::SlotsFull {
            capacity: combatant.equipped.capacity(),
        });
    }
    Ok(())
}

/// Swaps an equipped ability for another.
///
/// The incoming ability is re-validated against the same gates as a fresh
/// equip; the outgoing one stays equipped when validation fails.
pub fn swap(
    old: AbilityId,
    new: &Ability,
    combatant: &mut CombatantSnapshot,
) -> Result<(), ResourceError> {
    if !combatant.equipped.contains(old) {
        return Err(ResourceError::NotEquipped { ability: old });
    }
    check_unlock(new, combatant)?;
    if combatant.equipped.contains(new.id) {
        return Err(ResourceError::AlreadyEquipped { ability: new.id });
    }
    combatant.equipped.replace(old, new.id);
    Ok(())
}

pub fn unequip(ability: AbilityId, combatant: &mut CombatantSnapshot) -> Result<(), ResourceError> {
    if combatant.equipped.remove(ability) {
        Ok(())
    } else {
        Err(ResourceError::NotEquipped { ability })
    }
}
