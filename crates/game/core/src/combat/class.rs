//! Class matchups, critical bonuses and HP-gated passives.

use crate::types::CharacterClass;

/// Class-vs-class damage multiplier.
///
/// Each class has one favoured and one unfavoured matchup:
///
/// ```text
/// Warrior > Rogue > Mage > Guardian > Ranger > Warrior
/// ```
///
/// Every other pairing is even.
pub fn class_multiplier(attacker: CharacterClass, defender: CharacterClass) -> f64 {
    use CharacterClass::*;
    match (attacker, defender) {
        (Warrior, Rogue)
        | (Rogue, Mage)
        | (Mage, Guardian)
        | (Guardian, Ranger)
        | (Ranger, Warrior) => 1.2,
        (Rogue, Warrior)
        | (Mage, Rogue)
        | (Guardian, Mage)
        | (Ranger, Guardian)
        | (Warrior, Ranger) => 0.85,
        _ => 1.0,
    }
}

/// Flat critical-chance bonus in percent.
pub fn crit_bonus(class: CharacterClass) -> f64 {
    match class {
        CharacterClass::Ranger => 20.0,
        CharacterClass::Rogue => 5.0,
        _ => 0.0,
    }
}

/// Product of the passives active for this exchange.
///
/// | Passive | Condition | Effect |
/// |---------|-----------|--------|
/// | Warrior "Berserker" | attacker below 30% HP | ×1.25 dealt |
/// | Rogue "Opportunist" | defender below 50% HP | ×1.15 dealt |
/// | Mage "Frail Focus" | attacker below 25% HP | ×0.9 dealt |
/// | Guardian "Bulwark" | defender above 70% HP | ×0.85 taken |
pub fn passive_multiplier(
    attacker: CharacterClass,
    attacker_hp: f64,
    defender: CharacterClass,
    defender_hp: f64,
) -> f64 {
    let offense = match attacker {
        CharacterClass::Warrior if attacker_hp < 0.30 => 1.25,
        CharacterClass::Rogue if defender_hp < 0.50 => 1.15,
        CharacterClass::Mage if attacker_hp < 0.25 => 0.9,
        _ => 1.0,
    };
    let defense = match defender {
        CharacterClass::Guardian if defender_hp > 0.70 => 0.85,
        _ => 1.0,
    };
    offense * defense
}
