//! Elemental advantage chart.
//!
//! ```text
//! Fire > Nature > Water > Fire
//! ```
//!
//! Neutral neither gains nor suffers against anything.

use crate::types::Element;

/// Multiplier for advantage.
pub const ADVANTAGE: f64 = 2.0;
/// Multiplier for disadvantage.
pub const DISADVANTAGE: f64 = 0.5;

impl Element {
    /// Whether `self` has advantage over `other`.
    pub fn beats(self, other: Element) -> bool {
        matches!(
            (self, other),
            (Element::Fire, Element::Nature)
                | (Element::Nature, Element::Water)
                | (Element::Water, Element::Fire)
        )
    }
}

/// Damage multiplier for an ability of `attack` element hitting a `defend` combatant.
pub fn element_multiplier(attack: Element, defend: Element) -> f64 {
    if attack.beats(defend) {
        ADVANTAGE
    } else if defend.beats(attack) {
        DISADVANTAGE
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn triangle() {
        assert_eq!(element_multiplier(Element::Fire, Element::Nature), 2.0);
        assert_eq!(element_multiplier(Element::Nature, Element::Water), 2.0);
        assert_eq!(element_multiplier(Element::Water, Element::Fire), 2.0);
        assert_eq!(element_multiplier(Element::Nature, Element::Fire), 0.5);
    }

    #[test]
    fn neutral_and_mirror_are_even() {
        for element in Element::iter() {
            assert_eq!(element_multiplier(element, element), 1.0);
            assert_eq!(element_multiplier(Element::Neutral, element), 1.0);
            assert_eq!(element_multiplier(element, Element::Neutral), 1.0);
        }
    }
}
