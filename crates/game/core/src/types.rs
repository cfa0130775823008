//! Identifiers and small value enums shared across the combat rules.

use core::fmt;

use strum::{AsRefStr, Display, EnumIter, EnumString};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Account that owns sessions and player-side combatants.
    UserId(u64),
    "user:"
);
id_type!(
    /// Battle session identifier, unique across all modes.
    SessionId(u64),
    "session:"
);
id_type!(
    /// Per-session identifier of one combatant.
    ///
    /// Assigned at session start: players first in team order, then enemies.
    CombatantId(u32),
    "#"
);
id_type!(
    /// Ability definition identifier.
    AbilityId(u32),
    "ability:"
);
id_type!(
    /// Persisted character definition identifier.
    CharacterId(u32),
    "character:"
);
id_type!(
    /// Team definition identifier.
    TeamId(u32),
    "team:"
);
id_type!(
    /// Mission (PvE encounter or raid stage) identifier.
    MissionId(u32),
    "mission:"
);

/// Which side of the battle a combatant fights for.
///
/// Ordering matters: the player side sorts first, which is the scheduler's
/// tie-break rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Index into per-side arrays (`[player, enemy]`).
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

/// Who chooses a combatant's actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Controller {
    /// Actions are submitted externally by this user.
    User(UserId),
    /// Actions are chosen by the engine immediately when the turn comes up.
    Ai,
}

impl Controller {
    pub const fn user(self) -> Option<UserId> {
        match self {
            Controller::User(user) => Some(user),
            Controller::Ai => None,
        }
    }

    pub const fn is_ai(self) -> bool {
        matches!(self, Controller::Ai)
    }
}

/// Elemental affinity of combatants and abilities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Nature,
}

/// Character class; drives the class-advantage matrix, crit bonuses and passives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Mage,
    /// Precision class: flat critical-chance bonus.
    Ranger,
    Rogue,
    Guardian,
}

/// Rarity tier; gates how many abilities a combatant may equip.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Number of equipped-ability slots for this tier.
    pub const fn equip_slots(self) -> usize {
        match self {
            Rarity::Common => 2,
            Rarity::Uncommon => 3,
            Rarity::Rare => 4,
            Rarity::Epic => 5,
            Rarity::Legendary => 6,
        }
    }
}

/// Stats that status effects can modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Attack,
    Defense,
    Speed,
    Accuracy,
}
