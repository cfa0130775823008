use crate::session::{Grade, RewardTable};

/// Combat balance parameters and tunable limits.
///
/// Every field has a default; content files only need to override what they
/// change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Default variance band (fraction) when a call site does not choose one.
    pub variance: f64,
    /// Attack value at which an ability deals exactly its base power.
    pub attack_reference: f64,
    /// Multiplier applied to attack for magical abilities.
    pub magic_scaling: f64,
    /// Defense constant `K` in `def / (def + K)`.
    pub defense_constant: f64,
    /// Upper bound on the fraction of damage defense can remove.
    pub max_defense_reduction: f64,
    /// Critical chance in percent before level and class bonuses.
    pub base_crit_chance: f64,
    /// Additional critical chance in percent per 10 attacker levels.
    pub crit_per_ten_levels: f64,
    pub crit_multiplier: f64,
    /// Chance in percent that paralyze blocks an action.
    pub paralyze_block_chance: f64,
    /// Chance in percent that the AI falls back to its basic attack.
    pub ai_basic_attack_chance: f64,
    /// AI turns allowed per submitted player action, in queue lengths.
    pub ai_round_cap: u32,
    /// Wall-clock window after the last advance before a session is stale.
    pub session_ttl_ms: u64,
    /// Base power of the resource-free basic attack.
    pub basic_attack_power: u32,
    /// Reward table for winning a PvP battle.
    pub pvp_reward: RewardTable,
    /// Performance grade buckets, checked in order; the last entry is the fallback.
    pub grades: Vec<GradeBucket>,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard cap on stacks of a single named effect.
    pub const MAX_STACKS: u8 = 3;
    /// Maximum distinct effects held by one combatant or team.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Most equipped-ability slots any rarity grants.
    pub const MAX_EQUIP_SLOTS: usize = 6;
    /// Absolute bound on AI turns resolved in one engine call.
    pub const MAX_AI_ITERATIONS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SESSION_TTL_MS: u64 = 15 * 60 * 1000;

    pub fn new() -> Self {
        Self {
            variance: 0.10,
            attack_reference: 25.0,
            magic_scaling: 1.2,
            defense_constant: 100.0,
            max_defense_reduction: 0.75,
            base_crit_chance: 10.0,
            crit_per_ten_levels: 1.0,
            crit_multiplier: 1.5,
            paralyze_block_chance: 25.0,
            ai_basic_attack_chance: 20.0,
            ai_round_cap: 1,
            session_ttl_ms: Self::DEFAULT_SESSION_TTL_MS,
            basic_attack_power: 30,
            pvp_reward: RewardTable::new(50, 100),
            grades: GradeBucket::defaults(),
        }
    }

    /// Maximum AI turns for one engine call given the current queue length.
    pub fn ai_iteration_cap(&self, queue_len: usize) -> usize {
        let cap = queue_len.max(1) * self.ai_round_cap.max(1) as usize;
        cap.min(Self::MAX_AI_ITERATIONS)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One performance-grade threshold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradeBucket {
    pub grade: Grade,
    /// Rounds allowed for this grade; `None` means any.
    pub max_rounds: Option<u32>,
    /// Largest fraction of starting HP the player side may have lost.
    pub max_hp_lost: f64,
    pub multiplier: f64,
}

impl GradeBucket {
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(Grade::S, Some(5), 0.10, 2.0),
            Self::new(Grade::A, Some(10), 0.30, 1.5),
            Self::new(Grade::B, Some(15), 0.50, 1.2),
            Self::new(Grade::C, None, 0.80, 1.0),
            Self::new(Grade::D, None, 1.0, 0.8),
        ]
    }

    pub fn new(grade: Grade, max_rounds: Option<u32>, max_hp_lost: f64, multiplier: f64) -> Self {
        Self {
            grade,
            max_rounds,
            max_hp_lost,
            multiplier,
        }
    }

    pub fn matches(&self, rounds: u32, hp_lost: f64) -> bool {
        self.max_rounds.is_none_or(|max| rounds <= max) && hp_lost <= self.max_hp_lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_cap_scales_with_queue_but_stays_bounded() {
        let config = CombatConfig::default();
        assert_eq!(config.ai_iteration_cap(0), 1);
        assert_eq!(config.ai_iteration_cap(5), 5);
        assert_eq!(config.ai_iteration_cap(1000), CombatConfig::MAX_AI_ITERATIONS);
    }

    #[test]
    fn grade_bucket_without_round_limit() {
        let bucket = GradeBucket::new(Grade::C, None, 0.8, 1.0);
        assert!(bucket.matches(999, 0.5));
        assert!(!bucket.matches(1, 0.9));
    }
}
