//! Performance grading and reward intents.
//!
//! The engine only describes what should be paid; the external ledger does
//! the paying.

use strum::{AsRefStr, Display, EnumString};

use crate::config::GradeBucket;

/// Letter rating of a completed battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

/// Base payout of a mission before the grade multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTable {
    pub tokens: u64,
    pub xp: u64,
}

impl RewardTable {
    pub const fn new(tokens: u64, xp: u64) -> Self {
        Self { tokens, xp }
    }
}

/// What the ledger should pay out for one completed session.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardIntent {
    pub tokens: u64,
    pub xp: u64,
    pub grade: Grade,
    pub multiplier: f64,
}

impl RewardIntent {
    /// Scales `base` by the grade multiplier, rounding down.
    pub fn from_table(base: RewardTable, grade: Grade, multiplier: f64) -> Self {
        let scale = |value: u64| (value as f64 * multiplier.max(0.0)).floor() as u64;
        Self {
            tokens: scale(base.tokens),
            xp: scale(base.xp),
            grade,
            multiplier,
        }
    }
}

/// Picks the first bucket matching `rounds` and the fraction of HP lost.
///
/// Falls back to the last bucket, or to `D ×1.0` when no buckets are configured.
pub fn grade_performance(buckets: &[GradeBucket], rounds: u32, hp_lost: f64) -> (Grade, f64) {
    buckets
        .iter()
        .find(|bucket| bucket.matches(rounds, hp_lost))
        .or_else(|| buckets.last())
        .map_or((Grade::D, 1.0), |bucket| (bucket.grade, bucket.multiplier))
}
