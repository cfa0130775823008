//! Offline replay analysis.
//!
//! The [`ReplayValidator`] reads a finished (or in-flight) turn log and
//! raises advisory [`AntiCheatFlag`]s. Flags never block or roll back a
//! session; they are queued for review.
//!
//! - [`bot`]: timing heuristics over one user's submitted actions
//! - [`collusion`]: relationship heuristics between two PvP opponents

pub mod bot;
pub mod collusion;

pub use collusion::{CollusionContext, HeadToHead};

use std::collections::BTreeMap;

use strum::{AsRefStr, Display};

use crate::session::TurnResult;
use crate::types::UserId;

/// Thresholds for the heuristics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AntiCheatConfig {
    /// Actions per minute above which play is suspicious.
    pub apm_medium: f64,
    /// Actions per minute at or above which play is almost certainly scripted.
    pub apm_high: f64,
    /// Actions needed before the APM check applies.
    pub min_actions_for_apm: usize,
    /// Interval standard deviation (ms) below which timing is too regular.
    pub min_interval_std_dev_ms: f64,
    /// Intervals needed before the deviation check applies.
    pub min_intervals_for_deviation: usize,
    /// Fastest plausible human reaction (ms).
    pub reaction_floor_ms: u64,
    /// Share of sub-floor intervals that escalates to High.
    pub sub_floor_high_ratio: f64,
    /// Head-to-head matches needed before a lopsided record counts.
    pub min_head_to_head_matches: u32,
}

impl AntiCheatConfig {
    pub fn new() -> Self {
        Self {
            apm_medium: 300.0,
            apm_high: 500.0,
            min_actions_for_apm: 10,
            min_interval_std_dev_ms: 25.0,
            min_intervals_for_deviation: 10,
            reaction_floor_ms: 120,
            sub_floor_high_ratio: 0.10,
            min_head_to_head_matches: 10,
        }
    }
}

impl Default for AntiCheatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FlagKind {
    Bot,
    Collusion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FlagSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// One signal that contributed to a flag.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Evidence {
    ActionsPerMinute { apm: f64, actions: usize },
    RegularIntervals { std_dev_ms: f64, intervals: usize },
    SubHumanReactions { below_floor: usize, intervals: usize },
    SharedNetwork,
    LinkedWallets,
    LopsidedRecord { wins: u32, matches: u32 },
}

impl Evidence {
    /// Severity this signal carries on its own.
    pub fn severity(&self, config: &AntiCheatConfig) -> FlagSeverity {
        match self {
            Evidence::ActionsPerMinute { apm, .. } if *apm >= config.apm_high => {
                FlagSeverity::High
            }
            Evidence::ActionsPerMinute { .. } => FlagSeverity::Medium,
            Evidence::RegularIntervals { .. } => FlagSeverity::Medium,
            Evidence::SubHumanReactions {
                below_floor,
                intervals,
            } => {
                let ratio = *below_floor as f64 / (*intervals).max(1) as f64;
                if ratio > config.sub_floor_high_ratio {
                    FlagSeverity::High
                } else {
                    FlagSeverity::Medium
                }
            }
            Evidence::SharedNetwork => FlagSeverity::High,
            Evidence::LinkedWallets => FlagSeverity::Critical,
            Evidence::LopsidedRecord { .. } => FlagSeverity::Medium,
        }
    }
}

/// Advisory finding about one user.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntiCheatFlag {
    pub subject: UserId,
    /// Other party of a collusion flag.
    pub counterpart: Option<UserId>,
    pub kind: FlagKind,
    /// Highest severity among the evidence.
    pub severity: FlagSeverity,
    pub evidence: Vec<Evidence>,
    pub reviewed: bool,
}

impl AntiCheatFlag {
    fn from_evidence(
        subject: UserId,
        counterpart: Option<UserId>,
        kind: FlagKind,
        evidence: Vec<Evidence>,
        config: &AntiCheatConfig,
    ) -> Option<Self> {
        let severity = evidence.iter().map(|e| e.severity(config)).max()?;
        Some(Self {
            subject,
            counterpart,
            kind,
            severity,
            evidence,
            reviewed: false,
        })
    }
}

/// Runs the heuristics over action logs.
#[derive(Clone, Debug, Default)]
pub struct ReplayValidator {
    config: AntiCheatConfig,
}

impl ReplayValidator {
    pub fn new(config: AntiCheatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AntiCheatConfig {
        &self.config
    }

    /// Bot flags for every user with actions in `log`.
    ///
    /// Only user-submitted turns count; AI turns are ignored.
    pub fn validate(&self, log: &[TurnResult]) -> Vec<AntiCheatFlag> {
        let mut per_user: BTreeMap<UserId, Vec<u64>> = BTreeMap::new();
        for turn in log.iter().filter(|t| !t.ai) {
            if let Some(user) = turn.user {
                per_user.entry(user).or_default().push(turn.submitted_at);
            }
        }

        per_user
            .into_iter()
            .filter_map(|(user, timestamps)| {
                let evidence = bot::analyze(&timestamps, &self.config);
                AntiCheatFlag::from_evidence(user, None, FlagKind::Bot, evidence, &self.config)
            })
            .collect()
    }

    /// Collusion flag for a PvP pairing, if any signal fires.
    pub fn check_collusion(&self, context: &CollusionContext) -> Option<AntiCheatFlag> {
        let evidence = collusion::analyze(context, &self.config);
        AntiCheatFlag::from_evidence(
            context.player,
            Some(context.opponent),
            FlagKind::Collusion,
            evidence,
            &self.config,
        )
    }
}
