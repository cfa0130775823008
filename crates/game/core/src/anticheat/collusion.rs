//! Relationship heuristics between two PvP opponents.

use crate::types::UserId;

use super::{AntiCheatConfig, Evidence};

/// Record of `player` against `opponent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadToHead {
    pub matches: u32,
    /// Wins of `player`.
    pub wins: u32,
}

impl HeadToHead {
    pub fn win_rate(&self) -> Option<f64> {
        (self.matches > 0).then(|| f64::from(self.wins) / f64::from(self.matches))
    }
}

/// Facts about a PvP pairing, gathered by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollusionContext {
    pub player: UserId,
    pub opponent: UserId,
    /// Both users were seen on the same network identity.
    pub same_network: bool,
    /// Wallets or payment history are linked.
    pub linked_wallets: bool,
    pub head_to_head: HeadToHead,
}

pub fn analyze(context: &CollusionContext, config: &AntiCheatConfig) -> Vec<Evidence> {
    let mut evidence = Vec::new();
    if context.same_network {
        evidence.push(Evidence::SharedNetwork);
    }
    if context.linked_wallets {
        evidence.push(Evidence::LinkedWallets);
    }

    let record = context.head_to_head;
    if record.matches >= config.min_head_to_head_matches
        && (record.wins == 0 || record.wins == record.matches)
    {
        evidence.push(Evidence::LopsidedRecord {
            wins: record.wins,
            matches: record.matches,
        });
    }
    evidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anticheat::{FlagKind, FlagSeverity, ReplayValidator};

    fn context() -> CollusionContext {
        CollusionContext {
            player: UserId(1),
            opponent: UserId(2),
            same_network: false,
            linked_wallets: false,
            head_to_head: HeadToHead::default(),
        }
    }

    #[test]
    fn clean_pairing_raises_nothing() {
        let validator = ReplayValidator::default();
        let mut ctx = context();
        ctx.head_to_head = HeadToHead {
            matches: 20,
            wins: 11,
        };
        assert!(validator.check_collusion(&ctx).is_none());
    }

    #[test]
    fn linked_wallets_are_critical() {
        let validator = ReplayValidator::default();
        let mut ctx = context();
        ctx.same_network = true;
        ctx.linked_wallets = true;

        let flag = validator.check_collusion(&ctx).unwrap();
        assert_eq!(flag.kind, FlagKind::Collusion);
        assert_eq!(flag.severity, FlagSeverity::Critical);
        assert_eq!(flag.counterpart, Some(UserId(2)));
        assert_eq!(flag.evidence.len(), 2);
        assert!(!flag.reviewed);
    }

    #[test]
    fn lopsided_record_needs_enough_matches() {
        let validator = ReplayValidator::default();
        let mut ctx = context();
        ctx.head_to_head = HeadToHead {
            matches: 9,
            wins: 9,
        };
        assert!(validator.check_collusion(&ctx).is_none());

        ctx.head_to_head = HeadToHead {
            matches: 10,
            wins: 0,
        };
        let flag = validator.check_collusion(&ctx).unwrap();
        assert_eq!(flag.severity, FlagSeverity::Medium);
    }
}
