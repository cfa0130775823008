//! Timing heuristics for scripted play.

use super::{AntiCheatConfig, Evidence};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Evaluates one user's submission timestamps (unix ms, log order).
pub fn analyze(timestamps: &[u64], config: &AntiCheatConfig) -> Vec<Evidence> {
    let mut evidence = Vec::new();
    if timestamps.len() < 2 {
        return evidence;
    }

    let intervals: Vec<u64> = timestamps
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0]))
        .collect();

    if timestamps.len() >= config.min_actions_for_apm {
        let apm = actions_per_minute(timestamps);
        if apm > config.apm_medium {
            evidence.push(Evidence::ActionsPerMinute {
                apm,
                actions: timestamps.len(),
            });
        }
    }

    if intervals.len() >= config.min_intervals_for_deviation {
        let std_dev_ms = std_dev(&intervals);
        if std_dev_ms < config.min_interval_std_dev_ms {
            evidence.push(Evidence::RegularIntervals {
                std_dev_ms,
                intervals: intervals.len(),
            });
        }
    }

    let below_floor = intervals
        .iter()
        .filter(|&&interval| interval < config.reaction_floor_ms)
        .count();
    if below_floor > 0 {
        evidence.push(Evidence::SubHumanReactions {
            below_floor,
            intervals: intervals.len(),
        });
    }

    evidence
}

/// Actions over the span between first and last action.
///
/// A zero-length span counts as one millisecond.
pub fn actions_per_minute(timestamps: &[u64]) -> f64 {
    let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) else {
        return 0.0;
    };
    let span_ms = last.saturating_sub(*first).max(1) as f64;
    timestamps.len() as f64 * MS_PER_MINUTE / span_ms
}

/// Population standard deviation.
pub fn std_dev(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}
