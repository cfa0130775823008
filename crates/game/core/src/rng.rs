//! Deterministic random source threaded through every combat roll.
//!
//! A [`SessionRng`] is seeded once per session and stored in the session
//! itself, so replaying the same inputs reproduces the same accuracy, crit,
//! variance, crowd-control and AI decisions.
//!
//! # Determinism
//!
//! Implementations must be deterministic: given the same seed they produce
//! the same sequence. Nothing in raid-core reads ambient entropy.

/// Source of randomness for combat resolution.
pub trait BattleRng {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&mut self) -> u32 {
        (self.next_u32() % 100) + 1
    }

    /// Returns true with the given probability in percent (0-100).
    ///
    /// `chance <= 0` never succeeds and `chance >= 100` always does.
    fn chance(&mut self, percent: f64) -> bool {
        if percent <= 0.0 {
            return false;
        }
        if percent >= 100.0 {
            return true;
        }
        self.next_f64() * 100.0 < percent
    }

    /// Uniform integer in `[0, max)`. Returns 0 when `max == 0`.
    fn below(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }

    /// Uniform factor in `[1 - band, 1 + band]`.
    fn variance(&mut self, band: f64) -> f64 {
        let band = band.clamp(0.0, 1.0);
        1.0 - band + self.next_f64() * 2.0 * band
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// - **Deterministic**: Same seed always produces same output
/// - **Small state**: Only 64 bits, persisted with the session
/// - **Good quality**: Passes statistical tests (PractRand, TestU01)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionRng {
    state: u64,
}

impl SessionRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// Raw generator state, for persistence.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Restore a generator from persisted state.
    pub fn from_state(state: u64) -> Self {
        Self { state }
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl BattleRng for SessionRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Compute a deterministic sub-seed from a base seed and context values.
///
/// Used when independent streams must be derived from one session seed
/// (for example one stream per replayed match).
pub fn compute_seed(base_seed: u64, sequence: u64, actor: u32, context: u32) -> u64 {
    let mut hash = base_seed;
    hash ^= sequence.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Scripted RNG for tests: replays a fixed list of raw values, cycling.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// An RNG whose `next_f64` is always `fraction`.
    pub(crate) fn constant(fraction: f64) -> Self {
        let raw = (fraction * (f64::from(u32::MAX) + 1.0)) as u64;
        Self::new(vec![raw.min(u64::from(u32::MAX)) as u32])
    }
}

#[cfg(test)]
impl BattleRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SessionRng::from_seed(12345);
        let mut b = SessionRng::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SessionRng::from_seed(1);
        let mut b = SessionRng::from_seed(2);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn state_round_trip_resumes_sequence() {
        let mut rng = SessionRng::from_seed(77);
        rng.next_u32();
        let mut resumed = SessionRng::from_state(rng.state());
        assert_eq!(rng.next_u32(), resumed.next_u32());
    }

    #[test]
    fn variance_stays_in_band() {
        let mut rng = SessionRng::from_seed(9);
        for _ in 0..1000 {
            let v = rng.variance(0.15);
            assert!((0.85..=1.15).contains(&v), "variance {v} out of band");
        }
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SessionRng::from_seed(3);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(100.0));
        }
    }

    #[test]
    fn d100_range() {
        let mut rng = SessionRng::from_seed(42);
        for _ in 0..1000 {
            let roll = rng.roll_d100();
            assert!((1..=100).contains(&roll));
        }
    }
}
