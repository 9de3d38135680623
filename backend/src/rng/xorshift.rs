//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used for every draw the packet source makes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers → same packet batch. This is
//! CRITICAL for:
//! - Reproducible science (a batch is identified by its seed)
//! - Testing (fixed-seed fixtures)
//! - Partitioned generation (sub-streams derived from one seed)

use serde::{Deserialize, Serialize};

use super::UniformSource;

/// Multiplier of the xorshift64* output scrambler
const XORSHIFT_MULTIPLIER: u64 = 0x2545F4914F6CDD1D;

/// Golden-ratio increment used by SplitMix64
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// 2^-53, the spacing of the f64 grid on [0.5, 1)
const F64_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// 2^-52, step of the open-interval grid
const F64_OPEN_UNIT: f64 = 1.0 / (1u64 << 52) as f64;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use packet_source_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let uniform = rng.next_f64(); // [0, 1)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// # Example
    /// ```
    /// use packet_source_core_rs::RngManager;
    ///
    /// let rng = RngManager::new(12345);
    /// ```
    pub fn new(seed: u64) -> Self {
        // xorshift state must never be zero
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(XORSHIFT_MULTIPLIER)
    }

    /// Get current RNG state (for snapshots/replay)
    ///
    /// # Example
    /// ```
    /// use packet_source_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let resumed = RngManager::new(rng.get_state());
    /// assert_eq!(resumed, rng);
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// Uses the top 53 bits of the output, so every value is an exact
    /// multiple of 2^-53.
    ///
    /// # Example
    /// ```
    /// use packet_source_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let u = rng.next_f64();
    /// assert!((0.0..1.0).contains(&u));
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 * F64_UNIT
    }

    /// Generate random f64 in the open interval (0.0, 1.0)
    ///
    /// Uses the top 52 bits shifted by half a step, so the result lies in
    /// [2^-53, 1 - 2^-53]: never 0, never rounded up to 1, and `ln` of it is
    /// always finite. Consumes exactly one draw.
    pub fn next_open_f64(&mut self) -> f64 {
        ((self.next() >> 12) as f64 + 0.5) * F64_OPEN_UNIT
    }

    /// Derive an independent generator for sub-stream `index`
    ///
    /// The child seed is the SplitMix64 finalizer applied to this
    /// generator's state offset by `index + 1` golden-ratio steps. The
    /// parent is not advanced, so sub-stream `k` depends only on the parent
    /// state and `k`, never on which other sub-streams were taken.
    ///
    /// # Example
    /// ```
    /// use packet_source_core_rs::RngManager;
    ///
    /// let root = RngManager::new(7);
    /// let mut a = root.substream(0);
    /// let mut b = root.substream(1);
    /// assert_ne!(a.next(), b.next());
    /// assert_eq!(root.substream(1), RngManager::new(7).substream(1));
    /// ```
    pub fn substream(&self, index: u64) -> RngManager {
        let mut z = self
            .state
            .wrapping_add(SPLITMIX_GAMMA.wrapping_mul(index.wrapping_add(1)));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        RngManager::new(z)
    }
}

impl UniformSource for RngManager {
    fn next_f64(&mut self) -> f64 {
        RngManager::next_f64(self)
    }

    fn next_open_f64(&mut self) -> f64 {
        RngManager::next_open_f64(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_next_open_f64_excludes_endpoints() {
        let mut rng = RngManager::new(4242);

        for _ in 0..10_000 {
            let val = rng.next_open_f64();
            assert!(val > 0.0 && val < 1.0, "value {} not in (0, 1)", val);
            assert!(val.ln().is_finite());
        }
    }

    #[test]
    fn test_next_f64_deterministic() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            assert_eq!(rng1.next_f64(), rng2.next_f64(), "next_f64() not deterministic");
        }
    }

    #[test]
    fn test_substream_does_not_advance_parent() {
        let root = RngManager::new(31337);
        let before = root.get_state();
        let _ = root.substream(5);
        assert_eq!(root.get_state(), before);
    }

    #[test]
    fn test_substreams_are_distinct() {
        let root = RngManager::new(1);
        let states: Vec<u64> = (0..64).map(|i| root.substream(i).get_state()).collect();
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a, b, "two sub-streams share a seed");
            }
        }
    }
}
