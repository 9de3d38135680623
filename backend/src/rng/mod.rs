//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the packet source MUST go through this module.
//!
//! Samplers never name [`RngManager`] directly; they take any
//! [`UniformSource`], so fixed-sequence test doubles and sub-streams plug in
//! without touching sampling code.

mod xorshift;

pub use xorshift::RngManager;

/// Capability interface for uniform variates
///
/// # Example
/// ```
/// use packet_source_core_rs::rng::UniformSource;
///
/// /// Replays a fixed list of draws (test fixture)
/// struct Replay(Vec<f64>, usize);
///
/// impl UniformSource for Replay {
///     fn next_f64(&mut self) -> f64 {
///         let v = self.0[self.1 % self.0.len()];
///         self.1 += 1;
///         v
///     }
/// }
///
/// let mut r = Replay(vec![0.25, 0.5], 0);
/// assert_eq!(r.next_f64(), 0.25);
/// assert_eq!(r.next_open_f64(), 0.5);
/// ```
pub trait UniformSource {
    /// Next variate on [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Next variate on (0, 1)
    ///
    /// The default redraws on an exact zero. Implementations that can
    /// produce an open-interval value in one draw should override it.
    fn next_open_f64(&mut self) -> f64 {
        loop {
            let u = self.next_f64();
            if u > 0.0 {
                return u;
            }
        }
    }
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn next_open_f64(&mut self) -> f64 {
        (**self).next_open_f64()
    }
}
