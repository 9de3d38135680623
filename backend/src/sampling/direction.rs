//! Emission direction sampling
//!
//! A blackbody surface emits flux-weighted, not isotropic: the number of
//! packets leaving at angle θ to the normal scales with cos θ. The direction
//! cosine μ therefore has density 2μ on [0, 1], whose inverse CDF is √z.

use crate::rng::UniformSource;

/// Draw one outward direction cosine μ ∈ [0, 1) (one uniform draw)
///
/// # Example
/// ```
/// use packet_source_core_rs::sampling::sample_mu;
/// use packet_source_core_rs::RngManager;
///
/// let mut rng = RngManager::new(1);
/// let mu = sample_mu(&mut rng);
/// assert!((0.0..=1.0).contains(&mu));
/// ```
pub fn sample_mu<R: UniformSource + ?Sized>(rng: &mut R) -> f64 {
    rng.next_f64().sqrt()
}

/// Probability density of μ: ρ(μ) = 2μ on [0, 1], zero elsewhere
pub fn direction_density(mu: f64) -> f64 {
    if (0.0..=1.0).contains(&mu) {
        2.0 * mu
    } else {
        0.0
    }
}

/// Cumulative distribution of μ: F(μ) = μ² clamped to [0, 1]
pub fn direction_cdf(mu: f64) -> f64 {
    let m = mu.clamp(0.0, 1.0);
    m * m
}
