//! Planck spectrum sampling (Carter's series method)
//!
//! In the dimensionless variable x = hν/(k_B T) the photon-energy spectrum
//! has density proportional to x³/(eˣ − 1). Expanding
//!
//! ```text
//! 1/(eˣ − 1) = Σ_{j≥1} e^{−jx}
//! ```
//!
//! turns it into a mixture: term j carries weight ∝ 6/j⁴ and, given j, x is
//! Gamma(4, j) distributed. Sampling is then exact up to the truncation of
//! the series:
//!
//! 1. pick j from the truncated, renormalized weights 1/j⁴ (one draw);
//! 2. x = −ln(u₁u₂u₃u₄)/j (four draws);
//! 3. ν = x · k_B T / h.
//!
//! The number of retained terms is the smallest M whose omitted tail mass
//! `1 − Σ_{j≤M} j⁻⁴ / (π⁴/90)` falls below [`PlanckConfig::tolerance`].
//! With the default tolerance of 1e-4 that is M = 15.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{H, K_B, ZETA_4};
use crate::error::{require_positive, PacketSourceError};
use crate::rng::UniformSource;

/// k_B / h (Hz/K), folded first so tiny temperatures do not pass through a
/// subnormal intermediate
const K_B_OVER_H: f64 = K_B / H;

/// Default bound on the omitted series tail, relative to π⁴/90
pub const DEFAULT_SERIES_TOLERANCE: f64 = 1e-4;

/// Default cap on retained series terms
///
/// Reaching a tolerance ε needs roughly (3ε·π⁴/90)^(-1/3) terms. f64 partial
/// sums stop resolving the tail near 2.6e-13, which 10 000 terms already
/// reach; tighter tolerances fail regardless of the cap.
pub const DEFAULT_MAX_SERIES_TERMS: usize = 10_000;

/// Uniform draws per Gamma(4, j) variate
pub const GAMMA_SHAPE: usize = 4;

/// Largest x the sampler can emit: −ln of four open draws ≥ 2^-53 each
const X_CEILING: f64 = GAMMA_SHAPE as f64 * 53.0 * std::f64::consts::LN_2;

/// Accuracy/performance trade-off of the Planck series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanckConfig {
    /// Maximum omitted tail mass, relative to the full series sum
    pub tolerance: f64,

    /// Upper bound on retained terms; exceeding it is a configuration error
    pub max_terms: usize,
}

impl Default for PlanckConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SERIES_TOLERANCE,
            max_terms: DEFAULT_MAX_SERIES_TERMS,
        }
    }
}

impl PlanckConfig {
    /// Check value domains (tolerance in (0, 1), at least one term)
    pub fn validate(&self) -> Result<(), PacketSourceError> {
        require_positive("tolerance", self.tolerance)?;
        if self.tolerance >= 1.0 {
            return Err(PacketSourceError::invalid(
                "tolerance",
                self.tolerance,
                "must be below 1",
            ));
        }
        if self.max_terms == 0 {
            return Err(PacketSourceError::invalid(
                "max_terms",
                0.0,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Precomputed series table for Planck frequency sampling
///
/// Build once, sample many times; the table is read-only after
/// construction, so one sampler can serve several rng streams.
///
/// # Example
/// ```
/// use packet_source_core_rs::sampling::{PlanckConfig, PlanckSampler};
/// use packet_source_core_rs::RngManager;
///
/// let sampler = PlanckSampler::new(&PlanckConfig::default()).unwrap();
/// assert_eq!(sampler.terms(), 15);
///
/// let mut rng = RngManager::new(1);
/// let nu = sampler.sample_frequency(10_000.0, &mut rng);
/// assert!(nu > 0.0 && nu.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct PlanckSampler {
    /// Normalized cumulative weights; entry j−1 is P(index ≤ j)
    cdf: Vec<f64>,

    /// Omitted tail mass relative to π⁴/90
    tail_mass: f64,
}

impl PlanckSampler {
    /// Build the truncated series table
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the config is out of domain
    /// - `NumericalTruncationRisk` if `max_terms` terms cannot bring the
    ///   tail below `tolerance`
    pub fn new(config: &PlanckConfig) -> Result<Self, PacketSourceError> {
        config.validate()?;

        let mut cumulative = Vec::new();
        let mut partial = 0.0_f64;
        let mut tail_mass = 1.0_f64;

        for j in 1..=config.max_terms {
            let jf = j as f64;
            partial += 1.0 / (jf * jf * jf * jf);
            cumulative.push(partial);
            tail_mass = 1.0 - partial / ZETA_4;
            if tail_mass < config.tolerance {
                break;
            }
        }

        if tail_mass >= config.tolerance {
            return Err(PacketSourceError::NumericalTruncationRisk(format!(
                "{} series terms leave tail mass {:.3e}, above tolerance {:.3e}",
                config.max_terms, tail_mass, config.tolerance
            )));
        }

        // Normalize by the truncated sum, not π⁴/90, so the retained terms
        // form an exact distribution.
        let cdf: Vec<f64> = cumulative.iter().map(|c| c / partial).collect();

        debug!(
            terms = cdf.len(),
            tail_mass,
            tolerance = config.tolerance,
            "built Planck series table"
        );

        Ok(Self { cdf, tail_mass })
    }

    /// Number of retained series terms M
    pub fn terms(&self) -> usize {
        self.cdf.len()
    }

    /// Omitted tail mass relative to the full series sum
    pub fn tail_mass(&self) -> f64 {
        self.tail_mass
    }

    /// Probability of series term `j` (1-based) under the truncated table
    pub fn term_probability(&self, j: usize) -> f64 {
        match j {
            0 => 0.0,
            1 => self.cdf.first().copied().unwrap_or(0.0),
            _ if j <= self.cdf.len() => self.cdf[j - 1] - self.cdf[j - 2],
            _ => 0.0,
        }
    }

    /// Map a uniform u ∈ [0, 1) to a series index j ∈ [1, M]
    ///
    /// Discrete inverse CDF: the smallest j with P(index ≤ j) > u.
    pub fn series_index(&self, u: f64) -> usize {
        let idx = self.cdf.partition_point(|&c| c <= u);
        idx.min(self.cdf.len() - 1) + 1
    }

    /// Draw the dimensionless photon energy x = hν/(k_B T)
    ///
    /// Consumes exactly 1 + [`GAMMA_SHAPE`] uniform draws.
    pub fn sample_x<R: UniformSource + ?Sized>(&self, rng: &mut R) -> f64 {
        let j = self.series_index(rng.next_f64());
        let product: f64 = (0..GAMMA_SHAPE).map(|_| rng.next_open_f64()).product();
        -product.ln() / j as f64
    }

    /// Draw a frequency (Hz) from the Planck spectrum at `temperature` (K)
    ///
    /// Callers are expected to have checked the temperature with
    /// [`PlanckSampler::frequency_scale`].
    pub fn sample_frequency<R: UniformSource + ?Sized>(&self, temperature: f64, rng: &mut R) -> f64 {
        self.sample_x(rng) * (temperature * K_B_OVER_H)
    }

    /// Conversion factor k_B T / h from x to frequency
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for non-positive or non-finite temperature
    /// - `NumericalTruncationRisk` when some representable x would map to
    ///   an infinite or zero/subnormal frequency at this temperature
    pub fn frequency_scale(&self, temperature: f64) -> Result<f64, PacketSourceError> {
        require_positive("temperature", temperature)?;

        let scale = temperature * K_B_OVER_H;
        // Smallest x: four draws of at most 1 − 2^-53 each, divided by M.
        let x_floor = f64::EPSILON / self.terms() as f64;
        let nu_max = scale * X_CEILING;
        let nu_min = scale * x_floor;

        if !nu_max.is_finite() {
            return Err(PacketSourceError::NumericalTruncationRisk(format!(
                "temperature {:e} K overflows the frequency range (x up to {:.1})",
                temperature, X_CEILING
            )));
        }
        if nu_min < f64::MIN_POSITIVE {
            return Err(PacketSourceError::NumericalTruncationRisk(format!(
                "temperature {:e} K underflows the frequency range (x down to {:e})",
                temperature, x_floor
            )));
        }
        Ok(scale)
    }
}
