//! Blackbody photosphere packet source
//!
//! Packets leave a spherical photosphere of radius R at temperature T:
//! every packet starts at R, carries energy 1/N, points outward with
//! flux-weighted μ and has a Planck-distributed frequency.
//!
//! # Draw order
//!
//! Per packet, in index order: one draw for μ, then one draw for the Planck
//! series index, then [`GAMMA_SHAPE`](crate::sampling::GAMMA_SHAPE) draws
//! for the Gamma variate. A batch of N packets consumes exactly
//! `N * DRAWS_PER_PACKET` draws.

use tracing::{debug, info};

use super::config::SourceConfig;
use super::PacketSource;
use crate::error::{require_positive, PacketSourceError};
use crate::models::PacketBatch;
use crate::rng::{RngManager, UniformSource};
use crate::sampling::{sample_mu, PlanckConfig, PlanckSampler, DRAWS_PER_PACKET};

/// Check generation preconditions before any draw is made
pub(crate) fn validate_request(
    temperature: f64,
    n_packets: usize,
    radius: f64,
    sampler: &PlanckSampler,
) -> Result<(), PacketSourceError> {
    if n_packets == 0 {
        return Err(PacketSourceError::invalid(
            "n_packets",
            0.0,
            "must be at least 1",
        ));
    }
    require_positive("radius", radius)?;
    sampler.frequency_scale(temperature)?;
    Ok(())
}

/// Sample `count` packets of fixed `energy` from one rng stream
///
/// Preconditions must already hold (see [`validate_request`]).
pub(crate) fn fill_packets<R: UniformSource + ?Sized>(
    temperature: f64,
    count: usize,
    radius: f64,
    energy: f64,
    rng: &mut R,
    sampler: &PlanckSampler,
) -> PacketBatch {
    let mut frequencies = Vec::with_capacity(count);
    let mut mus = Vec::with_capacity(count);

    for _ in 0..count {
        mus.push(sample_mu(rng));
        frequencies.push(sampler.sample_frequency(temperature, rng));
    }

    PacketBatch::from_parts_unchecked(vec![radius; count], frequencies, mus, vec![energy; count])
}

/// Generate a batch from an already-built sampler
///
/// # Errors
///
/// - `InvalidParameter`: `n_packets == 0`, non-positive/non-finite radius
///   or temperature
/// - `NumericalTruncationRisk`: temperature outside the representable
///   frequency range
///
/// On error the rng is untouched.
pub fn generate_with_sampler<R: UniformSource + ?Sized>(
    temperature: f64,
    n_packets: usize,
    radius: f64,
    rng: &mut R,
    sampler: &PlanckSampler,
) -> Result<PacketBatch, PacketSourceError> {
    validate_request(temperature, n_packets, radius, sampler)?;

    let energy = 1.0 / n_packets as f64;
    let batch = fill_packets(temperature, n_packets, radius, energy, rng, sampler);

    debug!(n_packets, temperature, radius, "generated packet batch");
    Ok(batch)
}

/// Generate a blackbody packet batch
///
/// Builds the Planck series table from `planck`, then samples. For repeated
/// calls prefer [`BlackBodySource`], which builds the table once.
///
/// # Example
/// ```
/// use packet_source_core_rs::sampling::PlanckConfig;
/// use packet_source_core_rs::source::generate;
/// use packet_source_core_rs::RngManager;
///
/// let mut rng = RngManager::new(1);
/// let batch = generate(10_000.0, 100, 1e15, &mut rng, &PlanckConfig::default()).unwrap();
/// assert_eq!(batch.len(), 100);
/// assert!(batch.radii().iter().all(|&r| r == 1e15));
/// ```
pub fn generate<R: UniformSource + ?Sized>(
    temperature: f64,
    n_packets: usize,
    radius: f64,
    rng: &mut R,
    planck: &PlanckConfig,
) -> Result<PacketBatch, PacketSourceError> {
    let sampler = PlanckSampler::new(planck)?;
    generate_with_sampler(temperature, n_packets, radius, rng, &sampler)
}

/// Seeded blackbody packet source
///
/// Owns its rng, so successive calls continue one deterministic stream:
/// everything a source emits traces back to its seed plus call order.
///
/// # Example
/// ```
/// use packet_source_core_rs::source::{BlackBodySource, PacketSource};
///
/// let mut source = BlackBodySource::new(1).unwrap();
/// let batch = source.create_packets(10_000.0, 40_000, 1e15).unwrap();
///
/// assert_eq!(batch.len(), 40_000);
/// assert!(batch.energies().iter().all(|&e| e == 1.0 / 40_000.0));
/// assert!(batch.mus().iter().all(|&mu| (0.0..=1.0).contains(&mu)));
/// ```
#[derive(Debug, Clone)]
pub struct BlackBodySource<R: UniformSource = RngManager> {
    rng: R,
    sampler: PlanckSampler,
}

impl BlackBodySource<RngManager> {
    /// Source seeded with `seed`, default Planck settings
    pub fn new(seed: u64) -> Result<Self, PacketSourceError> {
        Self::from_config(&SourceConfig::with_seed(seed))
    }

    /// Source built from a full configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, PacketSourceError> {
        config.validate()?;
        Self::with_rng(RngManager::new(config.seed), &config.planck)
    }
}

impl<R: UniformSource> BlackBodySource<R> {
    /// Source drawing from a caller-supplied rng
    pub fn with_rng(rng: R, planck: &PlanckConfig) -> Result<Self, PacketSourceError> {
        let sampler = PlanckSampler::new(planck)?;
        Ok(Self { rng, sampler })
    }

    /// The rng in its current state
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// The precomputed Planck sampler
    pub fn sampler(&self) -> &PlanckSampler {
        &self.sampler
    }

    /// Give back the rng, e.g. to resume the stream elsewhere
    pub fn into_rng(self) -> R {
        self.rng
    }
}

impl<R: UniformSource> PacketSource for BlackBodySource<R> {
    fn create_packets(
        &mut self,
        temperature: f64,
        n_packets: usize,
        radius: f64,
    ) -> Result<PacketBatch, PacketSourceError> {
        let batch =
            generate_with_sampler(temperature, n_packets, radius, &mut self.rng, &self.sampler)?;
        info!(
            n_packets,
            temperature,
            radius,
            draws = n_packets * DRAWS_PER_PACKET,
            series_terms = self.sampler.terms(),
            "created blackbody packets"
        );
        Ok(batch)
    }
}
