//! Caller-side diagnostics
//!
//! Nothing here is part of the packet source contract. These helpers
//! normalize a batch physically (luminosity, emission time) and compare its
//! distributions against the analytic ones.

pub mod luminosity;
pub mod spectrum;
pub mod stats;

pub use luminosity::{blackbody_luminosity, packet_luminosities, simulation_time};
pub use spectrum::{planck_intensity, planck_luminosity_density, SpectrumBins, SpectrumHistogram};
pub use stats::{histogram, ks_critical_value, ks_statistic};

use serde::{Deserialize, Serialize};

use crate::error::PacketSourceError;
use crate::models::PacketBatch;
use crate::sampling::direction_cdf;

/// Headline numbers of one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub n_packets: usize,
    pub radius: f64,
    pub temperature: f64,

    /// Photosphere luminosity (erg/s)
    pub luminosity: f64,

    /// Emission time represented by the batch (s)
    pub time_span: f64,

    pub total_energy: f64,
    pub mean_frequency: f64,
    pub mean_mu: f64,

    /// KS distance of the μ sample from F(μ) = μ²
    pub mu_ks_statistic: f64,
}

impl BatchSummary {
    /// Summarize `batch` emitted by a photosphere of `radius` at `temperature`
    pub fn from_batch(
        batch: &PacketBatch,
        temperature: f64,
        radius: f64,
    ) -> Result<Self, PacketSourceError> {
        let luminosity = blackbody_luminosity(radius, temperature);
        let total_energy = batch.total_energy();
        let time_span = simulation_time(total_energy, luminosity)?;
        let n = batch.len() as f64;

        Ok(Self {
            n_packets: batch.len(),
            radius,
            temperature,
            luminosity,
            time_span,
            total_energy,
            mean_frequency: batch.frequencies().iter().sum::<f64>() / n,
            mean_mu: batch.mus().iter().sum::<f64>() / n,
            mu_ks_statistic: ks_statistic(batch.mus(), direction_cdf),
        })
    }
}
