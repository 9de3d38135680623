//! Planck spectrum model and packet spectrum estimates
//!
//! Rebinning a batch by frequency with weights energy_i/Δt, divided by the
//! bin width, estimates the luminosity density L_ν. For a correct sampler it
//! converges to 4π R² · π B_ν(T) as N grows.

use serde::{Deserialize, Serialize};

use super::luminosity::{blackbody_luminosity, simulation_time};
use crate::constants::{C, H, K_B, PI};
use crate::error::{require_positive, PacketSourceError};
use crate::models::PacketBatch;

/// Upper edge of the default binning range in units of k_B T / h
const DEFAULT_X_MAX: f64 = 15.0;

/// Planck specific intensity B_ν(T) (erg s⁻¹ cm⁻² Hz⁻¹ sr⁻¹)
///
/// Uses `exp_m1` so small hν/kT stays accurate; returns 0 once the
/// exponential overflows.
pub fn planck_intensity(nu: f64, temperature: f64) -> f64 {
    if nu <= 0.0 {
        return 0.0;
    }
    let x = H * nu / (K_B * temperature);
    let denom = x.exp_m1();
    if !denom.is_finite() {
        return 0.0;
    }
    2.0 * H * nu.powi(3) / (C * C) / denom
}

/// Luminosity density L_ν = 4π R² · π B_ν(T) (erg s⁻¹ Hz⁻¹)
///
/// # Example
/// ```
/// use packet_source_core_rs::diagnostics::{blackbody_luminosity, planck_luminosity_density};
///
/// // ∫ L_ν dν = L
/// let (r, t) = (1e15, 10_000.0);
/// let dnu = 1e12;
/// let total: f64 = (0..20_000)
///     .map(|i| planck_luminosity_density((i as f64 + 0.5) * dnu, r, t) * dnu)
///     .sum();
/// assert!((total / blackbody_luminosity(r, t) - 1.0).abs() < 1e-3);
/// ```
pub fn planck_luminosity_density(nu: f64, radius: f64, temperature: f64) -> f64 {
    4.0 * PI * radius * radius * PI * planck_intensity(nu, temperature)
}

/// Equal-width frequency binning over [nu_min, nu_max)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumBins {
    pub nu_min: f64,
    pub nu_max: f64,
    pub bins: usize,
}

impl SpectrumBins {
    /// `bins` bins over 0 ≤ hν/kT < 15, which holds all but ~2e-4 of the
    /// energy
    pub fn for_temperature(temperature: f64, bins: usize) -> Self {
        Self {
            nu_min: 0.0,
            nu_max: DEFAULT_X_MAX * K_B * temperature / H,
            bins,
        }
    }

    /// Require at least one bin over a finite, non-empty, non-negative range
    pub fn validate(&self) -> Result<(), PacketSourceError> {
        if self.bins == 0 {
            return Err(PacketSourceError::invalid("bins", 0.0, "must be at least 1"));
        }
        if !(self.nu_min.is_finite() && self.nu_min >= 0.0) {
            return Err(PacketSourceError::invalid(
                "nu_min",
                self.nu_min,
                "must be finite and non-negative",
            ));
        }
        require_positive("nu_max", self.nu_max)?;
        if self.nu_max <= self.nu_min {
            return Err(PacketSourceError::invalid(
                "nu_max",
                self.nu_max,
                "must exceed nu_min",
            ));
        }
        Ok(())
    }

    /// Bin width (Hz)
    pub fn width(&self) -> f64 {
        (self.nu_max - self.nu_min) / self.bins as f64
    }

    /// Bin holding `nu`, if in range
    pub fn index_of(&self, nu: f64) -> Option<usize> {
        if nu < self.nu_min || nu >= self.nu_max {
            return None;
        }
        let idx = ((nu - self.nu_min) / self.width()) as usize;
        Some(idx.min(self.bins - 1))
    }
}

/// Luminosity-weighted frequency histogram of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumHistogram {
    bins: SpectrumBins,
    radius: f64,
    temperature: f64,

    /// Packets per bin
    counts: Vec<usize>,

    /// Estimated L_ν per bin (erg s⁻¹ Hz⁻¹)
    values: Vec<f64>,
}

impl SpectrumHistogram {
    /// Rebin `batch` emitted by a photosphere of `radius` at `temperature`
    ///
    /// Δt is derived from the batch's total energy and the blackbody
    /// luminosity; packets outside the bin range are dropped.
    pub fn from_batch(
        batch: &PacketBatch,
        temperature: f64,
        radius: f64,
        bins: &SpectrumBins,
    ) -> Result<Self, PacketSourceError> {
        require_positive("temperature", temperature)?;
        require_positive("radius", radius)?;
        bins.validate()?;

        let luminosity = blackbody_luminosity(radius, temperature);
        let time_span = simulation_time(batch.total_energy(), luminosity)?;
        require_positive("time_span", time_span)?;

        let width = bins.width();
        let mut counts = vec![0usize; bins.bins];
        let mut values = vec![0.0; bins.bins];
        for packet in batch.iter() {
            if let Some(idx) = bins.index_of(packet.frequency) {
                counts[idx] += 1;
                values[idx] += packet.energy / time_span / width;
            }
        }

        Ok(Self {
            bins: *bins,
            radius,
            temperature,
            counts,
            values,
        })
    }

    /// Binning the histogram was built with
    pub fn bins(&self) -> &SpectrumBins {
        &self.bins
    }

    /// Packets per bin
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Estimated L_ν per bin (erg s⁻¹ Hz⁻¹)
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bin edges, `bins + 1` of them
    pub fn edges(&self) -> Vec<f64> {
        let width = self.bins.width();
        (0..=self.bins.bins)
            .map(|i| self.bins.nu_min + i as f64 * width)
            .collect()
    }

    /// Bin centres (Hz)
    pub fn centers(&self) -> Vec<f64> {
        let width = self.bins.width();
        (0..self.bins.bins)
            .map(|i| self.bins.nu_min + (i as f64 + 0.5) * width)
            .collect()
    }

    /// Model L_ν at each bin centre
    pub fn model(&self) -> Vec<f64> {
        self.centers()
            .into_iter()
            .map(|nu| planck_luminosity_density(nu, self.radius, self.temperature))
            .collect()
    }

    /// Largest |estimate − model| / model over bins with at least
    /// `min_count` packets; `None` if no bin qualifies
    pub fn max_relative_deviation(&self, min_count: usize) -> Option<f64> {
        self.values
            .iter()
            .zip(self.model())
            .zip(&self.counts)
            .filter(|(_, count)| **count >= min_count)
            .filter(|((_, model), _)| *model > 0.0)
            .map(|((value, model), _)| (value - model).abs() / model)
            .reduce(f64::max)
    }
}
