//! Physical normalization of a packet batch
//!
//! A batch carries abstract energy (1 erg in total for the blackbody
//! source). Dividing by the photosphere luminosity gives the emission time
//! the batch represents; dividing each packet energy by that time gives its
//! luminosity contribution.

use crate::constants::{PI, SIGMA_SB};
use crate::error::{require_positive, PacketSourceError};
use crate::models::PacketBatch;

/// Blackbody luminosity L = 4π R² σ_SB T⁴ (erg/s)
///
/// # Example
/// ```
/// use packet_source_core_rs::diagnostics::blackbody_luminosity;
///
/// // Sun: R = 6.957e10 cm, T = 5772 K → L ≈ 3.83e33 erg/s
/// let l = blackbody_luminosity(6.957e10, 5772.0);
/// assert!((l / 3.828e33 - 1.0).abs() < 0.01);
/// ```
pub fn blackbody_luminosity(radius: f64, temperature: f64) -> f64 {
    4.0 * PI * radius * radius * SIGMA_SB * temperature.powi(4)
}

/// Emission time span Δt = E_total / L (s)
///
/// # Errors
///
/// `InvalidParameter` if `luminosity` is not finite and positive, or
/// `total_energy` is negative or non-finite.
pub fn simulation_time(total_energy: f64, luminosity: f64) -> Result<f64, PacketSourceError> {
    require_positive("luminosity", luminosity)?;
    if !(total_energy.is_finite() && total_energy >= 0.0) {
        return Err(PacketSourceError::invalid(
            "total_energy",
            total_energy,
            "must be finite and non-negative",
        ));
    }
    Ok(total_energy / luminosity)
}

/// Luminosity contribution energy_i / Δt of every packet (erg/s)
///
/// # Errors
///
/// `InvalidParameter` if `time_span` is not finite and positive.
pub fn packet_luminosities(batch: &PacketBatch, time_span: f64) -> Result<Vec<f64>, PacketSourceError> {
    require_positive("time_span", time_span)?;
    Ok(batch.energies().iter().map(|e| e / time_span).collect())
}
