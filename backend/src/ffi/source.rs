//! PyO3 wrapper for the blackbody packet source
//!
//! This module provides the Python interface to the Rust packet source.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{batch_to_arrays, parse_source_config, to_py_err, PacketArrays};
use crate::diagnostics;
use crate::sampling::{PlanckConfig, DEFAULT_MAX_SERIES_TERMS, DEFAULT_SERIES_TOLERANCE};
use crate::source::{BlackBodySource, PacketSource, SourceConfig};

/// Python wrapper for the Rust blackbody packet source
///
/// # Example (from Python)
///
/// ```python
/// from packet_source_core_rs import PacketSource, blackbody_luminosity, simulation_time
///
/// source = PacketSource(1)
/// radii, nus, mus, energies = source.create_packets(10_000.0, 40_000, 1e15)
///
/// dt = simulation_time(sum(energies), blackbody_luminosity(1e15, 10_000.0))
/// packet_lums = [e / dt for e in energies]
/// ```
#[pyclass(name = "PacketSource")]
pub struct PyPacketSource {
    inner: BlackBodySource,
    seed: u64,
}

#[pymethods]
impl PyPacketSource {
    /// Create a source seeded with `seed`
    ///
    /// # Errors
    ///
    /// Raises ValueError if the Planck settings are out of range or cannot
    /// reach the tolerance within `max_terms`.
    #[new]
    #[pyo3(signature = (seed, tolerance = DEFAULT_SERIES_TOLERANCE, max_terms = DEFAULT_MAX_SERIES_TERMS))]
    fn new(seed: u64, tolerance: f64, max_terms: usize) -> PyResult<Self> {
        let config = SourceConfig {
            seed,
            planck: PlanckConfig {
                tolerance,
                max_terms,
            },
        };
        let inner = BlackBodySource::from_config(&config).map_err(to_py_err)?;
        Ok(Self { inner, seed })
    }

    /// Create a source from a configuration dict
    #[staticmethod]
    fn from_config(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_source_config(config)?;
        let inner = BlackBodySource::from_config(&rust_config).map_err(to_py_err)?;
        Ok(Self {
            inner,
            seed: rust_config.seed,
        })
    }

    /// Generate packets from a photosphere
    ///
    /// # Returns
    ///
    /// Tuple `(radii, frequencies, mus, energies)` of equal-length lists.
    fn create_packets(
        &mut self,
        temperature: f64,
        n_packets: usize,
        radius: f64,
    ) -> PyResult<PacketArrays> {
        let batch = self
            .inner
            .create_packets(temperature, n_packets, radius)
            .map_err(to_py_err)?;
        Ok(batch_to_arrays(batch))
    }

    /// Seed this source was created with
    #[getter]
    fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of retained Planck series terms
    #[getter]
    fn series_terms(&self) -> usize {
        self.inner.sampler().terms()
    }

    fn __repr__(&self) -> String {
        format!(
            "PacketSource(seed={}, series_terms={})",
            self.seed,
            self.inner.sampler().terms()
        )
    }
}

/// Blackbody luminosity 4πR²σT⁴ (erg/s)
#[pyfunction]
pub fn blackbody_luminosity(radius: f64, temperature: f64) -> f64 {
    diagnostics::blackbody_luminosity(radius, temperature)
}

/// Emission time span E_total / L (s)
#[pyfunction]
pub fn simulation_time(total_energy: f64, luminosity: f64) -> PyResult<f64> {
    diagnostics::simulation_time(total_energy, luminosity).map_err(to_py_err)
}
