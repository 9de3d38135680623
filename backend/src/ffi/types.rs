//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, tuples).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::PacketSourceError;
use crate::models::PacketBatch;
use crate::sampling::PlanckConfig;
use crate::source::{SourceConfig, DEFAULT_SEED};

/// Four-sequence packet output: (radii, frequencies, mus, energies)
pub type PacketArrays = (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>);

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
///
/// # Example
/// ```ignore
/// let tolerance: f64 = extract_with_default(&py_dict, "tolerance", 1e-4)?;
/// ```
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: for<'py> FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to SourceConfig
///
/// Accepts `{"seed": int, "planck": {"tolerance": float, "max_terms": int}}`;
/// every key is optional.
///
/// # Errors
///
/// Returns PyErr if:
/// - Type conversions fail
/// - Values out of valid range
pub fn parse_source_config(py_config: &Bound<'_, PyDict>) -> PyResult<SourceConfig> {
    let seed: u64 = extract_with_default(py_config, "seed", DEFAULT_SEED)?;

    let planck = if let Some(py_planck) = py_config.get_item("planck")? {
        let planck_dict: Bound<'_, PyDict> = py_planck.downcast_into()?;
        let defaults = PlanckConfig::default();
        PlanckConfig {
            tolerance: extract_with_default(&planck_dict, "tolerance", defaults.tolerance)?,
            max_terms: extract_with_default(&planck_dict, "max_terms", defaults.max_terms)?,
        }
    } else {
        PlanckConfig::default()
    };

    let config = SourceConfig { seed, planck };
    config.validate().map_err(to_py_err)?;
    Ok(config)
}

// ========================================================================
// Output Conversion
// ========================================================================

/// Split a batch into the four-sequence tuple handed to Python
pub fn batch_to_arrays(batch: PacketBatch) -> PacketArrays {
    batch.into_parts()
}

/// Map a packet source error onto a Python `ValueError`
pub fn to_py_err(err: PacketSourceError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
