//! Error types for packet generation
//!
//! Every error is terminal for the call that raised it: validation runs
//! before any random draw, so a failed call never returns a partial batch
//! and never advances the caller's rng.

use thiserror::Error;

/// Errors raised by the packet source, its samplers and snapshots
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PacketSourceError {
    /// A caller-supplied parameter is out of its valid domain
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Planck sampling would be biased or produce non-finite frequencies
    #[error("Numerical truncation risk: {0}")]
    NumericalTruncationRisk(String),

    /// Snapshot (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot contents do not match their recorded fingerprints
    #[error("Snapshot mismatch: {0}")]
    SnapshotMismatch(String),

    /// The worker pool for partitioned generation could not start
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl PacketSourceError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        PacketSourceError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Require `value` to be finite and strictly positive
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, PacketSourceError> {
    if !value.is_finite() {
        return Err(PacketSourceError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(PacketSourceError::invalid(name, value, "must be positive"));
    }
    Ok(value)
}
