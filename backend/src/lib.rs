//! Packet Source Core - Rust Engine
//!
//! Monte Carlo energy packets emitted by a spherical blackbody photosphere,
//! with deterministic seeded execution.
//!
//! # Architecture
//!
//! - **models**: Domain types (Packet, PacketBatch)
//! - **rng**: Deterministic random number generation
//! - **sampling**: Direction cosine and Planck frequency samplers
//! - **source**: The packet source contract and the blackbody source
//! - **diagnostics**: Luminosity normalization and distribution checks
//! - **checkpoint**: Fingerprinted batch snapshots
//!
//! # Critical Invariants
//!
//! 1. The four packet sequences always share one length
//! 2. Packet energies sum to 1 for every generated batch
//! 3. All randomness is deterministic (seeded RNG)
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod checkpoint;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod rng;
pub mod sampling;
pub mod source;

// Re-exports for convenience
pub use checkpoint::BatchSnapshot;
pub use diagnostics::{blackbody_luminosity, simulation_time, BatchSummary};
pub use error::PacketSourceError;
pub use models::{Packet, PacketBatch};
pub use rng::{RngManager, UniformSource};
pub use sampling::{PlanckConfig, PlanckSampler};
pub use source::{
    generate, generate_partitioned, BlackBodySource, PacketSource, PartitionPlan, SourceConfig,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn packet_source_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::source::PyPacketSource>()?;
    m.add_function(wrap_pyfunction!(ffi::source::blackbody_luminosity, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::source::simulation_time, m)?)?;
    Ok(())
}
