//! Packet sources
//!
//! A packet source turns photosphere parameters into a [`PacketBatch`].
//! Downstream transport code depends only on the [`PacketSource`] trait, so
//! any source honoring the four-sequence contract is a drop-in replacement.
//!
//! # Implementing a source
//!
//! ```rust
//! use packet_source_core_rs::source::PacketSource;
//! use packet_source_core_rs::{PacketBatch, PacketSourceError};
//!
//! /// Emits every packet radially at one frequency
//! struct Monochromatic {
//!     frequency: f64,
//! }
//!
//! impl PacketSource for Monochromatic {
//!     fn create_packets(
//!         &mut self,
//!         _temperature: f64,
//!         n_packets: usize,
//!         radius: f64,
//!     ) -> Result<PacketBatch, PacketSourceError> {
//!         PacketBatch::from_parts(
//!             vec![radius; n_packets],
//!             vec![self.frequency; n_packets],
//!             vec![1.0; n_packets],
//!             vec![1.0 / n_packets as f64; n_packets],
//!         )
//!     }
//! }
//!
//! let batch = Monochromatic { frequency: 5e14 }.create_packets(0.0, 3, 1e15).unwrap();
//! assert_eq!(batch.frequencies(), &[5e14; 3]);
//! ```

pub mod blackbody;
pub mod config;
pub mod partition;

pub use blackbody::{generate, generate_with_sampler, BlackBodySource};
pub use config::{SourceConfig, DEFAULT_SEED};
pub use partition::{generate_partitioned, PartitionPlan};

use crate::error::PacketSourceError;
use crate::models::PacketBatch;

/// Anything that can emit a packet batch from photosphere parameters
pub trait PacketSource {
    /// Emit `n_packets` packets from a photosphere of `radius` (cm) at
    /// `temperature` (K)
    ///
    /// Implementations must validate before drawing and return either a
    /// complete batch of exactly `n_packets` or an error.
    fn create_packets(
        &mut self,
        temperature: f64,
        n_packets: usize,
        radius: f64,
    ) -> Result<PacketBatch, PacketSourceError>;
}
