//! Sub-stream partitioned generation
//!
//! The packet index range is cut into chunks of `chunk_size`; chunk `c`
//! draws only from `RngManager::new(seed).substream(c)`. Chunks share no
//! mutable state, so they can run on a rayon pool of any size and the
//! joined batch is the same bit for bit.
//!
//! The result depends on `chunk_size` (it decides which packets share a
//! stream) but never on `threads`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::blackbody::{fill_packets, validate_request};
use super::config::SourceConfig;
use crate::error::PacketSourceError;
use crate::models::PacketBatch;
use crate::rng::RngManager;
use crate::sampling::PlanckSampler;

/// How a partitioned batch is cut and scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPlan {
    /// Packets per sub-stream
    pub chunk_size: usize,

    /// Worker threads (1 = run chunks in order on the calling thread)
    pub threads: usize,
}

impl Default for PartitionPlan {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            threads: 1,
        }
    }
}

impl PartitionPlan {
    /// Require a non-zero chunk size and thread count
    pub fn validate(&self) -> Result<(), PacketSourceError> {
        if self.chunk_size == 0 {
            return Err(PacketSourceError::invalid(
                "chunk_size",
                0.0,
                "must be at least 1",
            ));
        }
        if self.threads == 0 {
            return Err(PacketSourceError::invalid(
                "threads",
                0.0,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Number of chunks covering `n_packets`
    pub fn chunk_count(&self, n_packets: usize) -> usize {
        n_packets.div_ceil(self.chunk_size)
    }
}

/// Generate a batch over independent rng sub-streams
///
/// Every packet still carries energy 1/N for the full batch size N.
///
/// # Example
/// ```
/// use packet_source_core_rs::source::{generate_partitioned, PartitionPlan, SourceConfig};
///
/// let config = SourceConfig::with_seed(1);
/// let serial = PartitionPlan { chunk_size: 1_000, threads: 1 };
/// let parallel = PartitionPlan { chunk_size: 1_000, threads: 4 };
///
/// let a = generate_partitioned(10_000.0, 5_500, 1e15, &config, &serial).unwrap();
/// let b = generate_partitioned(10_000.0, 5_500, 1e15, &config, &parallel).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate_partitioned(
    temperature: f64,
    n_packets: usize,
    radius: f64,
    config: &SourceConfig,
    plan: &PartitionPlan,
) -> Result<PacketBatch, PacketSourceError> {
    config.validate()?;
    plan.validate()?;
    let sampler = PlanckSampler::new(&config.planck)?;
    validate_request(temperature, n_packets, radius, &sampler)?;

    let root = RngManager::new(config.seed);
    let n_chunks = plan.chunk_count(n_packets);
    let energy = 1.0 / n_packets as f64;

    let run_chunk = |chunk: usize| -> PacketBatch {
        let start = chunk * plan.chunk_size;
        let count = plan.chunk_size.min(n_packets - start);
        let mut rng = root.substream(chunk as u64);
        fill_packets(temperature, count, radius, energy, &mut rng, &sampler)
    };

    let workers = plan.threads.min(n_chunks);
    let chunks: Vec<PacketBatch> = if workers <= 1 {
        (0..n_chunks).map(run_chunk).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| PacketSourceError::WorkerPool(e.to_string()))?;
        // Indexed collect keeps chunk order regardless of scheduling
        pool.install(|| (0..n_chunks).into_par_iter().map(run_chunk).collect())
    };

    let batch = PacketBatch::concat(chunks)?;

    info!(
        n_packets,
        n_chunks,
        workers,
        seed = config.seed,
        "created partitioned blackbody packets"
    );
    Ok(batch)
}
