//! Checkpoint - Save/Load Packet Batches
//!
//! Serializes a generated batch together with everything needed to
//! regenerate it (config, partitioning, photosphere parameters) and two
//! fingerprints.
//!
//! # Critical Invariants
//!
//! - **Determinism**: same config + parameters regenerate the same digest
//! - **Integrity**: a snapshot only loads if its batch still hashes to the
//!   recorded digest
//! - **Config Matching**: the recorded config hash must match the config
//!   and the chunk size the batch was partitioned with

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PacketSourceError;
use crate::models::PacketBatch;
use crate::source::{
    generate_partitioned, BlackBodySource, PacketSource, PartitionPlan, SourceConfig,
};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// A batch plus the inputs that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSnapshot {
    /// Unique snapshot identifier (UUID), not part of any fingerprint
    pub snapshot_id: String,

    /// Source configuration (seed + Planck settings)
    pub config: SourceConfig,

    /// Sub-stream partitioning, `None` for a single-stream batch
    #[serde(default)]
    pub partition: Option<PartitionPlan>,

    /// Photosphere temperature (K)
    pub temperature: f64,

    /// Photosphere radius (cm)
    pub radius: f64,

    pub n_packets: usize,

    /// SHA256 hash of the canonical config JSON plus the chunk size
    pub config_hash: String,

    /// SHA256 hash of the batch's exact bit patterns
    pub batch_digest: String,

    pub batch: PacketBatch,
}

impl BatchSnapshot {
    /// Capture `batch` with the inputs that produced it
    ///
    /// Pass the [`PartitionPlan`] when the batch came from
    /// [`generate_partitioned`], `None` when it came from one rng stream.
    pub fn take(
        config: &SourceConfig,
        partition: Option<PartitionPlan>,
        temperature: f64,
        radius: f64,
        batch: PacketBatch,
    ) -> Result<Self, PacketSourceError> {
        Ok(Self {
            snapshot_id: uuid::Uuid::new_v4().to_string(),
            config: config.clone(),
            partition,
            temperature,
            radius,
            n_packets: batch.len(),
            config_hash: compute_generation_hash(config, partition.as_ref())?,
            batch_digest: compute_batch_digest(&batch),
            batch,
        })
    }

    /// Regenerate the batch from the recorded inputs
    ///
    /// For an intact snapshot the result hashes to `batch_digest`.
    pub fn regenerate(&self) -> Result<PacketBatch, PacketSourceError> {
        match &self.partition {
            Some(plan) => generate_partitioned(
                self.temperature,
                self.n_packets,
                self.radius,
                &self.config,
                plan,
            ),
            None => BlackBodySource::from_config(&self.config)?.create_packets(
                self.temperature,
                self.n_packets,
                self.radius,
            ),
        }
    }

    /// Serialize to JSON (floats round-trip exactly)
    pub fn to_json(&self) -> Result<String, PacketSourceError> {
        serde_json::to_string(self).map_err(|e| {
            PacketSourceError::Serialization(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Parse and validate a snapshot
    pub fn from_json(json: &str) -> Result<Self, PacketSourceError> {
        let snapshot: BatchSnapshot = serde_json::from_str(json).map_err(|e| {
            PacketSourceError::Serialization(format!("Snapshot deserialization failed: {}", e))
        })?;
        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Goes through `serde_json::Value`, whose maps keep keys sorted (the
/// `preserve_order` feature is off), so the hash does not depend on field
/// order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, PacketSourceError> {
    let value = serde_json::to_value(config).map_err(|e| {
        PacketSourceError::Serialization(format!("Config serialization failed: {}", e))
    })?;
    let json = serde_json::to_string(&value).map_err(|e| {
        PacketSourceError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Inputs that decide a batch's contents
///
/// The thread count never changes the output, so only the chunk size of a
/// partition is hashed.
#[derive(Serialize)]
struct GenerationInputs<'a> {
    config: &'a SourceConfig,
    chunk_size: Option<usize>,
}

/// Hash of the config plus the chunk size of `partition`, if any
pub fn compute_generation_hash(
    config: &SourceConfig,
    partition: Option<&PartitionPlan>,
) -> Result<String, PacketSourceError> {
    compute_config_hash(&GenerationInputs {
        config,
        chunk_size: partition.map(|plan| plan.chunk_size),
    })
}

/// SHA256 over the raw little-endian bits of all four sequences
///
/// Two batches share a digest only if they are bit-identical (up to hash
/// collisions), which is stricter than `==` on f64 (`-0.0 == 0.0`).
pub fn compute_batch_digest(batch: &PacketBatch) -> String {
    let mut hasher = Sha256::new();
    hasher.update((batch.len() as u64).to_le_bytes());
    for column in [
        batch.radii(),
        batch.frequencies(),
        batch.mus(),
        batch.energies(),
    ] {
        for value in column {
            hasher.update(value.to_bits().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - Batch invariants (lengths, value domains)
/// - Recorded packet count and radius match the batch
/// - Config hash and batch digest match their contents
pub fn validate_snapshot(snapshot: &BatchSnapshot) -> Result<(), PacketSourceError> {
    snapshot.batch.validate()?;

    if snapshot.batch.len() != snapshot.n_packets {
        return Err(PacketSourceError::SnapshotMismatch(format!(
            "Packet count mismatch: recorded {}, batch holds {}",
            snapshot.n_packets,
            snapshot.batch.len()
        )));
    }

    if let Some(r) = snapshot
        .batch
        .radii()
        .iter()
        .find(|&&r| r != snapshot.radius)
    {
        return Err(PacketSourceError::SnapshotMismatch(format!(
            "Packet radius {} differs from photosphere radius {}",
            r, snapshot.radius
        )));
    }

    if let Some(plan) = &snapshot.partition {
        plan.validate()?;
    }

    let config_hash = compute_generation_hash(&snapshot.config, snapshot.partition.as_ref())?;
    if config_hash != snapshot.config_hash {
        return Err(PacketSourceError::SnapshotMismatch(format!(
            "Config hash mismatch: recorded {}, computed {}",
            snapshot.config_hash, config_hash
        )));
    }

    let digest = compute_batch_digest(&snapshot.batch);
    if digest != snapshot.batch_digest {
        return Err(PacketSourceError::SnapshotMismatch(format!(
            "Batch digest mismatch: recorded {}, computed {}",
            snapshot.batch_digest, digest
        )));
    }

    Ok(())
}
