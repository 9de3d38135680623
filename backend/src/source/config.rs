//! Packet source configuration

use serde::{Deserialize, Serialize};

use crate::error::PacketSourceError;
use crate::sampling::PlanckConfig;

/// Seed used when a config file does not name one
pub const DEFAULT_SEED: u64 = 1;

/// Complete configuration of a blackbody packet source
///
/// Every field has a default, so `{}` is a valid JSON config.
///
/// # Example
/// ```
/// use packet_source_core_rs::source::SourceConfig;
///
/// let config: SourceConfig =
///     serde_json::from_str(r#"{ "seed": 7, "planck": { "tolerance": 1e-6 } }"#).unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.planck.max_terms, 10_000);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root rng seed (CRITICAL for determinism)
    pub seed: u64,

    /// Planck series truncation settings
    pub planck: PlanckConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            planck: PlanckConfig::default(),
        }
    }
}

impl SourceConfig {
    /// Config with the given seed and default Planck settings
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check the Planck settings; every seed is valid
    pub fn validate(&self) -> Result<(), PacketSourceError> {
        self.planck.validate()
    }
}
