//! Packet batch model
//!
//! A batch is the output of one generation call: four index-aligned
//! sequences (radius, frequency, direction cosine, energy) of equal length.
//! Packet `i`'s fields all live at index `i`.
//!
//! CRITICAL: batches are immutable. Fields are private and exposed only as
//! shared slices; there is no way to reorder, resize or edit a batch after
//! construction.

use serde::{Deserialize, Serialize};

use crate::error::PacketSourceError;

/// Tolerance on Σ energy for batches claiming unit total energy
pub const ENERGY_SUM_TOLERANCE: f64 = 1e-9;

/// Copy of a single packet's fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Distance from the domain centre at emission (cm)
    pub radius: f64,

    /// Frequency (Hz)
    pub frequency: f64,

    /// Cosine of the angle to the outward radial normal
    pub mu: f64,

    /// Packet energy (erg)
    pub energy: f64,
}

/// Immutable, index-aligned packet ensemble
///
/// # Example
/// ```
/// use packet_source_core_rs::PacketBatch;
///
/// let batch = PacketBatch::from_parts(
///     vec![1e15, 1e15],
///     vec![3e14, 6e14],
///     vec![0.2, 0.9],
///     vec![0.5, 0.5],
/// ).unwrap();
///
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.total_energy(), 1.0);
/// let (radii, nus, mus, energies) = batch.into_parts();
/// assert_eq!(radii.len(), nus.len());
/// assert_eq!(mus.len(), energies.len());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PacketBatchParts")]
pub struct PacketBatch {
    radii: Vec<f64>,
    frequencies: Vec<f64>,
    mus: Vec<f64>,
    energies: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`PacketBatch::from_parts`]
#[derive(Deserialize)]
struct PacketBatchParts {
    radii: Vec<f64>,
    frequencies: Vec<f64>,
    mus: Vec<f64>,
    energies: Vec<f64>,
}

impl TryFrom<PacketBatchParts> for PacketBatch {
    type Error = PacketSourceError;

    fn try_from(parts: PacketBatchParts) -> Result<Self, Self::Error> {
        PacketBatch::from_parts(parts.radii, parts.frequencies, parts.mus, parts.energies)
    }
}

impl PacketBatch {
    /// Build a batch from four sequences, checking every packet invariant
    ///
    /// Energies may differ between packets; they must be finite and
    /// non-negative.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the sequences are empty or differ in length,
    /// or any value lies outside its domain.
    pub fn from_parts(
        radii: Vec<f64>,
        frequencies: Vec<f64>,
        mus: Vec<f64>,
        energies: Vec<f64>,
    ) -> Result<Self, PacketSourceError> {
        let batch = Self {
            radii,
            frequencies,
            mus,
            energies,
        };
        batch.validate()?;
        Ok(batch)
    }

    /// Check every packet invariant
    ///
    /// Batches built by this crate always pass; deserialized batches are
    /// checked here before use.
    pub fn validate(&self) -> Result<(), PacketSourceError> {
        let n = self.radii.len();
        if n == 0 {
            return Err(PacketSourceError::invalid(
                "n_packets",
                0.0,
                "batch must hold at least one packet",
            ));
        }
        for (name, len) in [
            ("frequencies", self.frequencies.len()),
            ("mus", self.mus.len()),
            ("energies", self.energies.len()),
        ] {
            if len != n {
                return Err(PacketSourceError::invalid(
                    name,
                    len as f64,
                    "length differs from radii",
                ));
            }
        }

        if let Some(&r) = self.radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(PacketSourceError::invalid("radius", r, "must be finite and positive"));
        }
        if let Some(&nu) = self
            .frequencies
            .iter()
            .find(|nu| !(nu.is_finite() && **nu > 0.0))
        {
            return Err(PacketSourceError::invalid(
                "frequency",
                nu,
                "must be finite and positive",
            ));
        }
        if let Some(&mu) = self.mus.iter().find(|mu| !(0.0..=1.0).contains(*mu)) {
            return Err(PacketSourceError::invalid("mu", mu, "must lie in [0, 1]"));
        }
        if let Some(&e) = self
            .energies
            .iter()
            .find(|e| !(e.is_finite() && **e >= 0.0))
        {
            return Err(PacketSourceError::invalid(
                "energy",
                e,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Assemble a batch the caller has already validated
    pub(crate) fn from_parts_unchecked(
        radii: Vec<f64>,
        frequencies: Vec<f64>,
        mus: Vec<f64>,
        energies: Vec<f64>,
    ) -> Self {
        debug_assert!(
            radii.len() == frequencies.len()
                && radii.len() == mus.len()
                && radii.len() == energies.len()
        );
        Self {
            radii,
            frequencies,
            mus,
            energies,
        }
    }

    /// Join batches in order (partition 0 first)
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `batches` is empty.
    pub fn concat(batches: Vec<PacketBatch>) -> Result<Self, PacketSourceError> {
        if batches.is_empty() {
            return Err(PacketSourceError::invalid(
                "n_packets",
                0.0,
                "batch must hold at least one packet",
            ));
        }
        let n: usize = batches.iter().map(PacketBatch::len).sum();
        let mut radii = Vec::with_capacity(n);
        let mut frequencies = Vec::with_capacity(n);
        let mut mus = Vec::with_capacity(n);
        let mut energies = Vec::with_capacity(n);
        for batch in batches {
            radii.extend(batch.radii);
            frequencies.extend(batch.frequencies);
            mus.extend(batch.mus);
            energies.extend(batch.energies);
        }
        Ok(Self::from_parts_unchecked(radii, frequencies, mus, energies))
    }

    /// Number of packets N
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// Always false: a batch holds at least one packet
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Emission radii (cm)
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Frequencies (Hz)
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Direction cosines μ ∈ [0, 1]
    pub fn mus(&self) -> &[f64] {
        &self.mus
    }

    /// Packet energies (erg)
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Packet at `index`, if in range
    pub fn packet(&self, index: usize) -> Option<Packet> {
        Some(Packet {
            radius: *self.radii.get(index)?,
            frequency: *self.frequencies.get(index)?,
            mu: *self.mus.get(index)?,
            energy: *self.energies.get(index)?,
        })
    }

    /// Iterate packets in index order
    pub fn iter(&self) -> impl Iterator<Item = Packet> + '_ {
        (0..self.len()).filter_map(move |i| self.packet(i))
    }

    /// Σ energy over the batch (erg)
    pub fn total_energy(&self) -> f64 {
        self.energies.iter().sum()
    }

    /// Whether Σ energy is 1 within [`ENERGY_SUM_TOLERANCE`]
    pub fn has_unit_energy(&self) -> bool {
        (self.total_energy() - 1.0).abs() <= ENERGY_SUM_TOLERANCE
    }

    /// Split into `(radii, frequencies, mus, energies)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.radii, self.frequencies, self.mus, self.energies)
    }
}
