//! Distribution samplers used to initialize packets
//!
//! - **direction**: flux-weighted direction cosines, ρ(μ) = 2μ
//! - **planck**: blackbody frequencies via Carter's series/Gamma mixture
//!
//! Samplers are generic over [`UniformSource`](crate::rng::UniformSource)
//! and draw a fixed number of variates per call, so the draw count of a
//! batch is a pure function of its size.

pub mod direction;
pub mod planck;

pub use direction::{direction_cdf, direction_density, sample_mu};
pub use planck::{
    PlanckConfig, PlanckSampler, DEFAULT_MAX_SERIES_TERMS, DEFAULT_SERIES_TOLERANCE, GAMMA_SHAPE,
};

/// Uniform draws consumed per packet: one for μ, one for the series index,
/// [`GAMMA_SHAPE`] for the Gamma variate
pub const DRAWS_PER_PACKET: usize = 2 + GAMMA_SHAPE;
