//! Physical constants (CGS)
//!
//! CODATA 2018 values. Lengths in cm, energies in erg, temperatures in K.

/// Planck constant (erg·s)
pub const H: f64 = 6.626_070_15e-27;

/// Boltzmann constant (erg/K)
pub const K_B: f64 = 1.380_649e-16;

/// Speed of light (cm/s)
pub const C: f64 = 2.997_924_58e10;

/// Stefan–Boltzmann constant (erg/(cm²·s·K⁴))
pub const SIGMA_SB: f64 = 5.670_374_419e-5;

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Σ_{j≥1} 1/j⁴ = π⁴/90, the normalization of the Planck series
pub const ZETA_4: f64 = PI * PI * PI * PI / 90.0;
