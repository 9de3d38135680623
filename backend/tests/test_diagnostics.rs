//! Distribution Tests - Reference Scenario
//!
//! A batch from seed=1, R=1e15 cm, T=10000 K, N=40000 must show flux-weighted
//! directions (ρ(μ) = 2μ) and, after luminosity reweighting, a spectrum that
//! follows L_ν = 4πR² πB_ν(T).

use packet_source_core_rs::constants::{H, K_B};
use packet_source_core_rs::diagnostics::{
    blackbody_luminosity, histogram, ks_critical_value, ks_statistic, packet_luminosities,
    simulation_time, BatchSummary, SpectrumBins, SpectrumHistogram,
};
use packet_source_core_rs::sampling::direction_cdf;
use packet_source_core_rs::source::{BlackBodySource, PacketSource};
use packet_source_core_rs::{PacketBatch, PacketSourceError};

const TEMPERATURE: f64 = 10_000.0;
const RADIUS: f64 = 1e15;
const N_PACKETS: usize = 40_000;

fn reference_batch() -> PacketBatch {
    BlackBodySource::new(1)
        .unwrap()
        .create_packets(TEMPERATURE, N_PACKETS, RADIUS)
        .unwrap()
}

// ============================================================================
// Directions
// ============================================================================

#[test]
fn test_mu_passes_ks() {
    let batch = reference_batch();
    let d = ks_statistic(batch.mus(), direction_cdf);
    let critical = ks_critical_value(batch.len(), 0.001);
    assert!(d < critical, "D = {:.5}, critical = {:.5}", d, critical);
}

#[test]
fn test_mu_histogram_follows_linear_density() {
    let batch = reference_batch();
    let bins = 10;
    let counts = histogram(batch.mus(), 0.0, 1.0, bins);
    assert_eq!(counts.iter().sum::<usize>(), N_PACKETS);

    for (i, &count) in counts.iter().enumerate() {
        let (lo, hi) = (i as f64 / bins as f64, (i + 1) as f64 / bins as f64);
        let expected = N_PACKETS as f64 * (hi * hi - lo * lo);
        // Smallest bin expects 400 packets (σ = 20)
        assert!(
            (count as f64 - expected).abs() < 5.0 * expected.sqrt(),
            "bin {}: {} vs {:.0}",
            i,
            count,
            expected
        );
    }
}

#[test]
fn test_uniform_mu_fails_ks() {
    // Isotropic μ would be the classic mistake; the test must see it
    let uniform: Vec<f64> = (0..N_PACKETS)
        .map(|i| (i as f64 + 0.5) / N_PACKETS as f64)
        .collect();
    let d = ks_statistic(&uniform, direction_cdf);
    assert!(d > 0.2, "D = {}", d);
    assert!(d > ks_critical_value(N_PACKETS, 0.05));
}

// ============================================================================
// Spectrum
// ============================================================================

#[test]
fn test_spectrum_matches_planck() {
    let batch = reference_batch();
    let bins = SpectrumBins::for_temperature(TEMPERATURE, 50);
    let spectrum = SpectrumHistogram::from_batch(&batch, TEMPERATURE, RADIUS, &bins).unwrap();

    // Almost all packets land inside 0 ≤ x < 15
    let binned: usize = spectrum.counts().iter().sum();
    assert!(binned as f64 > 0.999 * N_PACKETS as f64);

    // Bins with ≥ 400 packets have ≤ 5% Poisson noise
    let deviation = spectrum
        .max_relative_deviation(400)
        .expect("populated bins exist");
    assert!(deviation < 0.25, "max relative deviation {:.3}", deviation);

    // Energy lands where the model puts it
    let width = bins.width();
    let estimated_total: f64 = spectrum.values().iter().map(|v| v * width).sum();
    let luminosity = blackbody_luminosity(RADIUS, TEMPERATURE);
    assert!((estimated_total / luminosity - 1.0).abs() < 1e-3);
}

#[test]
fn test_mean_frequency() {
    let batch = reference_batch();
    let mean = batch.frequencies().iter().sum::<f64>() / N_PACKETS as f64;
    let expected = 3.8322 * K_B * TEMPERATURE / H;
    // σ of the mean is ≈ 0.3%
    assert!((mean / expected - 1.0).abs() < 0.02, "mean ν = {:e}", mean);
}

#[test]
fn test_spectrum_bins_validation() {
    let batch = reference_batch();
    let bad = [
        SpectrumBins {
            nu_min: 0.0,
            nu_max: 1e15,
            bins: 0,
        },
        SpectrumBins {
            nu_min: 2e15,
            nu_max: 1e15,
            bins: 10,
        },
        SpectrumBins {
            nu_min: -1.0,
            nu_max: 1e15,
            bins: 10,
        },
    ];
    for bins in bad {
        assert!(matches!(
            SpectrumHistogram::from_batch(&batch, TEMPERATURE, RADIUS, &bins),
            Err(PacketSourceError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn test_spectrum_geometry() {
    let batch = reference_batch();
    let bins = SpectrumBins {
        nu_min: 1e14,
        nu_max: 2e15,
        bins: 19,
    };
    let spectrum = SpectrumHistogram::from_batch(&batch, TEMPERATURE, RADIUS, &bins).unwrap();
    let edges = spectrum.edges();
    let centers = spectrum.centers();
    assert_eq!(edges.len(), 20);
    assert_eq!(centers.len(), 19);
    assert_eq!(spectrum.model().len(), 19);
    assert!((edges[0] - 1e14).abs() < 1.0);
    assert!((edges[19] / 2e15 - 1.0).abs() < 1e-12);
    assert!((centers[0] - 1.5e14).abs() / 1.5e14 < 1e-12);
}

// ============================================================================
// Luminosity Normalization
// ============================================================================

#[test]
fn test_packet_luminosities_sum_to_photosphere() {
    let batch = reference_batch();
    let luminosity = blackbody_luminosity(RADIUS, TEMPERATURE);
    let dt = simulation_time(batch.total_energy(), luminosity).unwrap();
    assert!((dt * luminosity - 1.0).abs() < 1e-9);

    let lums = packet_luminosities(&batch, dt).unwrap();
    assert_eq!(lums.len(), N_PACKETS);
    let total: f64 = lums.iter().sum();
    assert!((total / luminosity - 1.0).abs() < 1e-9);
    assert!(lums.iter().all(|&l| l == lums[0]));
}

#[test]
fn test_normalization_errors() {
    let batch = reference_batch();
    assert!(simulation_time(1.0, 0.0).is_err());
    assert!(simulation_time(1.0, f64::NAN).is_err());
    assert!(simulation_time(-1.0, 1.0).is_err());
    assert!(packet_luminosities(&batch, 0.0).is_err());
}

#[test]
fn test_batch_summary() {
    let batch = reference_batch();
    let summary = BatchSummary::from_batch(&batch, TEMPERATURE, RADIUS).unwrap();

    assert_eq!(summary.n_packets, N_PACKETS);
    assert_eq!(summary.luminosity, blackbody_luminosity(RADIUS, TEMPERATURE));
    assert!((summary.total_energy - 1.0).abs() < 1e-9);
    assert!((summary.time_span * summary.luminosity - 1.0).abs() < 1e-9);
    // E[μ] = 2/3, σ of the mean ≈ 0.0012
    assert!((summary.mean_mu - 2.0 / 3.0).abs() < 0.01);
    assert!(summary.mu_ks_statistic < ks_critical_value(N_PACKETS, 0.001));

    let json = serde_json::to_string(&summary).unwrap();
    let parsed: BatchSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, summary);
}
