//! Packet Source Tests
//!
//! Batch contract (four aligned sequences, energy 1/N, radius R, μ ∈ [0,1],
//! finite positive frequencies), determinism, validation and partitioned
//! generation.

use packet_source_core_rs::sampling::PlanckConfig;
use packet_source_core_rs::source::{
    generate, generate_partitioned, BlackBodySource, PacketSource, PartitionPlan, SourceConfig,
};
use packet_source_core_rs::{PacketBatch, PacketSourceError, RngManager};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn assert_batch_contract(batch: &PacketBatch, n: usize, radius: f64) {
    assert_eq!(batch.len(), n);
    assert_eq!(batch.radii().len(), n);
    assert_eq!(batch.frequencies().len(), n);
    assert_eq!(batch.mus().len(), n);
    assert_eq!(batch.energies().len(), n);

    let energy = 1.0 / n as f64;
    assert!(batch.radii().iter().all(|&r| r == radius));
    assert!(batch.energies().iter().all(|&e| e == energy));
    assert!(batch.mus().iter().all(|&mu| (0.0..=1.0).contains(&mu)));
    assert!(batch
        .frequencies()
        .iter()
        .all(|&nu| nu.is_finite() && nu > 0.0));
    assert!(batch.has_unit_energy());
}

// ============================================================================
// Batch Contract
// ============================================================================

#[test]
fn test_reference_scenario() {
    // seed=1, R=1e15 cm, T=10000 K, N=40000
    let mut source = BlackBodySource::new(1).unwrap();
    let batch = source.create_packets(10_000.0, 40_000, 1e15).unwrap();

    assert_batch_contract(&batch, 40_000, 1e15);
    assert!(batch.energies().iter().all(|&e| e == 1.0 / 40_000.0));
}

#[test]
fn test_single_packet() {
    let mut source = BlackBodySource::new(1).unwrap();
    let batch = source.create_packets(5_772.0, 1, 6.957e10).unwrap();

    assert_batch_contract(&batch, 1, 6.957e10);
    let packet = batch.packet(0).unwrap();
    assert_eq!(packet.energy, 1.0);
    assert!(batch.packet(1).is_none());
}

#[test]
fn test_iter_matches_columns() {
    let mut source = BlackBodySource::new(4).unwrap();
    let batch = source.create_packets(8_000.0, 50, 1e14).unwrap();
    for (i, packet) in batch.iter().enumerate() {
        assert_eq!(packet.radius, batch.radii()[i]);
        assert_eq!(packet.frequency, batch.frequencies()[i]);
        assert_eq!(packet.mu, batch.mus()[i]);
        assert_eq!(packet.energy, batch.energies()[i]);
    }
}

#[test]
fn test_extreme_temperatures_finite_or_error() {
    let mut source = BlackBodySource::new(2).unwrap();
    for t in [1e-300, 1e-290, 1e-3, 1e9, 1e250, 1e300, f64::MAX] {
        match source.create_packets(t, 200, 1.0) {
            Ok(batch) => assert_batch_contract(&batch, 200, 1.0),
            Err(PacketSourceError::NumericalTruncationRisk(_)) => {}
            Err(other) => panic!("T = {:e}: unexpected error {:?}", t, other),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_parameters_rejected() {
    let mut source = BlackBodySource::new(1).unwrap();

    let cases = [
        (0.0, 10, 1e15, "temperature"),
        (-1.0, 10, 1e15, "temperature"),
        (f64::NAN, 10, 1e15, "temperature"),
        (10_000.0, 0, 1e15, "n_packets"),
        (10_000.0, 10, 0.0, "radius"),
        (10_000.0, 10, -1e15, "radius"),
        (10_000.0, 10, f64::INFINITY, "radius"),
    ];
    for (t, n, r, expected) in cases {
        match source.create_packets(t, n, r) {
            Err(PacketSourceError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
            other => panic!("({}, {}, {}) gave {:?}", t, n, r, other),
        }
    }
}

#[test]
fn test_failed_call_leaves_stream_untouched() {
    let mut source = BlackBodySource::new(21).unwrap();
    let state = source.rng().get_state();
    assert!(source.create_packets(10_000.0, 0, 1e15).is_err());
    assert!(source.create_packets(1e300, 10, 1e15).is_err());
    assert_eq!(source.rng().get_state(), state);

    let after = source.create_packets(10_000.0, 10, 1e15).unwrap();
    let fresh = BlackBodySource::new(21)
        .unwrap()
        .create_packets(10_000.0, 10, 1e15)
        .unwrap();
    assert_eq!(after, fresh);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_seed_bit_identical() {
    let a = BlackBodySource::new(42)
        .unwrap()
        .create_packets(10_000.0, 1_000, 1e15)
        .unwrap();
    let b = BlackBodySource::new(42)
        .unwrap()
        .create_packets(10_000.0, 1_000, 1e15)
        .unwrap();

    for (x, y) in a.frequencies().iter().zip(b.frequencies()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
    for (x, y) in a.mus().iter().zip(b.mus()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn test_different_seed_differs() {
    let a = BlackBodySource::new(1)
        .unwrap()
        .create_packets(10_000.0, 100, 1e15)
        .unwrap();
    let b = BlackBodySource::new(2)
        .unwrap()
        .create_packets(10_000.0, 100, 1e15)
        .unwrap();
    assert_ne!(a.frequencies(), b.frequencies());
}

#[test]
fn test_free_function_matches_source() {
    let mut rng = RngManager::new(17);
    let direct = generate(7_500.0, 300, 3e13, &mut rng, &PlanckConfig::default()).unwrap();
    let via_source = BlackBodySource::new(17)
        .unwrap()
        .create_packets(7_500.0, 300, 3e13)
        .unwrap();
    assert_eq!(direct, via_source);
}

#[test]
fn test_source_as_trait_object() {
    let mut sources: Vec<Box<dyn PacketSource>> = vec![
        Box::new(BlackBodySource::new(1).unwrap()),
        Box::new(BlackBodySource::new(2).unwrap()),
    ];
    for source in sources.iter_mut() {
        let batch = source.create_packets(10_000.0, 25, 1e15).unwrap();
        assert_batch_contract(&batch, 25, 1e15);
    }
}

// ============================================================================
// Partitioned Generation
// ============================================================================

#[test]
fn test_partitioned_independent_of_threads() {
    let config = SourceConfig::with_seed(1);
    let reference = generate_partitioned(
        10_000.0,
        12_345,
        1e15,
        &config,
        &PartitionPlan {
            chunk_size: 1_000,
            threads: 1,
        },
    )
    .unwrap();
    assert_batch_contract(&reference, 12_345, 1e15);

    for threads in [2, 3, 8, 64] {
        let batch = generate_partitioned(
            10_000.0,
            12_345,
            1e15,
            &config,
            &PartitionPlan {
                chunk_size: 1_000,
                threads,
            },
        )
        .unwrap();
        assert_eq!(batch, reference, "threads = {}", threads);
    }
}

#[test]
fn test_partitioned_rejects_like_serial() {
    let config = SourceConfig::default();
    let plan = PartitionPlan::default();
    assert!(matches!(
        generate_partitioned(10_000.0, 0, 1e15, &config, &plan),
        Err(PacketSourceError::InvalidParameter { .. })
    ));
    assert!(matches!(
        generate_partitioned(1e300, 10, 1e15, &config, &plan),
        Err(PacketSourceError::NumericalTruncationRisk(_))
    ));
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_batch_contract_holds(
        seed in any::<u64>(),
        log_t in -2.0f64..8.0,
        n in 1usize..400,
        log_r in 5.0f64..20.0,
    ) {
        let temperature = 10f64.powf(log_t);
        let radius = 10f64.powf(log_r);
        let batch = BlackBodySource::new(seed)
            .unwrap()
            .create_packets(temperature, n, radius)
            .unwrap();

        prop_assert_eq!(batch.len(), n);
        prop_assert!(batch.radii().iter().all(|&r| r == radius));
        prop_assert!(batch.mus().iter().all(|&mu| (0.0..=1.0).contains(&mu)));
        prop_assert!(batch.frequencies().iter().all(|&nu| nu.is_finite() && nu > 0.0));
        prop_assert!(batch.has_unit_energy());
    }

    #[test]
    fn prop_partitioned_chunking_preserves_contract(
        seed in any::<u64>(),
        n in 1usize..300,
        chunk_size in 1usize..64,
        threads in 1usize..6,
    ) {
        let config = SourceConfig::with_seed(seed);
        let plan = PartitionPlan { chunk_size, threads };
        let batch = generate_partitioned(6_000.0, n, 1e12, &config, &plan).unwrap();
        let serial = generate_partitioned(
            6_000.0,
            n,
            1e12,
            &config,
            &PartitionPlan { chunk_size, threads: 1 },
        )
        .unwrap();

        prop_assert_eq!(batch.len(), n);
        prop_assert!(batch.has_unit_energy());
        prop_assert_eq!(batch, serial);
    }
}
