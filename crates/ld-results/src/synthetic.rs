//! Synthetic run generator used when the results service is unreachable.
//!
//! Output has a fixed shape (run ids 1..=count, every known metric present)
//! with random values inside fixed per-metric ranges.

use ld_core::StationId;
use rand::Rng;

use crate::{MAX_RUN, Metric, Metrics, Run};

/// Per-station (base, spread) for downtime, station 1 first.
const DOWNTIME_RANGES: [(f64, f64); 6] = [
    (1.0, 2.0),
    (0.5, 1.5),
    (4.0, 3.0),
    (12.0, 5.0),
    (6.0, 3.0),
    (4.0, 2.0),
];

/// `base + U[0, spread)`
fn uniform<R: Rng>(rng: &mut R, base: f64, spread: f64) -> f64 {
    base + rng.gen_range(0.0..spread)
}

/// Generate `count` runs numbered from 1.
pub fn generate_runs<R: Rng>(rng: &mut R, count: u32) -> Vec<Run> {
    (1..=count).map(|id| Run::new(id, generate_metrics(rng))).collect()
}

/// Fallback data set: `MAX_RUN` runs from the thread-local generator.
pub fn generate_test_runs() -> Vec<Run> {
    generate_runs(&mut rand::thread_rng(), MAX_RUN)
}

fn generate_metrics<R: Rng>(rng: &mut R) -> Metrics {
    let mut metrics = Metrics::new();

    metrics.set(
        Metric::TotalProduction,
        f64::from(160 + rng.gen_range(0..20_u32)),
    );
    metrics.set(
        Metric::FaultyProducts,
        f64::from(5 + rng.gen_range(0..8_u32)),
    );
    metrics.set(Metric::FaultyRate, uniform(rng, 0.03, 0.04));

    for (i, (base, spread)) in DOWNTIME_RANGES.iter().enumerate() {
        let id = StationId::from_index(i);
        metrics.set(Metric::StationOccupancy(id), uniform(rng, 0.13, 0.02));
        metrics.set(Metric::StationWaitTime(id), uniform(rng, 0.0, 0.5));
        metrics.set(Metric::StationDowntime(id), uniform(rng, *base, *spread));
    }

    metrics.set(Metric::ProductionTime, uniform(rng, 23.0, 3.0));
    metrics.set(Metric::FixingTime, uniform(rng, 2.5, 1.0));
    metrics.set(Metric::SupplierOccupancy, uniform(rng, 0.01, 0.005));

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn in_range(v: f64, lo: f64, hi: f64) -> bool {
        v >= lo && v <= hi
    }

    #[test]
    fn shape_is_fixed() {
        let runs = generate_test_runs();
        assert_eq!(runs.len(), MAX_RUN as usize);
        for (i, run) in runs.iter().enumerate() {
            assert_eq!(run.run as usize, i + 1);
            // 6 global metrics + 3 per station
            assert_eq!(run.metrics.len(), 6 + 3 * 6);
        }
    }

    #[test]
    fn values_stay_in_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for run in generate_runs(&mut rng, 200) {
            let total = run.metric(Metric::TotalProduction);
            assert!(in_range(total, 160.0, 180.0));
            assert_eq!(total.fract(), 0.0);
            let faulty = run.metric(Metric::FaultyProducts);
            assert!(in_range(faulty, 5.0, 13.0));
            assert_eq!(faulty.fract(), 0.0);
            assert!(in_range(run.metric(Metric::FaultyRate), 0.03, 0.07));
            assert!(in_range(run.metric(Metric::ProductionTime), 23.0, 26.0));
            assert!(in_range(run.metric(Metric::FixingTime), 2.5, 3.5));
            assert!(in_range(run.metric(Metric::SupplierOccupancy), 0.01, 0.015));

            for (i, (base, spread)) in DOWNTIME_RANGES.iter().enumerate() {
                let id = StationId::from_index(i);
                assert!(in_range(run.metric(Metric::StationOccupancy(id)), 0.13, 0.15));
                assert!(in_range(run.metric(Metric::StationWaitTime(id)), 0.0, 0.5));
                assert!(in_range(
                    run.metric(Metric::StationDowntime(id)),
                    *base,
                    base + spread
                ));
            }
        }
    }

    #[test]
    fn seeded_generation_is_repeatable() {
        let a = generate_runs(&mut StdRng::seed_from_u64(42), 10);
        let b = generate_runs(&mut StdRng::seed_from_u64(42), 10);
        assert_eq!(a, b);
    }
}
