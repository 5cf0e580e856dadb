//! Window filtering and per-metric averages.
//!
//! Averages are plain arithmetic means of the stored per-run values. In
//! particular the faulty rate is the mean of per-run rates, not
//! `sum(faulty) / sum(total)`; the two differ whenever run sizes differ.

use std::borrow::Borrow;

use ld_core::{StationCatalog, StationId, mean, min_max};
use ld_results::{Metric, Run};
use serde::Serialize;

use crate::period::Window;

/// Runs with `window.start <= run <= window.end`, in input order.
pub fn aggregate(runs: &[Run], window: Window) -> Vec<&Run> {
    runs.iter().filter(|r| window.contains(r.run)).collect()
}

/// Mean of `metrics[name]` (missing = 0) over `runs`; zero for no runs.
pub fn average<R: Borrow<Run>>(runs: &[R], name: &str) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    let total: f64 = runs
        .iter()
        .map(|r| r.borrow().metrics.get_or_default(name))
        .sum();
    total / runs.len() as f64
}

pub fn average_metric<R: Borrow<Run>>(runs: &[R], metric: Metric) -> f64 {
    average(runs, &metric.name())
}

/// Sum of `metrics[name]` (missing = 0) over `runs`.
pub fn sum_metric<R: Borrow<Run>>(runs: &[R], metric: Metric) -> f64 {
    let name = metric.name();
    runs.iter()
        .map(|r| r.borrow().metrics.get_or_default(&name))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProductionAverages {
    pub total_production: f64,
    pub faulty_products: f64,
    pub faulty_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationAverages {
    pub station: StationId,
    pub occupancy_rate: f64,
    pub wait_time: f64,
    pub downtime: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TimeAverages {
    pub production_time: f64,
    pub fixing_time: f64,
    pub supplier_occupancy: f64,
}

/// Everything the dashboard shows for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAggregate {
    pub window: Window,
    pub run_count: usize,
    pub production: ProductionAverages,
    pub stations: Vec<StationAverages>,
    pub time: TimeAverages,
}

pub fn production_averages<R: Borrow<Run>>(runs: &[R]) -> ProductionAverages {
    ProductionAverages {
        total_production: average_metric(runs, Metric::TotalProduction),
        faulty_products: average_metric(runs, Metric::FaultyProducts),
        faulty_rate: average_metric(runs, Metric::FaultyRate),
    }
}

pub fn station_averages<R: Borrow<Run>>(
    runs: &[R],
    catalog: &StationCatalog,
) -> Vec<StationAverages> {
    catalog
        .ids()
        .map(|station| StationAverages {
            station,
            occupancy_rate: average_metric(runs, Metric::StationOccupancy(station)),
            wait_time: average_metric(runs, Metric::StationWaitTime(station)),
            downtime: average_metric(runs, Metric::StationDowntime(station)),
        })
        .collect()
}

pub fn time_averages<R: Borrow<Run>>(runs: &[R]) -> TimeAverages {
    TimeAverages {
        production_time: average_metric(runs, Metric::ProductionTime),
        fixing_time: average_metric(runs, Metric::FixingTime),
        supplier_occupancy: average_metric(runs, Metric::SupplierOccupancy),
    }
}

pub fn aggregate_window(runs: &[Run], window: Window, catalog: &StationCatalog) -> WindowAggregate {
    let in_window = aggregate(runs, window);
    WindowAggregate {
        window,
        run_count: in_window.len(),
        production: production_averages(&in_window),
        stations: station_averages(&in_window, catalog),
        time: time_averages(&in_window),
    }
}

/// Spread of per-station occupancy averages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OccupancyVariation {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variation: f64,
    /// `variation > mean * 0.1`
    pub significant: bool,
}

pub fn occupancy_variation(values: &[f64]) -> OccupancyVariation {
    let Some((min, max)) = min_max(values) else {
        return OccupancyVariation::default();
    };
    let mean = mean(values);
    let variation = max - min;
    OccupancyVariation {
        min,
        max,
        mean,
        variation,
        significant: variation > mean * 0.1,
    }
}

/// Color used for every occupancy bar when stations do not differ much.
pub const UNIFORM_OCCUPANCY_COLOR: &str = "#007bff";

/// Relative occupancy bucket; high occupancy is good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OccupancyBand {
    Excellent,
    Good,
    Fair,
    Low,
    Critical,
}

impl OccupancyBand {
    /// Bucket for `(value - min) / (max - min)`, checked highest first.
    pub fn classify(ratio: f64) -> Self {
        if ratio > 0.8 {
            OccupancyBand::Excellent
        } else if ratio > 0.6 {
            OccupancyBand::Good
        } else if ratio > 0.4 {
            OccupancyBand::Fair
        } else if ratio > 0.2 {
            OccupancyBand::Low
        } else {
            OccupancyBand::Critical
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            OccupancyBand::Excellent => "#007bff",
            OccupancyBand::Good => "#17a2b8",
            OccupancyBand::Fair => "#ffc107",
            OccupancyBand::Low => "#fd7e14",
            OccupancyBand::Critical => "#dc3545",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OccupancyBand::Excellent => "Excellent",
            OccupancyBand::Good => "Good",
            OccupancyBand::Fair => "Fair",
            OccupancyBand::Low => "Low",
            OccupancyBand::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OccupancyColoring {
    /// One color for all stations, no legend.
    Uniform,
    /// One band per input value, same order.
    Banded(Vec<OccupancyBand>),
}

pub fn occupancy_coloring(values: &[f64]) -> OccupancyColoring {
    let spread = occupancy_variation(values);
    if !spread.significant {
        return OccupancyColoring::Uniform;
    }
    OccupancyColoring::Banded(
        values
            .iter()
            .map(|v| OccupancyBand::classify((v - spread.min) / spread.variation))
            .collect(),
    )
}

/// Downtime bucket relative to the worst station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DowntimeBand {
    Critical,
    High,
    Medium,
    Low,
    Minimum,
}

impl DowntimeBand {
    /// Bucket for `downtime / max_downtime`, checked highest first.
    pub fn classify(ratio: f64) -> Self {
        if ratio >= 0.8 {
            DowntimeBand::Critical
        } else if ratio >= 0.6 {
            DowntimeBand::High
        } else if ratio >= 0.3 {
            DowntimeBand::Medium
        } else if ratio >= 0.1 {
            DowntimeBand::Low
        } else {
            DowntimeBand::Minimum
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DowntimeBand::Critical => "#dc3545",
            DowntimeBand::High => "#fd7e14",
            DowntimeBand::Medium => "#ffc107",
            DowntimeBand::Low => "#6c757d",
            DowntimeBand::Minimum => "#28a745",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DowntimeBand::Critical => "Critical",
            DowntimeBand::High => "High",
            DowntimeBand::Medium => "Medium",
            DowntimeBand::Low => "Low",
            DowntimeBand::Minimum => "Minimum",
        }
    }
}

/// One band per downtime value. With no downtime anywhere, all are `Minimum`.
pub fn downtime_bands(values: &[f64]) -> Vec<DowntimeBand> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    values
        .iter()
        .map(|v| {
            let ratio = if max > 0.0 { v / max } else { 0.0 };
            DowntimeBand::classify(ratio)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ld_results::Metrics;

    fn run(id: u32, values: &[(Metric, f64)]) -> Run {
        let mut metrics = Metrics::new();
        for (m, v) in values {
            metrics.set(*m, *v);
        }
        Run::new(id, metrics)
    }

    fn window(start: u32, end: u32) -> Window {
        Window { start, end }
    }

    #[test]
    fn average_of_nothing_is_zero() {
        let none: Vec<Run> = Vec::new();
        assert_eq!(average(&none, "Total Production"), 0.0);
        assert_eq!(average(&none, "anything"), 0.0);
        assert_eq!(production_averages(&none), ProductionAverages::default());
    }

    #[test]
    fn missing_keys_average_as_zero() {
        let runs = vec![
            run(1, &[(Metric::TotalProduction, 160.0)]),
            run(2, &[]),
        ];
        assert_eq!(average_metric(&runs, Metric::TotalProduction), 80.0);
    }

    #[test]
    fn filter_is_inclusive_and_ordered() {
        let runs: Vec<Run> = (1..=10).map(|i| run(i, &[])).collect();
        let picked = aggregate(&runs, window(3, 5));
        assert_eq!(picked.iter().map(|r| r.run).collect::<Vec<_>>(), [3, 4, 5]);
        assert!(aggregate(&runs, window(11, 20)).is_empty());
    }

    #[test]
    fn faulty_rate_is_mean_of_rates_not_ratio_of_sums() {
        // Run 1: 10/100, run 2: 10/1000. Mean of rates = 0.055,
        // ratio of sums would be 20/1100 ≈ 0.018.
        let runs = vec![
            run(
                1,
                &[
                    (Metric::TotalProduction, 100.0),
                    (Metric::FaultyProducts, 10.0),
                    (Metric::FaultyRate, 0.1),
                ],
            ),
            run(
                2,
                &[
                    (Metric::TotalProduction, 1000.0),
                    (Metric::FaultyProducts, 10.0),
                    (Metric::FaultyRate, 0.01),
                ],
            ),
        ];
        let production = production_averages(&runs);
        assert!((production.faulty_rate - 0.055).abs() < 1e-12);
        assert_eq!(production.total_production, 550.0);
        assert_eq!(production.faulty_products, 10.0);
    }

    #[test]
    fn window_aggregate_covers_all_categories() {
        let s4 = StationId::new(4).unwrap();
        let runs = vec![
            run(1, &[(Metric::StationDowntime(s4), 10.0), (Metric::FixingTime, 2.0)]),
            run(2, &[(Metric::StationDowntime(s4), 20.0), (Metric::FixingTime, 4.0)]),
            run(3, &[(Metric::StationDowntime(s4), 99.0)]),
        ];
        let agg = aggregate_window(&runs, window(1, 2), &StationCatalog::default());
        assert_eq!(agg.run_count, 2);
        assert_eq!(agg.stations.len(), 6);
        assert_eq!(agg.stations[3].station, s4);
        assert_eq!(agg.stations[3].downtime, 15.0);
        assert_eq!(agg.stations[0].downtime, 0.0);
        assert_eq!(agg.time.fixing_time, 3.0);
    }

    #[test]
    fn variation_significance() {
        let uneven = occupancy_variation(&[0.14, 0.14, 0.14, 0.14, 0.14, 0.30]);
        assert!((uneven.variation - 0.16).abs() < 1e-12);
        assert!(uneven.significant);

        let even = occupancy_variation(&[0.14; 6]);
        assert_eq!(even.variation, 0.0);
        assert!(!even.significant);

        assert!(!occupancy_variation(&[]).significant);
        assert!(!occupancy_variation(&[0.0; 6]).significant);
    }

    #[test]
    fn occupancy_bands_use_strict_thresholds() {
        assert_eq!(OccupancyBand::classify(1.0), OccupancyBand::Excellent);
        assert_eq!(OccupancyBand::classify(0.8), OccupancyBand::Good);
        assert_eq!(OccupancyBand::classify(0.6), OccupancyBand::Fair);
        assert_eq!(OccupancyBand::classify(0.4), OccupancyBand::Low);
        assert_eq!(OccupancyBand::classify(0.2), OccupancyBand::Critical);
        assert_eq!(OccupancyBand::classify(0.0), OccupancyBand::Critical);
    }

    #[test]
    fn occupancy_coloring_falls_back_to_uniform() {
        assert_eq!(occupancy_coloring(&[0.14; 6]), OccupancyColoring::Uniform);
        assert_eq!(
            occupancy_coloring(&[0.10, 0.20, 0.15]),
            OccupancyColoring::Banded(vec![
                OccupancyBand::Critical,
                OccupancyBand::Excellent,
                OccupancyBand::Fair,
            ])
        );
    }

    #[test]
    fn downtime_bands_use_inclusive_thresholds() {
        assert_eq!(DowntimeBand::classify(0.8), DowntimeBand::Critical);
        assert_eq!(DowntimeBand::classify(0.6), DowntimeBand::High);
        assert_eq!(DowntimeBand::classify(0.3), DowntimeBand::Medium);
        assert_eq!(DowntimeBand::classify(0.1), DowntimeBand::Low);
        assert_eq!(DowntimeBand::classify(0.09), DowntimeBand::Minimum);

        assert_eq!(
            downtime_bands(&[2.0, 1.0, 5.0, 15.0, 7.0, 4.0]),
            vec![
                DowntimeBand::Low,
                DowntimeBand::Minimum,
                DowntimeBand::Medium,
                DowntimeBand::Critical,
                DowntimeBand::Medium,
                DowntimeBand::Low,
            ]
        );
        assert_eq!(downtime_bands(&[0.0, 0.0]), vec![DowntimeBand::Minimum; 2]);
    }
}
