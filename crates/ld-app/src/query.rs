//! Per-run series for the time and production charts.

use ld_core::{StationCatalog, StationId};
use ld_results::{Metric, Run};
use serde::Serialize;

use crate::aggregate::{StationAverages, aggregate};
use crate::error::{AppError, AppResult};
use crate::period::Window;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub run: u32,
    pub value: f64,
}

/// One metric across the runs of a window, with its window mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSeries {
    pub metric: String,
    pub points: Vec<SeriesPoint>,
    pub average: f64,
}

impl RunSeries {
    /// `(min, max)` of the values, for axis scaling.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values: Vec<f64> = self.points.iter().map(|p| p.value).collect();
        ld_core::min_max(&values)
    }
}

/// Look up a metric by its stored name.
pub fn parse_metric(name: &str) -> AppResult<Metric> {
    Metric::parse(name).ok_or_else(|| AppError::InvalidInput(format!("Unknown metric: {}", name)))
}

/// Extract one metric per run inside `window`. Missing values read as zero.
pub fn extract_series(runs: &[Run], window: Window, metric: Metric) -> RunSeries {
    let points: Vec<SeriesPoint> = aggregate(runs, window)
        .into_iter()
        .map(|r| SeriesPoint {
            run: r.run,
            value: r.metric(metric),
        })
        .collect();

    let average = if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64
    };

    RunSeries {
        metric: metric.name().into_owned(),
        points,
        average,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductionPoint {
    pub run: u32,
    pub total_production: f64,
    pub faulty_products: f64,
    pub faulty_rate: f64,
}

pub fn production_series(runs: &[Run], window: Window) -> Vec<ProductionPoint> {
    aggregate(runs, window)
        .into_iter()
        .map(|r| ProductionPoint {
            run: r.run,
            total_production: r.metric(Metric::TotalProduction),
            faulty_products: r.metric(Metric::FaultyProducts),
            faulty_rate: r.metric(Metric::FaultyRate),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairTime {
    pub station: StationId,
    pub name: String,
    pub repair_time: f64,
}

/// Repair time by station: the window's mean station downtime.
pub fn repair_time_by_station(
    averages: &[StationAverages],
    catalog: &StationCatalog,
) -> Vec<RepairTime> {
    averages
        .iter()
        .map(|avg| RepairTime {
            station: avg.station,
            name: catalog
                .name(avg.station)
                .map(str::to_string)
                .unwrap_or_else(|| avg.station.to_string()),
            repair_time: avg.downtime,
        })
        .collect()
}

/// `run,value` CSV with a header line.
pub fn series_to_csv(series: &RunSeries) -> String {
    let mut csv = String::from("run,value\n");
    for point in &series.points {
        csv.push_str(&format!("{},{}\n", point.run, point.value));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use ld_results::Metrics;

    fn runs() -> Vec<Run> {
        (1..=5)
            .map(|i| {
                let mut metrics = Metrics::new();
                metrics.set(Metric::ProductionTime, 20.0 + f64::from(i));
                metrics.set(Metric::TotalProduction, 160.0 + f64::from(i));
                Run::new(i, metrics)
            })
            .collect()
    }

    #[test]
    fn series_follows_window() {
        let series = extract_series(&runs(), Window { start: 2, end: 4 }, Metric::ProductionTime);
        assert_eq!(series.metric, "Production Time");
        assert_eq!(
            series.points.iter().map(|p| p.run).collect::<Vec<_>>(),
            [2, 3, 4]
        );
        assert_eq!(series.average, 23.0);
        assert_eq!(series.value_range(), Some((22.0, 24.0)));
    }

    #[test]
    fn empty_window_has_zero_average() {
        let series = extract_series(&runs(), Window { start: 50, end: 60 }, Metric::FixingTime);
        assert!(series.points.is_empty());
        assert_eq!(series.average, 0.0);
        assert_eq!(series.value_range(), None);
    }

    #[test]
    fn production_points_default_missing_to_zero() {
        let points = production_series(&runs(), Window { start: 1, end: 1 });
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].total_production, 161.0);
        assert_eq!(points[0].faulty_products, 0.0);
    }

    #[test]
    fn csv_export() {
        let series = extract_series(&runs(), Window { start: 1, end: 2 }, Metric::TotalProduction);
        assert_eq!(series_to_csv(&series), "run,value\n1,161\n2,162\n");
    }

    #[test]
    fn unknown_metric_is_input_error() {
        assert!(matches!(parse_metric("Speed"), Err(AppError::InvalidInput(_))));
        assert_eq!(parse_metric("Fixing Time").unwrap(), Metric::FixingTime);
    }
}
