//! Shared application service layer for the production-line dashboard.
//!
//! Front ends go through this crate for period navigation, window
//! aggregation, bottleneck insights, what-if projections, and the
//! simulation service client.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod period;
pub mod query;
pub mod scenario;

// Re-export key types for convenience
pub use aggregate::{
    DowntimeBand, OccupancyBand, OccupancyColoring, OccupancyVariation, ProductionAverages,
    StationAverages, TimeAverages, WindowAggregate, aggregate, aggregate_window, average,
    average_metric, downtime_bands, occupancy_coloring, occupancy_variation, sum_metric,
};
pub use client::{LoadedRuns, SimulationClient, SimulationOutcome};
pub use config::{DashboardConfig, load_config, parse_config};
pub use dashboard::{Dashboard, DashboardView, OptimizationResult, OptimizationTarget};
pub use error::{AppError, AppResult};
pub use insights::{
    BottleneckInsight, Criticality, FlowNode, InsightLine, StationDowntime, bottleneck_flow,
    bottleneck_insight, failure_contribution, rank_by_downtime, secondary_bottleneck,
    station_downtimes, top_bottleneck,
};
pub use period::{Period, PeriodKind, Window, clamp_window_start, period_length, window_bounds};
pub use query::{
    ProductionPoint, RepairTime, RunSeries, SeriesPoint, extract_series, parse_metric,
    production_series, repair_time_by_station, series_to_csv,
};
pub use scenario::{ProposalRange, ScenarioComparison, ScenarioError, ScenarioOutcome, project};
