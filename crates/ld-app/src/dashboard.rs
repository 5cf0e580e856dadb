//! Dashboard session: the loaded runs, the selected period, and the
//! view models derived from them.

use ld_core::{StationCatalog, StationId, format_fixed};
use ld_results::{Metric, Run, RunRepository, RunSource, RunStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{
    DowntimeBand, OccupancyColoring, OccupancyVariation, WindowAggregate, aggregate,
    aggregate_window, downtime_bands, occupancy_coloring, occupancy_variation, sum_metric,
};
use crate::client::{SimulationClient, SimulationOutcome};
use crate::config::DashboardConfig;
use crate::error::{AppError, AppResult};
use crate::insights::{
    BottleneckInsight, FlowNode, bottleneck_flow, bottleneck_insight, failure_contribution,
    rank_by_downtime, station_downtimes, top_bottleneck,
};
use crate::period::{Period, PeriodKind, Window};
use crate::query::{
    ProductionPoint, RepairTime, RunSeries, extract_series, production_series,
    repair_time_by_station,
};
use crate::scenario::{ProposalRange, ScenarioComparison, project};

#[derive(Debug, Clone)]
pub struct Dashboard {
    repository: RunRepository,
    period: Period,
    catalog: StationCatalog,
}

/// Everything the charts and panels need for the current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub range_text: String,
    pub source: String,
    pub aggregate: WindowAggregate,
    pub occupancy: OccupancyVariation,
    pub occupancy_coloring: OccupancyColoring,
    /// Same order as `aggregate.stations`.
    pub downtime_bands: Vec<DowntimeBand>,
    pub flow: Vec<FlowNode>,
    /// None when the window holds no runs.
    pub insight: Option<BottleneckInsight>,
    pub repair_times: Vec<RepairTime>,
    pub production: Vec<ProductionPoint>,
    pub time_series: Vec<RunSeries>,
}

impl DashboardView {
    pub fn has_data(&self) -> bool {
        self.aggregate.run_count > 0
    }
}

/// The station the optimization panel opens on, with its slider bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationTarget {
    pub station: StationId,
    pub name: String,
    pub downtime: f64,
    pub failure_rate: f64,
    pub range: ProposalRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub station: StationId,
    pub name: String,
    pub current_rate: f64,
    pub new_rate: f64,
    /// Percent of faulty products attributed to the station, before and after.
    pub contribution_before: f64,
    pub contribution_after: f64,
    pub comparison: ScenarioComparison,
}

impl OptimizationResult {
    /// e.g. "Station 4 Optimization (Memory): 15% → 5%"
    pub fn title(&self) -> String {
        format!(
            "Station {} Optimization ({}): {}% → {}%",
            self.station.number(),
            self.name,
            format_fixed(self.current_rate * 100.0, 0),
            format_fixed(self.new_rate * 100.0, 0)
        )
    }
}

impl Dashboard {
    pub fn new(period: Period, catalog: StationCatalog) -> Self {
        Self {
            repository: RunRepository::default(),
            period,
            catalog,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> AppResult<Self> {
        Ok(Self::new(config.initial_period()?, config.catalog()?))
    }

    pub fn replace_runs(&mut self, runs: Vec<Run>, source: RunSource) {
        self.repository.replace(runs, source);
    }

    /// Load every run file under a results directory.
    pub fn load_from_store(&mut self, store: &RunStore) -> AppResult<usize> {
        let runs = store.load_runs()?;
        let count = runs.len();
        self.replace_runs(runs, RunSource::ResultsDir);
        Ok(count)
    }

    /// Refetch from the service. Falls back to synthetic runs on failure.
    pub async fn reload(&mut self, client: &SimulationClient) -> RunSource {
        let loaded = client.load_runs().await;
        if let Some(reason) = &loaded.fallback_reason {
            warn!(reason = %reason, "dashboard is showing synthetic data");
        }
        self.replace_runs(loaded.runs, loaded.source);
        loaded.source
    }

    /// Trigger a simulation batch, then reload. Runs are left untouched
    /// when the simulation fails.
    pub async fn run_simulation_and_reload(
        &mut self,
        client: &SimulationClient,
    ) -> AppResult<SimulationOutcome> {
        let outcome = client.run_simulation().await?;
        let source = self.reload(client).await;
        info!(%source, runs = self.repository.len(), "dashboard reloaded after simulation");
        Ok(outcome)
    }

    pub fn runs(&self) -> &[Run] {
        self.repository.runs()
    }

    pub fn source(&self) -> RunSource {
        self.repository.source()
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn set_period_kind(&mut self, kind: PeriodKind) -> AppResult<()> {
        self.period.set_kind(kind)
    }

    pub fn set_window_start(&mut self, start: i64) {
        self.period.set_window_start(start);
    }

    pub fn step_back(&mut self) {
        self.period.step_back();
    }

    pub fn step_forward(&mut self) {
        self.period.step_forward();
    }

    pub fn select_day(&mut self, day: u32) {
        self.period.select_day(day);
    }

    pub fn window(&self) -> Window {
        self.period.window()
    }

    pub fn window_runs(&self) -> Vec<&Run> {
        aggregate(self.runs(), self.window())
    }

    pub fn aggregate(&self) -> WindowAggregate {
        aggregate_window(self.runs(), self.window(), &self.catalog)
    }

    pub fn view(&self) -> DashboardView {
        let window = self.window();
        let aggregate = self.aggregate();

        let occupancy: Vec<f64> = aggregate.stations.iter().map(|s| s.occupancy_rate).collect();
        let downtime: Vec<f64> = aggregate.stations.iter().map(|s| s.downtime).collect();

        let insight = if aggregate.run_count > 0 {
            bottleneck_insight(&aggregate.stations, &self.catalog)
        } else {
            None
        };

        DashboardView {
            range_text: self.period.describe(),
            source: self.source().to_string(),
            occupancy: occupancy_variation(&occupancy),
            occupancy_coloring: occupancy_coloring(&occupancy),
            downtime_bands: downtime_bands(&downtime),
            flow: bottleneck_flow(&aggregate.stations, &self.catalog),
            insight,
            repair_times: repair_time_by_station(&aggregate.stations, &self.catalog),
            production: production_series(self.runs(), window),
            time_series: Metric::time()
                .into_iter()
                .map(|m| extract_series(self.runs(), window, m))
                .collect(),
            aggregate,
        }
    }

    pub fn series(&self, metric: Metric) -> RunSeries {
        extract_series(self.runs(), self.window(), metric)
    }

    /// The worst station of the window and its proposal range.
    pub fn optimization_target(&self) -> AppResult<OptimizationTarget> {
        let aggregate = self.aggregate();
        if aggregate.run_count == 0 {
            return Err(AppError::EmptyWindow);
        }
        let ranked = rank_by_downtime(station_downtimes(&aggregate.stations, &self.catalog));
        let top = top_bottleneck(&ranked).ok_or(AppError::EmptyWindow)?;

        Ok(OptimizationTarget {
            station: top.station,
            name: top.name.clone(),
            downtime: top.downtime,
            failure_rate: top.failure_rate,
            range: ProposalRange::for_rate(top.failure_rate),
        })
    }

    /// Project the window's summed production if `station` ran at `new_rate`.
    pub fn optimize(&self, station: StationId, new_rate: f64) -> AppResult<OptimizationResult> {
        let spec = self.catalog.spec(station)?;

        let runs = self.window_runs();
        if runs.is_empty() {
            return Err(AppError::EmptyWindow);
        }
        let observed_total = sum_metric(&runs, Metric::TotalProduction);
        let observed_faulty = sum_metric(&runs, Metric::FaultyProducts);

        let rates = self.catalog.failure_rates();
        let comparison = project(
            spec.failure_rate,
            new_rate,
            observed_total,
            observed_faulty,
            &rates,
        )?;

        let proposed = self.catalog.with_failure_rate(station, new_rate)?;

        Ok(OptimizationResult {
            station,
            name: spec.name.clone(),
            current_rate: spec.failure_rate,
            new_rate,
            contribution_before: failure_contribution(spec.failure_rate, &rates),
            contribution_after: failure_contribution(new_rate, &proposed.failure_rates()),
            comparison,
        })
    }
}
