//! Bottleneck ranking and impact statements.
//!
//! Downtime comes from the observed window; failure contribution comes from
//! the station catalog only, so it moves when an operator proposes a new
//! rate and never because of observed data.

use ld_core::{StationCatalog, StationId, format_fixed};
use serde::Serialize;

use crate::aggregate::StationAverages;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDowntime {
    pub station: StationId,
    pub name: String,
    pub downtime: f64,
    pub failure_rate: f64,
}

/// Join window downtime averages with catalog names and rates.
/// Stations missing from the catalog are skipped.
pub fn station_downtimes(
    averages: &[StationAverages],
    catalog: &StationCatalog,
) -> Vec<StationDowntime> {
    averages
        .iter()
        .filter_map(|avg| {
            let spec = catalog.get(avg.station)?;
            Some(StationDowntime {
                station: avg.station,
                name: spec.name.clone(),
                downtime: avg.downtime,
                failure_rate: spec.failure_rate,
            })
        })
        .collect()
}

/// Descending by downtime. Stable: ties keep station order.
pub fn rank_by_downtime(mut stations: Vec<StationDowntime>) -> Vec<StationDowntime> {
    stations.sort_by(|a, b| b.downtime.total_cmp(&a.downtime));
    stations
}

pub fn top_bottleneck(sorted: &[StationDowntime]) -> Option<&StationDowntime> {
    sorted.first()
}

/// Runner-up, if its downtime exceeds half of `max_downtime`.
pub fn secondary_bottleneck(
    sorted: &[StationDowntime],
    max_downtime: f64,
) -> Option<&StationDowntime> {
    sorted.get(1).filter(|s| s.downtime > max_downtime * 0.5)
}

/// Share of all faulty products attributed to a station, in percent.
/// Zero when no station has a failure rate.
pub fn failure_contribution(failure_rate: f64, all_rates: &[f64]) -> f64 {
    let total: f64 = all_rates.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    failure_rate / total * 100.0
}

/// Bottleneck-flow severity relative to the worst station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Criticality {
    Critical,
    High,
    Medium,
    Normal,
}

impl Criticality {
    pub fn classify(ratio: f64) -> Self {
        if ratio >= 0.8 {
            Criticality::Critical
        } else if ratio >= 0.5 {
            Criticality::High
        } else if ratio >= 0.25 {
            Criticality::Medium
        } else {
            Criticality::Normal
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Criticality::Critical => "#dc3545",
            Criticality::High => "#fd7e14",
            Criticality::Medium => "#ffc107",
            Criticality::Normal => "#6c757d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criticality::Critical => "Critical",
            Criticality::High => "High",
            Criticality::Medium => "Medium",
            Criticality::Normal => "Normal",
        }
    }
}

/// One node of the bottleneck flow view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub station: StationId,
    pub name: String,
    pub downtime: f64,
    /// Fraction of the window's summed downtime, 0..=1.
    pub share: f64,
    pub criticality: Criticality,
}

/// Stations ordered worst first, with downtime share and criticality.
pub fn bottleneck_flow(averages: &[StationAverages], catalog: &StationCatalog) -> Vec<FlowNode> {
    let ranked = rank_by_downtime(station_downtimes(averages, catalog));
    let total: f64 = ranked.iter().map(|s| s.downtime).sum();
    let max = ranked.first().map(|s| s.downtime).unwrap_or(0.0);

    ranked
        .into_iter()
        .map(|s| {
            let share = if total > 0.0 { s.downtime / total } else { 0.0 };
            let ratio = if max > 0.0 { s.downtime / max } else { 0.0 };
            FlowNode {
                station: s.station,
                name: s.name,
                downtime: s.downtime,
                share,
                criticality: Criticality::classify(ratio),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightLine {
    pub station: StationId,
    pub name: String,
    pub failure_rate: f64,
    pub downtime: f64,
    /// Percent of faulty products attributed to this station.
    pub contribution_pct: f64,
}

impl InsightLine {
    fn new(station: &StationDowntime, all_rates: &[f64]) -> Self {
        Self {
            station: station.station,
            name: station.name.clone(),
            failure_rate: station.failure_rate,
            downtime: station.downtime,
            contribution_pct: failure_contribution(station.failure_rate, all_rates),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckInsight {
    pub primary: InsightLine,
    pub secondary: Option<InsightLine>,
}

impl BottleneckInsight {
    /// Text for the "Identified Issues" panel.
    pub fn statements(&self) -> Vec<String> {
        let p = &self.primary;
        let mut lines = vec![
            format!(
                "Station {} ({}): This station has the highest failure rate ({}%) and the highest downtime ({} units).",
                p.station.number(),
                p.name,
                format_fixed(p.failure_rate * 100.0, 0),
                format_fixed(p.downtime, 1)
            ),
            format!(
                "Impact: This causes approximately {}% of the total faulty products.",
                format_fixed(p.contribution_pct, 0)
            ),
        ];

        if let Some(s) = &self.secondary {
            lines.push(format!(
                "Station {} ({}): Also shows significant issues with a failure rate of {}% and a downtime of {} units ({}% of defects).",
                s.station.number(),
                s.name,
                format_fixed(s.failure_rate * 100.0, 0),
                format_fixed(s.downtime, 1),
                format_fixed(s.contribution_pct, 0)
            ));
        }

        lines
    }
}

/// Primary and (optional) secondary bottleneck for a window.
pub fn bottleneck_insight(
    averages: &[StationAverages],
    catalog: &StationCatalog,
) -> Option<BottleneckInsight> {
    let ranked = rank_by_downtime(station_downtimes(averages, catalog));
    let all_rates = catalog.failure_rates();

    let top = top_bottleneck(&ranked)?;
    let secondary = secondary_bottleneck(&ranked, top.downtime);

    Some(BottleneckInsight {
        primary: InsightLine::new(top, &all_rates),
        secondary: secondary.map(|s| InsightLine::new(s, &all_rates)),
    })
}
