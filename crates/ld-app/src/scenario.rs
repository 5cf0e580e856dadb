//! Closed-form what-if projection for a station failure-rate change.
//!
//! Faults are attributed to stations in proportion to their failure rate.
//! Scaling the chosen station's rate scales its share of faults linearly,
//! and every avoided faulty unit is credited as half an extra good unit.

use ld_core::ensure_finite;
use serde::Serialize;

/// Extra good units credited per avoided faulty unit.
pub const PRODUCTIVITY_PER_AVOIDED_FAULT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("current failure rate is zero, reduction factor is undefined")]
    ZeroCurrentFailureRate,

    #[error("station failure rates sum to zero")]
    ZeroTotalFailureRate,

    #[error("observed total production is zero")]
    ZeroObservedProduction,

    #[error("projected total production is zero")]
    ZeroProjectedProduction,

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("{what} must not be negative")]
    Negative { what: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub total_production: f64,
    pub faulty_products: f64,
    pub faulty_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub current: ScenarioOutcome,
    pub optimized: ScenarioOutcome,
}

fn check(value: f64, what: &'static str) -> Result<f64, ScenarioError> {
    let value = ensure_finite(value, what).map_err(|_| ScenarioError::NonFinite { what })?;
    if value < 0.0 {
        return Err(ScenarioError::Negative { what });
    }
    Ok(value)
}

/// Project production and faults if one station's failure rate moves from
/// `current_failure_rate` to `new_failure_rate`.
pub fn project(
    current_failure_rate: f64,
    new_failure_rate: f64,
    observed_total_production: f64,
    observed_faulty_products: f64,
    all_station_failure_rates: &[f64],
) -> Result<ScenarioComparison, ScenarioError> {
    let current_rate = check(current_failure_rate, "current failure rate")?;
    let new_rate = check(new_failure_rate, "new failure rate")?;
    let total = check(observed_total_production, "observed total production")?;
    let faulty = check(observed_faulty_products, "observed faulty products")?;
    for &rate in all_station_failure_rates {
        check(rate, "station failure rate")?;
    }

    if current_rate == 0.0 {
        return Err(ScenarioError::ZeroCurrentFailureRate);
    }
    let total_failure_rate: f64 = all_station_failure_rates.iter().sum();
    if total_failure_rate <= 0.0 {
        return Err(ScenarioError::ZeroTotalFailureRate);
    }
    if total == 0.0 {
        return Err(ScenarioError::ZeroObservedProduction);
    }

    let station_contribution = current_rate / total_failure_rate;
    let station_faults = faulty * station_contribution;
    let reduction_factor = new_rate / current_rate;
    let new_station_faults = station_faults * reduction_factor;
    let other_faults = faulty - station_faults;
    let new_total_faults = new_station_faults + other_faults;

    let productivity_gain = (station_faults - new_station_faults) * PRODUCTIVITY_PER_AVOIDED_FAULT;
    let new_total_production = total + productivity_gain;
    if new_total_production <= 0.0 {
        return Err(ScenarioError::ZeroProjectedProduction);
    }

    Ok(ScenarioComparison {
        current: ScenarioOutcome {
            total_production: total,
            faulty_products: faulty,
            faulty_rate: faulty / total,
        },
        optimized: ScenarioOutcome {
            total_production: new_total_production,
            faulty_products: new_total_faults,
            faulty_rate: new_total_faults / new_total_production,
        },
    })
}

/// Slider bounds for a proposed failure rate, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProposalRange {
    pub min_pct: u32,
    pub max_pct: u32,
    pub default_pct: u32,
}

impl ProposalRange {
    /// From 1% up to the current rate, starting at half the current rate.
    pub fn for_rate(current_failure_rate: f64) -> Self {
        let pct = (current_failure_rate * 100.0).max(0.0);
        let max_pct = pct.round() as u32;
        Self {
            min_pct: 1,
            max_pct: max_pct.max(1),
            default_pct: ((pct / 2.0).round() as u32).clamp(1, max_pct.max(1)),
        }
    }

    pub fn contains(&self, pct: u32) -> bool {
        (self.min_pct..=self.max_pct).contains(&pct)
    }
}
