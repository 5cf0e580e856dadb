//! Dashboard configuration, loaded from an optional YAML file.

use std::path::Path;
use std::time::Duration;

use ld_core::{StationCatalog, StationSpec};
use ld_results::MAX_RUN;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::period::{Period, PeriodKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the simulation service.
    pub service_url: String,
    pub request_timeout_s: u64,
    /// Number of runs the calendar covers.
    pub max_run: u32,
    /// Period shown at startup; unrecognized names mean `day`.
    pub default_period: String,
    pub stations: Vec<StationSpec>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".to_string(),
            request_timeout_s: 30,
            max_run: MAX_RUN,
            default_period: PeriodKind::Day.to_string(),
            stations: StationCatalog::default().iter().cloned().collect(),
        }
    }
}

impl DashboardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s)
    }

    pub fn catalog(&self) -> AppResult<StationCatalog> {
        Ok(StationCatalog::new(self.stations.clone())?)
    }

    /// Startup period, window at run 1.
    pub fn initial_period(&self) -> AppResult<Period> {
        Period::new(
            PeriodKind::from_name_or_day(&self.default_period),
            1,
            self.max_run,
        )
    }
}

/// Load config from a YAML file. Absent fields take their defaults.
pub fn load_config(path: &Path) -> AppResult<DashboardConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> AppResult<DashboardConfig> {
    let config: DashboardConfig = serde_yaml::from_str(content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;

    // Surface catalog and period problems at load time.
    config.catalog()?;
    config.initial_period()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ld_core::StationId;

    #[test]
    fn empty_document_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.catalog().unwrap(), StationCatalog::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_override() {
        let config = parse_config(
            "service_url: http://factory:8080\ndefault_period: week\nstations:\n  - {number: 1, name: Board, failure_rate: 0.1}\n  - {number: 2, name: Case, failure_rate: 0.2}\n",
        )
        .unwrap();
        assert_eq!(config.service_url, "http://factory:8080");
        assert_eq!(config.max_run, 100);
        assert_eq!(config.initial_period().unwrap().kind(), PeriodKind::Week);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name(StationId::new(2).unwrap()), Some("Case"));
    }

    #[test]
    fn unknown_period_is_day() {
        let config = parse_config("default_period: fortnight\n").unwrap();
        assert_eq!(config.initial_period().unwrap().kind(), PeriodKind::Day);
    }

    #[test]
    fn invalid_catalog_is_rejected() {
        let err = parse_config(
            "stations:\n  - {number: 1, name: A, failure_rate: 0.1}\n  - {number: 3, name: C, failure_rate: 0.1}\n",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[test]
    fn period_longer_than_calendar_is_rejected() {
        assert!(parse_config("max_run: 20\ndefault_period: month\n").is_err());
    }
}
