//! HTTP client for the simulation service.
//!
//! `GET /get-simulation-results` feeds the dashboard; any failure there
//! falls back to synthetic runs so the views always have data.
//! `POST /run-simulation` triggers a new batch on the service side.

use std::time::Duration;

use chrono::{DateTime, Utc};
use ld_results::{ResultsPayload, Run, RunSimulationResponse, RunSource, generate_test_runs};
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::{AppError, AppResult};

const RESULTS_PATH: &str = "/get-simulation-results";
const RUN_SIMULATION_PATH: &str = "/run-simulation";

#[derive(Clone, Debug)]
pub struct SimulationClient {
    base_url: String,
    client: reqwest::Client,
}

/// Runs ready to load into a repository, with their origin.
#[derive(Debug, Clone)]
pub struct LoadedRuns {
    pub runs: Vec<Run>,
    pub source: RunSource,
    /// Why the service data was not used, when falling back.
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Captured stdout of the simulation batch.
    pub output: String,
    pub completed_at: DateTime<Utc>,
}

impl SimulationClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> AppResult<Self> {
        Self::new(&config.service_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current results. Non-2xx and `success: false` are errors.
    pub async fn fetch_results(&self) -> AppResult<ResultsPayload> {
        let url = format!("{}{}", self.base_url, RESULTS_PATH);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("HTTP error: {}", status)));
        }

        let payload: ResultsPayload = response.json().await?;
        if !payload.success {
            return Err(AppError::Service(
                payload
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(payload)
    }

    /// Fetch results, falling back to synthetic runs on any failure.
    pub async fn load_runs(&self) -> LoadedRuns {
        match self.fetch_results().await {
            Ok(payload) => {
                info!(count = payload.runs.len(), url = %self.base_url, "loaded simulation results");
                LoadedRuns {
                    runs: payload.runs,
                    source: RunSource::Service,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "could not load simulation results, using synthetic data");
                LoadedRuns {
                    runs: generate_test_runs(),
                    source: RunSource::Synthetic,
                    fallback_reason: Some(e.to_string()),
                }
            }
        }
    }

    /// Ask the service to run a new simulation batch.
    pub async fn run_simulation(&self) -> AppResult<SimulationOutcome> {
        let url = format!("{}{}", self.base_url, RUN_SIMULATION_PATH);
        info!(url = %url, "starting simulation");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        // The service answers failures with a JSON body and a 500.
        let parsed: RunSimulationResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(AppError::Fetch(format!(
                    "Failed to parse run-simulation response: {}",
                    e
                )));
            }
            Err(_) => return Err(AppError::Fetch(format!("HTTP error: {}", status))),
        };

        if !parsed.success {
            let message = parsed
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| format!("service returned {}", status));
            warn!(error = %message, "simulation failed");
            return Err(AppError::SimulationFailed(message));
        }

        info!("simulation completed");
        Ok(SimulationOutcome {
            output: parsed.output.unwrap_or_default(),
            completed_at: Utc::now(),
        })
    }
}
