//! Error types for the ld-app service layer.

use std::path::PathBuf;

use crate::scenario::ScenarioError;

/// Application error type that wraps errors from the lower crates and
/// provides one error surface for the front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Station catalog error: {0}")]
    Catalog(#[from] ld_core::LdError),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Request to simulation service failed: {0}")]
    Fetch(String),

    #[error("Simulation service reported an error: {0}")]
    Service(String),

    #[error("Simulation run failed: {0}")]
    SimulationFailed(String),

    #[error("No data available for this period")]
    EmptyWindow,

    #[error("Scenario projection rejected: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ld-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ld_results::ResultsError> for AppError {
    fn from(err: ld_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}
