//! ld-results: simulation run data, results store, and fallback generator.

pub mod metric;
pub mod repository;
pub mod store;
pub mod summary;
pub mod synthetic;
pub mod types;

pub use metric::Metric;
pub use repository::{RunRepository, RunSource};
pub use store::RunStore;
pub use summary::summarize;
pub use synthetic::{generate_runs, generate_test_runs};
pub use types::*;

/// Number of runs the dashboard calendar covers.
pub const MAX_RUN: u32 = 100;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid run file name: {name}")]
    InvalidRunFile { name: String },
}
