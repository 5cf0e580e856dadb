//! Result data types.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Metric;

pub type RunId = u32;

/// Metric name to value. Reads of absent keys yield zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, f64>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `name`, or zero when the key is missing.
    pub fn get_or_default(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.get_or_default(&metric.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.insert(metric.name(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for Metrics {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Payloads come from pandas; anything that is not a finite number is
// treated as absent so that it reads back as zero.
impl<'de> Deserialize<'de> for Metrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .map(|v| (name, v))
            })
            .collect())
    }
}

/// One simulation observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub run: RunId,
    #[serde(default)]
    pub metrics: Metrics,
}

impl Run {
    pub fn new(run: RunId, metrics: Metrics) -> Self {
        Self { run, metrics }
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        self.metrics.get(metric)
    }
}

/// Body of `GET /get-simulation-results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsPayload {
    pub success: bool,
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub summary: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultsPayload {
    pub fn from_runs(runs: Vec<Run>) -> Self {
        let summary = crate::summarize(&runs);
        Self {
            success: true,
            runs,
            summary,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            runs: Vec::new(),
            summary: BTreeMap::new(),
            error: Some(error.into()),
        }
    }
}

/// Body of `POST /run-simulation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSimulationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
