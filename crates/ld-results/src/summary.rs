//! Whole-set averages reported alongside the runs.

use std::collections::{BTreeMap, BTreeSet};

use crate::Run;

/// Mean of every metric seen in any run, over all runs. Runs that lack a
/// metric contribute zero to its mean.
pub fn summarize(runs: &[Run]) -> BTreeMap<String, f64> {
    if runs.is_empty() {
        return BTreeMap::new();
    }

    let names: BTreeSet<&str> = runs.iter().flat_map(|r| r.metrics.names()).collect();
    let count = runs.len() as f64;

    names
        .into_iter()
        .map(|name| {
            let total: f64 = runs.iter().map(|r| r.metrics.get_or_default(name)).sum();
            (name.to_string(), total / count)
        })
        .collect()
}
