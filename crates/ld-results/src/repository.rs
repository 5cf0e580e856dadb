//! In-memory run set for one dashboard session.

use std::fmt;

use tracing::info;

use crate::{Run, RunId};

/// Where the current run set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunSource {
    #[default]
    Empty,
    Service,
    ResultsDir,
    Synthetic,
}

impl fmt::Display for RunSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunSource::Empty => "empty",
            RunSource::Service => "simulation service",
            RunSource::ResultsDir => "results directory",
            RunSource::Synthetic => "synthetic data",
        };
        f.write_str(label)
    }
}

/// Holds the active runs. Contents are never edited in place; a reload
/// replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct RunRepository {
    runs: Vec<Run>,
    source: RunSource,
}

impl RunRepository {
    pub fn new(runs: Vec<Run>, source: RunSource) -> Self {
        let mut repo = Self::default();
        repo.replace(runs, source);
        repo
    }

    /// Swap in a new run set. Whatever finished loading last wins.
    pub fn replace(&mut self, mut runs: Vec<Run>, source: RunSource) {
        runs.sort_by_key(|r| r.run);
        info!(count = runs.len(), %source, "run set replaced");
        self.runs = runs;
        self.source = source;
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn source(&self) -> RunSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Highest run id present.
    pub fn last_run(&self) -> Option<RunId> {
        self.runs.last().map(|r| r.run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Metrics;

    #[test]
    fn replace_is_wholesale_and_ordered() {
        let mut repo = RunRepository::new(
            vec![Run::new(3, Metrics::new()), Run::new(1, Metrics::new())],
            RunSource::Service,
        );
        assert_eq!(repo.runs().iter().map(|r| r.run).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(repo.last_run(), Some(3));

        repo.replace(vec![Run::new(5, Metrics::new())], RunSource::Synthetic);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.source(), RunSource::Synthetic);
        assert_eq!(repo.last_run(), Some(5));
    }

    #[test]
    fn default_is_empty() {
        let repo = RunRepository::default();
        assert!(repo.is_empty());
        assert_eq!(repo.source(), RunSource::Empty);
        assert_eq!(repo.last_run(), None);
    }
}
