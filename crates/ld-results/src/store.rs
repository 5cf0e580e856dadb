//! Results directory: one `single_run_<N>.csv` file per run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::{Metrics, Run, RunId};
use crate::ResultsResult;

const FILE_PREFIX: &str = "single_run_";
const FILE_EXT: &str = "csv";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Open an existing results directory without creating it.
    pub fn open(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_path(&self, run_id: RunId) -> PathBuf {
        self.root_dir.join(format!("{FILE_PREFIX}{run_id}.{FILE_EXT}"))
    }

    pub fn has_run(&self, run_id: RunId) -> bool {
        self.run_path(run_id).exists()
    }

    pub fn save_run(&self, run: &Run) -> ResultsResult<()> {
        let mut writer = csv::Writer::from_path(self.run_path(run.run))?;
        writer.write_record(["Metric", "Value"])?;
        for (name, value) in run.metrics.iter() {
            writer.write_record([name, value.to_string().as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn load_run(&self, run_id: RunId) -> ResultsResult<Run> {
        read_run_file(&self.run_path(run_id), run_id)
    }

    /// Load every run file in the directory, ascending by run id.
    /// Files that fail to parse are logged and skipped.
    pub fn load_runs(&self) -> ResultsResult<Vec<Run>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(run_id) = path.file_name().and_then(|n| n.to_str()).and_then(parse_run_id)
            else {
                continue;
            };

            match read_run_file(&path, run_id) {
                Ok(run) => runs.push(run),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable run file"),
            }
        }

        runs.sort_by_key(|r| r.run);
        debug!(count = runs.len(), dir = %self.root_dir.display(), "loaded run files");
        Ok(runs)
    }
}

/// Run id encoded in a `single_run_<N>.csv` file name.
pub fn parse_run_id(file_name: &str) -> Option<RunId> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXT)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

fn read_run_file(path: &Path, run_id: RunId) -> ResultsResult<Run> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut metrics = Metrics::new();

    for record in reader.records() {
        let record = record?;
        let (Some(name), Some(raw)) = (record.get(0), record.get(1)) else {
            continue;
        };
        // Unparsable and non-finite cells are dropped, so they read as zero.
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => metrics.insert(name, value),
            _ => warn!(
                path = %path.display(),
                metric = name,
                value = raw,
                "ignoring non-numeric metric value"
            ),
        }
    }

    Ok(Run::new(run_id, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_from_file_name() {
        assert_eq!(parse_run_id("single_run_1.csv"), Some(1));
        assert_eq!(parse_run_id("single_run_100.csv"), Some(100));
        assert_eq!(parse_run_id("single_run_.csv"), None);
        assert_eq!(parse_run_id("single_run_7.txt"), None);
        assert_eq!(parse_run_id("simulation_resultsSummary.csv"), None);
    }
}
