use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ld_core::StationId;
use ld_results::{Metric, Metrics, ResultsPayload, Run, RunStore, generate_runs};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

#[test]
fn save_and_load_runs() {
    let dir = unique_temp_dir("ld_results_store");
    let store = RunStore::new(dir.clone()).expect("failed to create run store");

    let runs = generate_runs(&mut StdRng::seed_from_u64(1), 12);
    for run in &runs {
        store.save_run(run).expect("failed to save run");
    }
    assert!(store.has_run(12));
    assert!(!store.has_run(13));

    let loaded = store.load_runs().expect("failed to load runs");
    assert_eq!(loaded.len(), 12);
    // Directory order is arbitrary; loading sorts by run id.
    assert_eq!(
        loaded.iter().map(|r| r.run).collect::<Vec<_>>(),
        (1..=12).collect::<Vec<_>>()
    );

    let station4 = StationId::new(4).unwrap();
    for (saved, loaded) in runs.iter().zip(&loaded) {
        assert_eq!(saved.metrics.len(), loaded.metrics.len());
        assert_eq!(
            saved.metric(Metric::StationDowntime(station4)),
            loaded.metric(Metric::StationDowntime(station4))
        );
        assert_eq!(
            saved.metric(Metric::TotalProduction),
            loaded.metric(Metric::TotalProduction)
        );
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn load_reads_backend_csv_and_drops_bad_cells() {
    let dir = unique_temp_dir("ld_results_backend");
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("single_run_2.csv"),
        "Metric,Value\nTotal Production,165\nFaulty Products,8\nFaulty Rate,0.046\n",
    )
    .unwrap();
    fs::write(
        dir.join("single_run_1.csv"),
        "Metric,Value\nTotal Production,170\nStation 4 Downtime,14.2\n",
    )
    .unwrap();
    fs::write(
        dir.join("single_run_3.csv"),
        "Metric,Value\nTotal Production,lots\nFaulty Products,6\n",
    )
    .unwrap();
    fs::write(dir.join("simulation_resultsSummary.csv"), "Metric,Value\nX,1\n").unwrap();

    let store = RunStore::open(dir.clone());
    let runs = store.load_runs().expect("failed to load runs");
    assert_eq!(runs.iter().map(|r| r.run).collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(runs[0].metric(Metric::TotalProduction), 170.0);
    assert_eq!(runs[1].metric(Metric::FaultyProducts), 8.0);

    // The bad cell is dropped, the rest of run 3 survives.
    assert!(!runs[2].metrics.contains("Total Production"));
    assert_eq!(runs[2].metric(Metric::TotalProduction), 0.0);
    assert_eq!(runs[2].metric(Metric::FaultyProducts), 6.0);

    let payload = ResultsPayload::from_runs(runs);
    assert!(payload.success);
    assert_eq!(payload.summary["Total Production"], 335.0 / 3.0);
    assert_eq!(payload.summary["Faulty Products"], 14.0 / 3.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn non_finite_cells_read_as_zero() {
    let dir = unique_temp_dir("ld_results_nan");
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("single_run_1.csv"),
        "Metric,Value\nTotal Production,170\nFaulty Rate,nan\nStation 4 Downtime,inf\nFixing Time,-inf\n",
    )
    .unwrap();
    fs::write(
        dir.join("single_run_2.csv"),
        "Metric,Value\nTotal Production,160\nFaulty Rate,0.04\nStation 4 Downtime,14\n",
    )
    .unwrap();

    let runs = RunStore::open(dir.clone()).load_runs().unwrap();
    assert_eq!(runs.len(), 2);

    let station4 = StationId::new(4).unwrap();
    assert_eq!(runs[0].metrics.len(), 1);
    assert_eq!(runs[0].metric(Metric::FaultyRate), 0.0);
    assert_eq!(runs[0].metric(Metric::StationDowntime(station4)), 0.0);
    assert_eq!(runs[0].metric(Metric::FixingTime), 0.0);

    let summary = ResultsPayload::from_runs(runs).summary;
    assert!(summary.values().all(|v| v.is_finite()));
    assert_eq!(summary["Faulty Rate"], 0.02);
    assert_eq!(summary["Station 4 Downtime"], 7.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_dir_loads_nothing() {
    let store = RunStore::open(unique_temp_dir("ld_results_missing"));
    assert!(store.load_runs().unwrap().is_empty());
}

#[test]
fn single_run_roundtrip_keeps_names() {
    let dir = unique_temp_dir("ld_results_single");
    let store = RunStore::new(dir.clone()).unwrap();

    let mut metrics = Metrics::new();
    metrics.insert("Total Production", 165.0);
    metrics.insert("Supplier Occupancy", 0.013);
    store.save_run(&Run::new(9, metrics.clone())).unwrap();

    let loaded = store.load_run(9).unwrap();
    assert_eq!(loaded, Run::new(9, metrics));

    let _ = fs::remove_dir_all(&dir);
}
