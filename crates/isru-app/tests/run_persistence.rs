use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use isru_app::{
    RunOptions, RunRequest, compute_run_metrics, ensure_run, list_runs, load_run, query,
};
use isru_project::Scenario;
use isru_results::RunStore;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn short_scenario(seed: u64) -> Scenario {
    let mut scenario = Scenario::default();
    scenario.run.sim_duration = 0.01;
    scenario.run.seed = Some(seed);
    scenario
}

#[test]
fn run_persists_and_is_served_from_cache() {
    let dir = unique_temp_dir("isru_app_persist");
    let scenario = short_scenario(21);
    let request = RunRequest {
        scenario: &scenario,
        store_dir: Some(&dir),
        options: RunOptions::default(),
    };

    let first = ensure_run(&request).expect("first run failed");
    assert!(!first.loaded_from_cache);

    let store = RunStore::for_directory(&dir).expect("failed to open store");
    assert!(store.has_run(&first.run_id));

    let second = ensure_run(&request).expect("cached run failed");
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.table, first.table);
    assert_eq!(second.manifest, first.manifest);

    let runs = list_runs(&dir).expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].scenario_name, "Reference plant");
    assert_eq!(runs[0].total_time_steps, 164);

    let (_manifest, table) = load_run(&dir, &first.run_id).expect("run should load");
    let summary = query::get_run_summary(&table).expect("summary should load");
    assert_eq!(summary.record_count, 164);
    assert_eq!(summary.hour_range, (0.0, 163.0));

    let metrics = compute_run_metrics(&table).expect("metrics");
    assert!(metrics.has_data());
    assert!(metrics.min_battery_kj.unwrap_or(-1.0) >= 0.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn different_seeds_are_different_runs() {
    let dir = unique_temp_dir("isru_app_seeds");
    let a = short_scenario(1);
    let b = short_scenario(2);
    let options = RunOptions {
        use_cache: false,
        ..RunOptions::default()
    };

    let ra = ensure_run(&RunRequest {
        scenario: &a,
        store_dir: Some(&dir),
        options: options.clone(),
    })
    .expect("run a");
    let rb = ensure_run(&RunRequest {
        scenario: &b,
        store_dir: Some(&dir),
        options,
    })
    .expect("run b");

    assert_ne!(ra.run_id, rb.run_id);
    assert_eq!(list_runs(&dir).expect("list").len(), 2);
    assert_eq!(ra.table.column("hour"), rb.table.column("hour"));

    let _ = fs::remove_dir_all(&dir);
}
