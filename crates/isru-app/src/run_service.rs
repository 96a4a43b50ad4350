//! Run execution and caching service.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use isru_components::DistributionRecord;
use isru_core::mars::{sol_of, total_time_steps};
use isru_project::Scenario;
use isru_results::{ENGINE_VERSION, RunManifest, RunStore, compute_run_id, timestamp_now};
use isru_sim::{Column, SimOptions, SimOutput, SimulationTable, run_sim_with_progress};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};
use crate::project_service;
use crate::scenario_compile::{compile_distribution, compile_environment, compile_plant};

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario: &'a Scenario,
    /// Directory holding the `.isru/runs` cache. `None` runs without persistence.
    pub store_dir: Option<&'a Path>,
    pub options: RunOptions,
}

/// Concise timing summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub environment_time_s: f64,
    pub compile_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub table: SimulationTable,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

type ProgressSink<'a, 'b> = &'a mut Option<&'b mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(progress_cb: ProgressSink<'_, '_>, stage: RunStage, started: Instant, message: &str) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Simulate the reference plant for `sim_duration` Martian years.
///
/// `sim_speed` is carried through to the scenario but does not change the
/// model. Randomness is seeded from entropy, so repeated calls differ in
/// every column except `hour` and `sol`.
pub fn run_simulation(sim_speed: f64, sim_duration: f64) -> AppResult<SimulationTable> {
    run_simulation_seeded(sim_speed, sim_duration, rand::random())
}

/// As [`run_simulation`], reproducible for a given `seed`.
pub fn run_simulation_seeded(sim_speed: f64, sim_duration: f64, seed: u64) -> AppResult<SimulationTable> {
    let mut scenario = Scenario::default();
    scenario.run.sim_speed = sim_speed;
    scenario.run.sim_duration = sim_duration;
    scenario.run.seed = Some(seed);

    let mut timing = RunTimingSummary::default();
    let output = simulate(&scenario, seed, &mut None, Instant::now(), &mut timing)?;
    Ok(output.table)
}

/// Execute a scenario run, or load it from the store when cached.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();
    let scenario = request.scenario;

    let seed = scenario.run.seed.unwrap_or_else(rand::random);
    let run_id = compute_run_id(
        scenario,
        scenario.run.sim_duration,
        seed,
        &request.options.engine_version,
    );

    let store = match request.store_dir {
        Some(dir) => Some(RunStore::for_directory(dir)?),
        None => None,
    };

    if let Some(store) = &store {
        emit_progress(&mut progress_cb, RunStage::CheckingCache, started, "Checking run cache");
        if request.options.use_cache && store.has_run(&run_id) {
            emit_progress(
                &mut progress_cb,
                RunStage::LoadingCachedResult,
                started,
                "Loading cached run",
            );
            let load_started = Instant::now();
            let manifest = store.load_manifest(&run_id)?;
            let table = store.load_table(&run_id)?;
            timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
            timing.total_time_s = started.elapsed().as_secs_f64();

            emit_progress(&mut progress_cb, RunStage::Completed, started, "Loaded cached run");
            info!(run_id = %run_id, "loaded cached run");

            return Ok(RunResponse {
                run_id,
                manifest,
                table,
                loaded_from_cache: true,
                timing,
            });
        }
    }

    let output = simulate(scenario, seed, &mut progress_cb, started, &mut timing)?;

    let manifest = RunManifest {
        run_id: run_id.clone(),
        scenario_name: scenario.name.clone(),
        timestamp: timestamp_now(),
        sim_speed: scenario.run.sim_speed,
        sim_duration: scenario.run.sim_duration,
        seed,
        total_time_steps: output.table.len(),
        engine_version: request.options.engine_version.clone(),
        advisories: output.advisories,
        catalyst_replacements: output.catalyst_replacements,
    };

    if let Some(store) = &store {
        emit_progress(&mut progress_cb, RunStage::SavingResults, started, "Saving results");
        let save_started = Instant::now();
        store.save_run(&manifest, &output.table)?;
        timing.save_time_s = save_started.elapsed().as_secs_f64();
    }

    timing.total_time_s = started.elapsed().as_secs_f64();
    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        table: output.table,
        loaded_from_cache: false,
        timing,
    })
}

fn simulate(
    scenario: &Scenario,
    seed: u64,
    progress_cb: ProgressSink<'_, '_>,
    started: Instant,
    timing: &mut RunTimingSummary,
) -> AppResult<SimOutput> {
    emit_progress(progress_cb, RunStage::ValidatingScenario, started, "Validating scenario");
    project_service::validate_scenario(scenario)?;

    let years = scenario.run.sim_duration;
    let mut rng = StdRng::seed_from_u64(seed);

    emit_progress(
        progress_cb,
        RunStage::GeneratingEnvironment,
        started,
        "Generating Martian environment",
    );
    let env_started = Instant::now();
    let environment = compile_environment(scenario, years, &mut rng)?;
    timing.environment_time_s = env_started.elapsed().as_secs_f64();

    emit_progress(progress_cb, RunStage::CompilingPlant, started, "Compiling plant");
    let compile_started = Instant::now();
    let mut plant = compile_plant(scenario, environment)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    let opts = SimOptions {
        total_steps: total_time_steps(years),
        ..SimOptions::default()
    };
    debug!(seed, total_steps = opts.total_steps, "starting simulation");

    let sim_started = Instant::now();
    let output = run_sim_with_progress(&mut plant, &opts, &mut rng, |progress| {
        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(RunProgressEvent {
                stage: RunStage::Simulating,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
                message: None,
                progress: Some(*progress),
            });
        }
    })?;
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();

    info!(
        hours = output.table.len(),
        advisories = output.advisories.total(),
        catalyst_replacements = output.catalyst_replacements,
        "simulation finished"
    );
    Ok(output)
}

/// List stored runs under `store_dir`, oldest first.
pub fn list_runs(store_dir: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_directory(store_dir)?;
    Ok(store.list_runs()?)
}

/// Load a stored run's manifest and table.
pub fn load_run(store_dir: &Path, run_id: &str) -> AppResult<(RunManifest, SimulationTable)> {
    let store = RunStore::for_directory(store_dir)?;
    let manifest = store.load_manifest(run_id)?;
    let table = store.load_table(run_id)?;
    Ok((manifest, table))
}

/// Hour-by-hour habitat load budget with load shedding.
#[derive(Debug, Clone)]
pub struct PowerBudgetReport {
    pub records: Vec<DistributionRecord>,
    /// Hours each load spent disconnected
    pub shed_hours: BTreeMap<String, usize>,
    pub final_battery_soc: f64,
}

/// Run the scenario's loads against its generation and battery for `hours`.
pub fn run_power_budget(scenario: &Scenario, hours: usize, seed: u64) -> AppResult<PowerBudgetReport> {
    if hours == 0 {
        return Err(AppError::InvalidInput(
            "power budget needs at least one hour".to_string(),
        ));
    }
    project_service::validate_scenario(scenario)?;

    let mut manager = compile_distribution(scenario)?;
    let mut rng = StdRng::seed_from_u64(seed);
    for hour in 0..hours {
        manager.distribute_power(hour, &mut rng);
    }

    let mut shed_hours = BTreeMap::new();
    for record in manager.records() {
        for name in &record.shed {
            *shed_hours.entry(name.clone()).or_insert(0) += 1;
        }
    }

    Ok(PowerBudgetReport {
        records: manager.records().to_vec(),
        shed_hours,
        final_battery_soc: manager.battery().state_of_charge(),
    })
}

/// The external cycles a scenario would see, as `hour, sol, temperature_c, pressure_pa`.
pub fn environment_table(scenario: &Scenario, years: f64, seed: u64) -> AppResult<SimulationTable> {
    if !years.is_finite() || years <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "duration must be positive, got {}",
            years
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let env = compile_environment(scenario, years, &mut rng)?;
    let hours: Vec<usize> = (0..env.len()).collect();
    Ok(SimulationTable::from_columns(vec![
        Column {
            name: "hour".to_string(),
            values: hours.iter().map(|&h| h as f64).collect(),
        },
        Column {
            name: "sol".to_string(),
            values: hours.iter().map(|&h| sol_of(h)).collect(),
        },
        Column {
            name: "temperature_c".to_string(),
            values: env.temperature_c,
        },
        Column {
            name: "pressure_pa".to_string(),
            values: env.pressure_pa,
        },
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_table_is_seeded() {
        let scenario = Scenario::default();
        let a = environment_table(&scenario, 0.01, 4).unwrap();
        let b = environment_table(&scenario, 0.01, 4).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 164);
        let names: Vec<&str> = a.column_names().collect();
        assert_eq!(names, vec!["hour", "sol", "temperature_c", "pressure_pa"]);
        assert!(environment_table(&scenario, 0.0, 4).is_err());
    }

    #[test]
    fn run_options_default_to_cached_current_engine() {
        let opts = RunOptions::default();
        assert!(opts.use_cache);
        assert_eq!(opts.engine_version, ENGINE_VERSION);
    }
}
