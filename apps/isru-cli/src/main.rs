use clap::{Parser, Subcommand, ValueEnum};
use isru_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, compute_run_metrics,
    project_service, query, run_service,
};
use isru_results::{column_to_csv, table_to_csv, write_table_csv};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "isru-cli")]
#[command(about = "ISRU CLI - Mars propellant plant simulator", long_about = None)]
struct Cli {
    /// Log debug output (repeat for per-hour trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the plant simulation
    Run {
        /// Scenario file (YAML or JSON); the reference plant when omitted
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Simulated Martian years
        #[arg(long)]
        duration: Option<f64>,
        /// Recorded with the run; does not change the model
        #[arg(long)]
        speed: Option<f64>,
        /// Random seed; drawn from entropy when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Write the table to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
        /// Directory holding the run cache
        #[arg(long)]
        store: Option<PathBuf>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate scenario file syntax and values
    Validate {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Write the reference plant as a scenario file
    InitScenario {
        /// Path of the new scenario file (.yaml or .json)
        scenario_path: PathBuf,
    },
    /// List cached runs
    Runs {
        /// Directory holding the run cache
        #[arg(long, default_value = ".")]
        store: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Run ID to display
        run_id: String,
        /// Directory holding the run cache
        #[arg(long, default_value = ".")]
        store: PathBuf,
    },
    /// Export one column of a cached run against its hour axis
    ExportSeries {
        /// Run ID
        run_id: String,
        /// Column name (e.g. CH4_level, battery_level)
        column: String,
        /// Directory holding the run cache
        #[arg(long, default_value = ".")]
        store: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the scenario's habitat loads with load shedding
    PowerBudget {
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Hours to distribute
        #[arg(long, default_value_t = 48)]
        hours: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print the external temperature and pressure cycles as CSV
    Environment {
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Simulated Martian years
        #[arg(long, default_value_t = 0.1)]
        duration: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            scenario,
            duration,
            speed,
            seed,
            output,
            format,
            store,
            no_cache,
        } => cmd_run(
            scenario.as_deref(),
            duration,
            speed,
            seed,
            output.as_deref(),
            format,
            store.as_deref(),
            !no_cache,
        ),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::InitScenario { scenario_path } => cmd_init_scenario(&scenario_path),
        Commands::Runs { store } => cmd_runs(&store),
        Commands::ShowRun { run_id, store } => cmd_show_run(&store, &run_id),
        Commands::ExportSeries {
            run_id,
            column,
            store,
            output,
        } => cmd_export_series(&store, &run_id, &column, output.as_deref()),
        Commands::PowerBudget {
            scenario,
            hours,
            seed,
        } => cmd_power_budget(scenario.as_deref(), hours, seed),
        Commands::Environment {
            scenario,
            duration,
            seed,
        } => cmd_environment(scenario.as_deref(), duration, seed),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    scenario_path: Option<&Path>,
    duration: Option<f64>,
    speed: Option<f64>,
    seed: Option<u64>,
    output: Option<&Path>,
    format: OutputFormat,
    store: Option<&Path>,
    use_cache: bool,
) -> AppResult<()> {
    let mut scenario = project_service::load_or_default(scenario_path)?;
    if let Some(d) = duration {
        scenario.run.sim_duration = d;
    }
    if let Some(s) = speed {
        scenario.run.sim_speed = s;
    }
    if seed.is_some() {
        scenario.run.seed = seed;
    }

    eprintln!(
        "Running '{}' for {} Martian years",
        scenario.name, scenario.run.sim_duration
    );

    let request = RunRequest {
        scenario: &scenario,
        store_dir: store,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event: RunProgressEvent| {
            let fraction = event
                .progress
                .as_ref()
                .map(|p| p.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        eprintln!("✓ Loaded from cache: {}", response.run_id);
    } else {
        eprintln!("✓ Simulation completed: {}", response.run_id);
    }
    eprintln!("  Seed: {}", response.manifest.seed);
    print_timing_summary(&response.timing);

    let metrics = compute_run_metrics(&response.table)?;
    eprintln!("\nProduction:");
    eprintln!("  Hours:            {}", metrics.hours);
    eprintln!("  CO2 taken in:     {:.1} g", metrics.total_co2_added_g);
    eprintln!("  H2 produced:      {:.1} g", metrics.total_h2_produced_g);
    eprintln!("  CH4 in tank:      {:.1} g", metrics.final_ch4_g);
    eprintln!("  O2 in tank:       {:.1} g", metrics.final_o2_g);
    if let Some(mean) = metrics.mean_catalyst_efficiency {
        eprintln!("  Mean catalyst:    {:.4}", mean);
    }
    let advisories = &response.manifest.advisories;
    if advisories.total() > 0 {
        eprintln!(
            "  Advisories:       {} (catalyst replacements: {})",
            advisories.total(),
            response.manifest.catalyst_replacements
        );
    }

    match (output, format) {
        (Some(path), OutputFormat::Csv) => {
            write_table_csv(path, &response.table)?;
            eprintln!("✓ Wrote {} rows to {}", response.table.len(), path.display());
        }
        (Some(path), OutputFormat::Json) => {
            std::fs::write(path, table_json(&response.table)?)?;
            eprintln!("✓ Wrote {} rows to {}", response.table.len(), path.display());
        }
        (None, OutputFormat::Csv) => print!("{}", table_to_csv(&response.table)?),
        (None, OutputFormat::Json) => println!("{}", table_json(&response.table)?),
    }

    Ok(())
}

fn table_json(table: &isru_sim::SimulationTable) -> AppResult<String> {
    serde_json::to_string(table).map_err(|e| AppError::Results(e.to_string()))
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    project_service::validate_scenario(&scenario)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn cmd_init_scenario(scenario_path: &Path) -> AppResult<()> {
    project_service::init_scenario(scenario_path)?;
    println!("✓ Wrote reference plant to {}", scenario_path.display());
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(100));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, &event.progress) {
        (RunStage::Simulating, Some(p)) => {
            let width = 28usize;
            let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            eprint!(
                "\r[{}] {:>6.2}%  hour={}/{}  elapsed={:.1}s",
                bar,
                p.fraction_complete * 100.0,
                p.hour,
                p.total_hours,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            eprint!("{}", line);
        }
    }
    let _ = io::stderr().flush();
}

fn print_timing_summary(timing: &isru_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let pct = |t: f64| 100.0 * t / total;

    eprintln!("\nTiming summary:");
    eprintln!(
        "  Environment: {:.3}s ({:.1}%)",
        timing.environment_time_s,
        pct(timing.environment_time_s)
    );
    eprintln!(
        "  Compile:     {:.3}s ({:.1}%)",
        timing.compile_time_s,
        pct(timing.compile_time_s)
    );
    eprintln!(
        "  Simulate:    {:.3}s ({:.1}%)",
        timing.simulate_time_s,
        pct(timing.simulate_time_s)
    );
    if timing.save_time_s > 0.0 {
        eprintln!(
            "  Save:        {:.3}s ({:.1}%)",
            timing.save_time_s,
            pct(timing.save_time_s)
        );
    }
    if timing.load_cache_time_s > 0.0 {
        eprintln!("  Cache load:  {:.3}s", timing.load_cache_time_s);
    }
    eprintln!("  Total:       {:.3}s", timing.total_time_s);
}

fn cmd_runs(store: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(store)?;

    if runs.is_empty() {
        println!("No cached runs found in {}", store.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} years, seed {}, {})",
                manifest.run_id,
                manifest.scenario_name,
                manifest.sim_duration,
                manifest.seed,
                manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, table) = run_service::load_run(store, run_id)?;
    let summary = query::get_run_summary(&table)?;
    let metrics = compute_run_metrics(&table)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    println!(
        "  Duration: {} years (speed {}), seed {}",
        manifest.sim_duration, manifest.sim_speed, manifest.seed
    );
    println!("  Hours: {}", summary.record_count);
    println!(
        "  Sol range: {:.2} - {:.2}",
        summary.sol_range.0, summary.sol_range.1
    );
    println!("  Final CH4: {:.1} g", metrics.final_ch4_g);
    println!("  Final O2: {:.1} g", metrics.final_o2_g);
    if let (Some(lo), Some(hi)) = (metrics.min_battery_kj, metrics.max_battery_kj) {
        println!("  Battery: {:.0} - {:.0} kJ", lo, hi);
    }
    println!("  Hours without electrolysis: {}", metrics.zero_electrolysis_hours);

    let advisories = &manifest.advisories;
    println!("\nAdvisories: {}", advisories.total());
    for (resource, count) in &advisories.depleted {
        println!("  {} depleted: {}", resource, count);
    }
    for (subsystem, count) in &advisories.power_shortfalls {
        println!("  {} power shortfall: {}", subsystem, count);
    }
    if advisories.efficiency_collapses > 0 {
        println!(
            "  catalyst replacements: {}",
            advisories.efficiency_collapses
        );
    }

    println!("\nColumns:");
    for name in query::list_columns(&table) {
        println!("  {}", name);
    }

    Ok(())
}

fn cmd_export_series(
    store: &Path,
    run_id: &str,
    column: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, table) = run_service::load_run(store, run_id)?;
    let csv = column_to_csv(&table, column)?;

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} data points to {}", table.len(), path.display());
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_power_budget(scenario_path: Option<&Path>, hours: usize, seed: u64) -> AppResult<()> {
    let scenario = project_service::load_or_default(scenario_path)?;
    let report = run_service::run_power_budget(&scenario, hours, seed)?;

    println!("Power budget for {} hours:", report.records.len());
    for record in &report.records {
        let shed = if record.shed.is_empty() {
            String::new()
        } else {
            format!("  shed: {}", record.shed.join(", "))
        };
        println!(
            "  hour {:>4}  gen {:>12.1} kJ  load {:>10.1} kJ  soc {:>5.1}%{}",
            record.hour,
            record.total_generation_kj,
            record.total_consumption_kj,
            record.battery_soc * 100.0,
            shed
        );
    }

    if report.shed_hours.is_empty() {
        println!("✓ No loads shed");
    } else {
        println!("Hours shed:");
        for (name, count) in &report.shed_hours {
            println!("  {}: {}", name, count);
        }
    }
    println!("Final battery: {:.1}%", report.final_battery_soc * 100.0);
    Ok(())
}

fn cmd_environment(scenario_path: Option<&Path>, duration: f64, seed: u64) -> AppResult<()> {
    let scenario = project_service::load_or_default(scenario_path)?;
    let table = run_service::environment_table(&scenario, duration, seed)?;
    print!("{}", table_to_csv(&table)?);
    Ok(())
}
