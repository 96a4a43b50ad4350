//! Shared application service layer for the ISRU plant simulator.
//!
//! This crate gives the CLI (and any other front end) one interface for
//! scenario handling, plant compilation, run execution with caching, and
//! result querying.

pub mod error;
pub mod metrics;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod scenario_compile;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use metrics::{RunMetrics, compute_run_metrics};
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{init_scenario, load_or_default, load_scenario, save_scenario, validate_scenario};
pub use query::{RunSummary, extract_series, get_run_summary, list_columns};
pub use run_service::{
    PowerBudgetReport, RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run,
    ensure_run_with_progress, environment_table, list_runs, load_run, run_power_budget, run_simulation,
    run_simulation_seeded,
};
pub use scenario_compile::{
    compile_distribution, compile_environment, compile_plant, compile_power_system,
    environment_cycles, reactor_settings,
};
