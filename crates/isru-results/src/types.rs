//! Result data types.

use isru_sim::AdvisoryCounts;
use serde::{Deserialize, Serialize};

pub type RunId = String;

/// Engine version recorded with every run and folded into its id.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    /// RFC 3339 creation time
    pub timestamp: String,
    pub sim_speed: f64,
    pub sim_duration: f64,
    pub seed: u64,
    pub total_time_steps: usize,
    pub engine_version: String,
    #[serde(default)]
    pub advisories: AdvisoryCounts,
    #[serde(default)]
    pub catalyst_replacements: u32,
}

/// Current UTC time in manifest format.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
