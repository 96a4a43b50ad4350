//! Content-based hashing for run IDs.

use isru_project::{RunDef, Scenario};
use sha2::{Digest, Sha256};

/// Run id over everything that changes the output.
///
/// The scenario's run section is replaced by the explicit duration and seed;
/// `sim_speed` does not alter a run and is left out.
pub fn compute_run_id(scenario: &Scenario, sim_duration: f64, seed: u64, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let mut keyed = scenario.clone();
    keyed.run = RunDef::default();
    let scenario_json = serde_json::to_string(&keyed).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    hasher.update(sim_duration.to_le_bytes());
    hasher.update(seed.to_le_bytes());
    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let scenario = Scenario::default();
        let a = compute_run_id(&scenario, 0.1, 42, "v1");
        let b = compute_run_id(&scenario, 0.1, 42, "v1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let scenario = Scenario::default();
        let base = compute_run_id(&scenario, 0.1, 42, "v1");
        assert_ne!(base, compute_run_id(&scenario, 0.2, 42, "v1"));
        assert_ne!(base, compute_run_id(&scenario, 0.1, 43, "v1"));
        assert_ne!(base, compute_run_id(&scenario, 0.1, 42, "v2"));

        let mut other = Scenario::default();
        other.tanks.h2.level_g = 1_000.0;
        assert_ne!(base, compute_run_id(&other, 0.1, 42, "v1"));
    }

    #[test]
    fn sim_speed_does_not_change_the_id() {
        let mut fast = Scenario::default();
        fast.run.sim_speed = 10.0;
        assert_eq!(
            compute_run_id(&Scenario::default(), 0.1, 1, "v1"),
            compute_run_id(&fast, 0.1, 1, "v1")
        );
    }
}
