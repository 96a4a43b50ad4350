//! Hourly simulation driver.

use crate::error::{SimError, SimResult};
use crate::events::AdvisoryCounts;
use crate::plant::IsruPlant;
use crate::record::SimulationTable;
use rand::RngCore;
use tracing::{info, warn};

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Number of simulated hours
    pub total_steps: usize,
    /// Report progress every N hours (the last hour is always reported)
    pub progress_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            total_steps: isru_core::mars::total_time_steps(0.1),
            progress_every: 24,
        }
    }
}

/// Progress snapshot handed to the callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimProgress {
    /// Hours completed so far
    pub hour: usize,
    pub total_hours: usize,
    pub fraction_complete: f64,
}

/// Complete output of one run.
#[derive(Debug, Clone)]
pub struct SimOutput {
    pub table: SimulationTable,
    pub advisories: AdvisoryCounts,
    pub catalyst_replacements: u32,
}

/// Run `total_steps` hours of the plant.
pub fn run_sim(plant: &mut IsruPlant, opts: &SimOptions, rng: &mut dyn RngCore) -> SimResult<SimOutput> {
    run_sim_with_progress(plant, opts, rng, |_| {})
}

/// Run the plant, calling `on_progress` as hours complete.
///
/// The loop always runs to completion; shortfalls are tallied, not raised.
pub fn run_sim_with_progress<F>(
    plant: &mut IsruPlant,
    opts: &SimOptions,
    rng: &mut dyn RngCore,
    mut on_progress: F,
) -> SimResult<SimOutput>
where
    F: FnMut(&SimProgress),
{
    if opts.progress_every == 0 {
        return Err(SimError::InvalidArg {
            what: "progress_every must be positive",
        });
    }
    plant.validate()?;
    let series = plant.sabatier.series_len();
    if series < opts.total_steps {
        return Err(SimError::SeriesTooShort {
            needed: opts.total_steps,
            got: series,
        });
    }

    info!(total_steps = opts.total_steps, "starting plant simulation");
    let mut table = SimulationTable::with_capacity(opts.total_steps);
    let mut advisories = AdvisoryCounts::default();

    for hour in 0..opts.total_steps {
        let step = plant.step(hour, rng);
        for advisory in &step.advisories {
            advisories.record(advisory);
        }
        table.push(&step.record);

        let done = hour + 1;
        if done % opts.progress_every == 0 || done == opts.total_steps {
            on_progress(&SimProgress {
                hour: done,
                total_hours: opts.total_steps,
                fraction_complete: done as f64 / opts.total_steps as f64,
            });
        }
    }

    if advisories.total() > 0 {
        warn!(
            total = advisories.total(),
            collapses = advisories.efficiency_collapses,
            "run finished with advisories"
        );
    }
    info!(rows = table.len(), "plant simulation complete");

    Ok(SimOutput {
        table,
        advisories,
        catalyst_replacements: plant.sabatier.catalyst_replacements(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.total_steps, 1648);
        assert_eq!(opts.progress_every, 24);
    }
}
