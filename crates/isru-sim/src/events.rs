//! Tally of advisories raised during a run.

use isru_components::Advisory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdvisoryCounts {
    /// Depletion hours per resource
    pub depleted: BTreeMap<String, usize>,
    /// Power shortfall hours per subsystem
    pub power_shortfalls: BTreeMap<String, usize>,
    pub efficiency_collapses: usize,
}

impl AdvisoryCounts {
    pub fn record(&mut self, advisory: &Advisory) {
        match advisory {
            Advisory::Depleted { resource } => {
                *self.depleted.entry(resource.clone()).or_default() += 1;
            }
            Advisory::PowerShortfall { subsystem, .. } => {
                *self.power_shortfalls.entry(subsystem.clone()).or_default() += 1;
            }
            Advisory::EfficiencyCollapse { .. } => self.efficiency_collapses += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.depleted.values().sum::<usize>()
            + self.power_shortfalls.values().sum::<usize>()
            + self.efficiency_collapses
    }
}
