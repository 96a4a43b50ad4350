//! Whole-run production and power metrics.
//!
//! Computed from a finished [`SimulationTable`], so they work equally on a
//! fresh run and on one loaded from the store.

use isru_sim::SimulationTable;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Aggregate figures for one run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunMetrics {
    pub hours: usize,
    /// CO2 taken in from the atmosphere (g)
    pub total_co2_added_g: f64,
    /// H2 produced by electrolysis (g)
    pub total_h2_produced_g: f64,
    /// CH4 tank level at the end of the run (g)
    pub final_ch4_g: f64,
    /// O2 tank level at the end of the run (g)
    pub final_o2_g: f64,
    /// Sum of hourly subsystem demand (kJ)
    pub total_power_demand_kj: f64,
    pub min_battery_kj: Option<f64>,
    pub max_battery_kj: Option<f64>,
    pub mean_catalyst_efficiency: Option<f64>,
    /// Hours in which electrolysis split no water
    pub zero_electrolysis_hours: usize,
}

impl RunMetrics {
    /// Returns true if the run had any hours to measure
    pub fn has_data(&self) -> bool {
        self.hours > 0
    }
}

fn min_max(values: &[f64]) -> (Option<f64>, Option<f64>) {
    if values.is_empty() {
        return (None, None);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (Some(min), Some(max))
}

pub fn compute_run_metrics(table: &SimulationTable) -> AppResult<RunMetrics> {
    let co2_added = table.require("CO2_added")?;
    let h2_produced = table.require("H2_produced")?;
    let ch4 = table.require("CH4_level")?;
    let o2 = table.require("O2_level")?;
    let demand = table.require("power_demand")?;
    let battery = table.require("battery_level")?;
    let catalyst = table.require("catalyst_efficiency")?;
    let electrolysis = table.require("electrolysis_power_demand")?;

    let (min_battery_kj, max_battery_kj) = min_max(battery);
    let mean_catalyst_efficiency = if catalyst.is_empty() {
        None
    } else {
        Some(catalyst.iter().sum::<f64>() / catalyst.len() as f64)
    };

    Ok(RunMetrics {
        hours: table.len(),
        total_co2_added_g: co2_added.iter().sum(),
        total_h2_produced_g: h2_produced.iter().sum(),
        final_ch4_g: ch4.last().copied().unwrap_or(0.0),
        final_o2_g: o2.last().copied().unwrap_or(0.0),
        total_power_demand_kj: demand.iter().sum(),
        min_battery_kj,
        max_battery_kj,
        mean_catalyst_efficiency,
        zero_electrolysis_hours: electrolysis.iter().filter(|&&kj| kj <= 0.0).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use isru_sim::HourRecord;

    #[test]
    fn empty_table_has_no_data() {
        let metrics = compute_run_metrics(&SimulationTable::new()).unwrap();
        assert!(!metrics.has_data());
        assert_eq!(metrics.min_battery_kj, None);
        assert_eq!(metrics.mean_catalyst_efficiency, None);
    }

    #[test]
    fn sums_and_extremes() {
        let mut table = SimulationTable::new();
        table.push(&HourRecord {
            co2_added: 100.0,
            h2_produced: 2.0,
            battery_level: 500.0,
            catalyst_efficiency: 0.9,
            electrolysis_power_demand: 0.0,
            power_demand: 10.0,
            ..HourRecord::default()
        });
        table.push(&HourRecord {
            co2_added: 0.0,
            h2_produced: 4.0,
            battery_level: 300.0,
            catalyst_efficiency: 0.7,
            electrolysis_power_demand: 25.0,
            power_demand: 30.0,
            ch4_level: 12.0,
            o2_level: 8.0,
            hour: 1.0,
            ..HourRecord::default()
        });

        let m = compute_run_metrics(&table).unwrap();
        assert_eq!(m.hours, 2);
        assert_eq!(m.total_co2_added_g, 100.0);
        assert_eq!(m.total_h2_produced_g, 6.0);
        assert_eq!(m.final_ch4_g, 12.0);
        assert_eq!(m.final_o2_g, 8.0);
        assert_eq!(m.total_power_demand_kj, 40.0);
        assert_eq!(m.min_battery_kj, Some(300.0));
        assert_eq!(m.max_battery_kj, Some(500.0));
        assert!((m.mean_catalyst_efficiency.unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(m.zero_electrolysis_hours, 1);
    }
}
