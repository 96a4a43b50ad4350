//! Water electrolysis regenerating hydrogen and oxygen.

use crate::advisory::Advisory;
use crate::common::check_efficiency;
use crate::error::ComponentResult;
use crate::tank::TankBank;
use crate::traits::CycleContext;
use isru_core::{TankId, safe_ratio};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElectrolysisOutcome {
    pub h2o_consumed_g: f64,
    pub h2_produced_g: f64,
    pub o2_produced_g: f64,
    pub power_used_kj: f64,
    pub advisory: Option<Advisory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElectrolysisReactor {
    pub efficiency: f64,
    h2o: TankId,
    h2: TankId,
    o2: TankId,
}

impl ElectrolysisReactor {
    pub fn new(h2o: TankId, h2: TankId, o2: TankId, tanks: &TankBank) -> ComponentResult<Self> {
        for id in [h2o, h2, o2] {
            tanks.ensure(id)?;
        }
        Ok(Self {
            efficiency: 0.8,
            h2o,
            h2,
            o2,
        })
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> ComponentResult<Self> {
        self.efficiency = check_efficiency(efficiency, "electrolysis efficiency")?;
        Ok(self)
    }

    /// Split as much water as power and the H2O tank allow.
    ///
    /// Per mole of water: 2 M(H2) grams of hydrogen, 1 M(O2) grams of oxygen.
    pub fn run_cycle(
        &self,
        hour: usize,
        available_kj: f64,
        ctx: &mut CycleContext<'_>,
    ) -> ElectrolysisOutcome {
        let settings = ctx.settings;
        let bus_kj = available_kj.max(0.0);
        let power_limited_mol = safe_ratio(bus_kj * self.efficiency, settings.energy_per_mole_h2o, 0.0);
        let water_mol = ctx.tanks.level_g(self.h2o) / settings.molar_mass_h2o;
        let target_mol = power_limited_mol.min(water_mol);

        if !(target_mol > 0.0) {
            warn!(hour, "insufficient resources for electrolysis");
            let advisory = if water_mol <= 0.0 {
                Advisory::depleted("H2O")
            } else {
                Advisory::power_shortfall("electrolysis", bus_kj, settings.energy_per_mole_h2o / self.efficiency)
            };
            return ElectrolysisOutcome {
                advisory: Some(advisory),
                ..ElectrolysisOutcome::default()
            };
        }

        let h2o_consumed_g = ctx.tanks[self.h2o].remove(target_mol * settings.molar_mass_h2o);
        let moles = h2o_consumed_g / settings.molar_mass_h2o;
        let h2_produced_g = moles * 2.0 * settings.molar_mass_h2;
        let o2_produced_g = moles * settings.molar_mass_o2;
        let power_used_kj = moles * settings.energy_per_mole_h2o / self.efficiency;

        ctx.power.manage_battery(power_used_kj, available_kj);
        ctx.tanks[self.h2].add(h2_produced_g);
        ctx.tanks[self.o2].add(o2_produced_g);
        info!(hour, h2_g = h2_produced_g, o2_g = o2_produced_g, "electrolysis produced H2 and O2");

        ElectrolysisOutcome {
            h2o_consumed_g,
            h2_produced_g,
            o2_produced_g,
            power_used_kj,
            advisory: None,
        }
    }
}
