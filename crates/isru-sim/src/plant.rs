//! The plant arena: every tank, the power bus and the subsystems.

use crate::error::{SimError, SimResult};
use crate::record::HourRecord;
use isru_components::{
    Advisory, AtmosphereIntakeSystem, CycleContext, ElectrolysisReactor, PowerSystem,
    ReactorSettings, SabatierReactor, TankBank,
};
use isru_core::TankId;
use isru_core::mars::sol_of;
use rand::RngCore;
use tracing::debug;

/// Handles of the five plant tanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantTanks {
    pub co2: TankId,
    pub h2: TankId,
    pub ch4: TankId,
    pub h2o: TankId,
    pub o2: TankId,
}

/// Everything a single run owns.
///
/// Subsystems hold tank handles only; [`IsruPlant::step`] lends them the
/// bank and the power bus one at a time in the fixed hourly order.
#[derive(Debug, Clone)]
pub struct IsruPlant {
    pub tanks: TankBank,
    pub ids: PlantTanks,
    pub power: PowerSystem,
    pub settings: ReactorSettings,
    pub intake: AtmosphereIntakeSystem,
    pub sabatier: SabatierReactor,
    pub electrolysis: ElectrolysisReactor,
}

/// One hour's record plus the advisories raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub record: HourRecord,
    pub advisories: Vec<Advisory>,
}

impl IsruPlant {
    /// Check that every handle points into the bank.
    pub fn validate(&self) -> SimResult<()> {
        for id in [self.ids.co2, self.ids.h2, self.ids.ch4, self.ids.h2o, self.ids.o2] {
            self.tanks.ensure(id)?;
        }
        self.settings.validate()?;
        if self.intake.co2_tank() != self.ids.co2 {
            return Err(SimError::InvalidArg {
                what: "intake must feed the plant CO2 tank",
            });
        }
        Ok(())
    }

    /// Run one hour: sample power once, then intake, Sabatier, electrolysis.
    pub fn step(&mut self, hour: usize, rng: &mut dyn RngCore) -> StepOutcome {
        let available_kj = self.power.available_power(hour, rng);
        let mut ctx = CycleContext {
            tanks: &mut self.tanks,
            power: &mut self.power,
            settings: &self.settings,
        };

        let intake = self.intake.run_cycle(hour, available_kj, &mut ctx);
        let sabatier = self.sabatier.run_cycle(hour, available_kj, &mut ctx);
        let electrolysis = self.electrolysis.run_cycle(hour, available_kj, &mut ctx);

        let mut advisories = sabatier.advisories.clone();
        advisories.extend(intake.advisory.clone());
        advisories.extend(electrolysis.advisory.clone());

        let sabatier_power_demand = sabatier.conditioning_kj();
        let record = HourRecord {
            co2_level: self.tanks.level_g(self.ids.co2),
            h2_level: self.tanks.level_g(self.ids.h2),
            ch4_level: self.tanks.level_g(self.ids.ch4),
            h2o_level: self.tanks.level_g(self.ids.h2o),
            o2_level: self.tanks.level_g(self.ids.o2),
            battery_level: sabatier.battery_level_kj,
            power_demand: sabatier_power_demand + electrolysis.power_used_kj + intake.power_used_kj,
            h2_produced: electrolysis.h2_produced_g,
            o2_produced: self.tanks.level_g(self.ids.o2),
            co2_added: intake.co2_added_g,
            intake_power_demand: intake.power_used_kj,
            electrolysis_power_demand: electrolysis.power_used_kj,
            sabatier_power_demand,
            internal_temp_c: sabatier.internal_temp_c,
            internal_pressure_pa: sabatier.internal_pressure_pa,
            catalyst_efficiency: sabatier.catalyst_efficiency,
            solar_power_generated: self.power.last_solar_kj(),
            nuclear_power_generated: self.power.last_nuclear_kj(),
            hour: hour as f64,
            sol: sol_of(hour),
        };
        debug!(hour, available_kj, power_demand = record.power_demand, "hour complete");

        StepOutcome { record, advisories }
    }
}
