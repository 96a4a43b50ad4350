//! Reaction chamber with active heating and pressurization.

use crate::advisory::Advisory;
use crate::common::{check_finite, check_fraction, check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::power::PowerSystem;
use isru_core::constants::{
    COMPRESSION_KJ_PER_MOL, CP_GAS_J_PER_KG_K, GAS_CONSTANT_J_PER_MOL_K, R_SPECIFIC_GAS_J_PER_KG_K,
};
use isru_core::{celsius_to_kelvin, hourly_energy_kj, safe_ratio};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Smallest gas mass used in the heating balance, kg.
const MIN_GAS_MASS_KG: f64 = 0.001;

/// Result of one heating step.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingOutcome {
    pub internal_temp_c: f64,
    pub energy_used_kj: f64,
    pub required_kj: f64,
    pub advisory: Option<Advisory>,
}

/// Result of one pressurization step.
#[derive(Debug, Clone, PartialEq)]
pub struct PressurizationOutcome {
    pub internal_pressure_pa: f64,
    pub energy_used_kj: f64,
    pub required_kj: f64,
    pub advisory: Option<Advisory>,
}

/// Thermally insulated pressure vessel hosting the Sabatier reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainmentVessel {
    pub target_temp_c: f64,
    pub target_pressure_pa: f64,
    pub vessel_volume_m3: f64,
    /// 0 = no insulation, 1 = perfect
    pub insulation_factor: f64,
    pub heating_power_kw: f64,
    pub pressurization_power_kw: f64,
    internal_temp_c: f64,
    internal_pressure_pa: f64,
}

impl ContainmentVessel {
    /// Vessel at Mars ambient (-60 C, 600 Pa) with the reference heater,
    /// compressor and insulation.
    pub fn new(
        target_temp_c: f64,
        target_pressure_pa: f64,
        vessel_volume_m3: f64,
    ) -> ComponentResult<Self> {
        Ok(Self {
            target_temp_c: check_finite(target_temp_c, "vessel target temperature")?,
            target_pressure_pa: check_positive(target_pressure_pa, "vessel target pressure")?,
            vessel_volume_m3: check_positive(vessel_volume_m3, "vessel volume")?,
            insulation_factor: 0.8,
            heating_power_kw: 10.0,
            pressurization_power_kw: 5.0,
            internal_temp_c: -60.0,
            internal_pressure_pa: 600.0,
        })
    }

    pub fn with_insulation(mut self, factor: f64) -> ComponentResult<Self> {
        self.insulation_factor = check_fraction(factor, "insulation factor")?;
        Ok(self)
    }

    pub fn with_power(mut self, heating_kw: f64, pressurization_kw: f64) -> ComponentResult<Self> {
        self.heating_power_kw = check_non_negative(heating_kw, "heating power")?;
        self.pressurization_power_kw = check_non_negative(pressurization_kw, "pressurization power")?;
        Ok(self)
    }

    pub fn with_initial_state(mut self, temp_c: f64, pressure_pa: f64) -> ComponentResult<Self> {
        self.internal_temp_c = check_finite(temp_c, "vessel initial temperature")?;
        self.internal_pressure_pa = check_positive(pressure_pa, "vessel initial pressure")?;
        Ok(self)
    }

    pub fn internal_temp_c(&self) -> f64 {
        self.internal_temp_c
    }

    pub fn internal_pressure_pa(&self) -> f64 {
        self.internal_pressure_pa
    }

    /// Gas mass in the vessel from the ideal-gas law, floored at 1 g.
    pub fn gas_mass_kg(&self) -> f64 {
        let temp_k = celsius_to_kelvin(self.internal_temp_c);
        let mass = safe_ratio(
            self.internal_pressure_pa * self.vessel_volume_m3,
            R_SPECIFIC_GAS_J_PER_KG_K * temp_k.max(0.0),
            0.0,
        );
        mass.max(MIN_GAS_MASS_KG)
    }

    /// Heat toward the target, then drift toward `external_temp_c`.
    ///
    /// Energy is capped by the heater rating and by `available_kj`. Above the
    /// target the heater idles; the vessel has no active cooling.
    pub fn adjust_temperature(
        &mut self,
        external_temp_c: f64,
        hour: usize,
        power: &mut PowerSystem,
        available_kj: f64,
    ) -> HeatingOutcome {
        let mass_kg = self.gas_mass_kg();
        let required_kj = mass_kg * CP_GAS_J_PER_KG_K * (self.target_temp_c - self.internal_temp_c) / 1000.0;

        let heater_kj = hourly_energy_kj(self.heating_power_kw);
        let bus_kj = available_kj.max(0.0);
        let available_energy = heater_kj.min(bus_kj);
        let energy_used = available_energy.min(required_kj).max(0.0);
        power.manage_battery(energy_used, available_energy);

        let mut advisory = None;
        if energy_used < required_kj && bus_kj < heater_kj.min(required_kj) {
            warn!(hour, available_kj, required_kj, "vessel heating limited by power");
            advisory = Some(Advisory::power_shortfall("vessel heating", bus_kj, required_kj));
        }

        if required_kj > 0.0 {
            self.internal_temp_c += energy_used * 1000.0 / (mass_kg * CP_GAS_J_PER_KG_K);
        }
        self.internal_temp_c += (external_temp_c - self.internal_temp_c) * (1.0 - self.insulation_factor);
        debug!(hour, temp_c = self.internal_temp_c, energy_used, "vessel heated");

        HeatingOutcome {
            internal_temp_c: self.internal_temp_c,
            energy_used_kj: energy_used,
            required_kj,
            advisory,
        }
    }

    /// Pump gas in toward the target pressure.
    ///
    /// No-op at or above the target. Otherwise the pressure rises by the
    /// supplied fraction of the energy needed to close the gap.
    pub fn adjust_pressure(
        &mut self,
        hour: usize,
        power: &mut PowerSystem,
        available_kj: f64,
    ) -> PressurizationOutcome {
        let unchanged = PressurizationOutcome {
            internal_pressure_pa: self.internal_pressure_pa,
            energy_used_kj: 0.0,
            required_kj: 0.0,
            advisory: None,
        };
        if self.internal_pressure_pa >= self.target_pressure_pa {
            return unchanged;
        }

        let temp_k = celsius_to_kelvin(self.internal_temp_c);
        let gap_pa = self.target_pressure_pa - self.internal_pressure_pa;
        let delta_mol = safe_ratio(
            gap_pa * self.vessel_volume_m3,
            GAS_CONSTANT_J_PER_MOL_K * temp_k,
            0.0,
        );
        let required_kj = delta_mol * COMPRESSION_KJ_PER_MOL;
        if !(required_kj > 0.0) {
            return unchanged;
        }

        let compressor_kj = hourly_energy_kj(self.pressurization_power_kw);
        let bus_kj = available_kj.max(0.0);
        let available_energy = compressor_kj.min(bus_kj);
        let energy_used = available_energy.min(required_kj);
        power.manage_battery(energy_used, available_energy);

        let mut advisory = None;
        if energy_used < required_kj && bus_kj < compressor_kj.min(required_kj) {
            warn!(hour, available_kj, required_kj, "vessel pressurization limited by power");
            advisory = Some(Advisory::power_shortfall("vessel pressurization", bus_kj, required_kj));
        }

        self.internal_pressure_pa += safe_ratio(energy_used, required_kj, 0.0) * gap_pa;
        debug!(hour, pressure_pa = self.internal_pressure_pa, energy_used, "vessel pressurized");

        PressurizationOutcome {
            internal_pressure_pa: self.internal_pressure_pa,
            energy_used_kj: energy_used,
            required_kj,
            advisory,
        }
    }
}
