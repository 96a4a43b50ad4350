//! Scenario validation logic.

use crate::schema::{Scenario, TankDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<f64, ValidationError> {
    isru_core::ensure_finite(v, "scenario value").map_err(|_| invalid(field, v, "must be finite"))
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if finite(field, v)? <= 0.0 {
        return Err(invalid(field, v, "must be positive"));
    }
    Ok(())
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if finite(field, v)? < 0.0 {
        return Err(invalid(field, v, "must not be negative"));
    }
    Ok(())
}

fn efficiency(field: &str, v: f64) -> Result<(), ValidationError> {
    let v = finite(field, v)?;
    if v <= 0.0 || v > 1.0 {
        return Err(invalid(field, v, "must lie in (0, 1]"));
    }
    Ok(())
}

fn fraction(field: &str, v: f64) -> Result<(), ValidationError> {
    let v = finite(field, v)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(invalid(field, v, "must lie in [0, 1]"));
    }
    Ok(())
}

fn validate_tank(name: &str, tank: &TankDef) -> Result<(), ValidationError> {
    positive(&format!("tanks.{name}.capacity_g"), tank.capacity_g)?;
    non_negative(&format!("tanks.{name}.level_g"), tank.level_g)?;
    if tank.level_g > tank.capacity_g {
        return Err(invalid(
            &format!("tanks.{name}.level_g"),
            tank.level_g,
            "exceeds capacity",
        ));
    }
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    positive("run.sim_duration", scenario.run.sim_duration)?;
    finite("run.sim_speed", scenario.run.sim_speed)?;

    for (name, tank) in scenario.tanks.named() {
        validate_tank(&name.to_ascii_lowercase(), tank)?;
    }

    let p = &scenario.power;
    non_negative("power.solar_max_kw", p.solar_max_kw)?;
    efficiency("power.solar_efficiency", p.solar_efficiency)?;
    if p.daylight_hours > 24 {
        return Err(invalid("power.daylight_hours", p.daylight_hours, "exceeds a day"));
    }
    non_negative("power.solar_variability", p.solar_variability)?;
    fraction("power.dust_storm_probability", p.dust_storm_probability)?;
    non_negative("power.nuclear_max_kw", p.nuclear_max_kw)?;
    fraction("power.nuclear_uptime", p.nuclear_uptime)?;
    non_negative("power.nuclear_burnup_rate", p.nuclear_burnup_rate)?;
    positive("power.battery_capacity_kj", p.battery_capacity_kj)?;
    non_negative("power.battery_level_kj", p.battery_level_kj)?;
    if p.battery_level_kj > p.battery_capacity_kj {
        return Err(invalid("power.battery_level_kj", p.battery_level_kj, "exceeds capacity"));
    }
    efficiency("power.charge_efficiency", p.charge_efficiency)?;
    efficiency("power.discharge_efficiency", p.discharge_efficiency)?;
    fraction("power.battery_degradation_rate", p.battery_degradation_rate)?;

    let i = &scenario.intake;
    positive("intake.intake_rate_g", i.intake_rate_g)?;
    non_negative("intake.power_per_cycle_kj", i.power_per_cycle_kj)?;
    if i.interval_hours == 0 {
        return Err(invalid("intake.interval_hours", 0, "must be at least 1"));
    }

    let v = &scenario.vessel;
    finite("vessel.target_temp_c", v.target_temp_c)?;
    positive("vessel.target_pressure_pa", v.target_pressure_pa)?;
    positive("vessel.volume_m3", v.volume_m3)?;
    fraction("vessel.insulation_factor", v.insulation_factor)?;
    non_negative("vessel.heating_power_kw", v.heating_power_kw)?;
    non_negative("vessel.pressurization_power_kw", v.pressurization_power_kw)?;
    finite("vessel.initial_temp_c", v.initial_temp_c)?;
    positive("vessel.initial_pressure_pa", v.initial_pressure_pa)?;

    let s = &scenario.sabatier;
    efficiency("sabatier.base_efficiency", s.base_efficiency)?;
    non_negative("sabatier.degradation_rate", s.degradation_rate)?;
    fraction("sabatier.min_operational_efficiency", s.min_operational_efficiency)?;
    non_negative("sabatier.activation_energy_kj", s.activation_energy_kj)?;

    efficiency("electrolysis.efficiency", scenario.electrolysis.efficiency)?;

    let m = &scenario.settings;
    for (field, value) in [
        ("settings.molar_mass_co2", m.molar_mass_co2),
        ("settings.molar_mass_h2", m.molar_mass_h2),
        ("settings.molar_mass_ch4", m.molar_mass_ch4),
        ("settings.molar_mass_h2o", m.molar_mass_h2o),
        ("settings.molar_mass_o2", m.molar_mass_o2),
        ("settings.energy_per_mole_ch4", m.energy_per_mole_ch4),
        ("settings.energy_per_mole_h2o", m.energy_per_mole_h2o),
    ] {
        positive(field, value)?;
    }

    let e = &scenario.environment;
    for (field, value) in [
        ("environment.baseline_temp_c", e.baseline_temp_c),
        ("environment.seasonal_temp_amplitude_c", e.seasonal_temp_amplitude_c),
        ("environment.daily_temp_amplitude_c", e.daily_temp_amplitude_c),
        ("environment.baseline_pressure_pa", e.baseline_pressure_pa),
        ("environment.seasonal_pressure_amplitude_pa", e.seasonal_pressure_amplitude_pa),
        ("environment.daily_pressure_amplitude_pa", e.daily_pressure_amplitude_pa),
    ] {
        finite(field, value)?;
    }
    non_negative("environment.temp_noise_std_c", e.temp_noise_std_c)?;
    non_negative("environment.pressure_noise_std_pa", e.pressure_noise_std_pa)?;

    let mut load_names = HashSet::new();
    for load in &scenario.loads {
        if !load_names.insert(&load.name) {
            return Err(ValidationError::DuplicateId {
                id: load.name.clone(),
                context: "loads".to_string(),
            });
        }
        non_negative(&format!("loads.{}.demand_kj", load.name), load.demand_kj)?;
        if let Some(h) = load.operational_hours.iter().find(|h| **h >= 24) {
            return Err(invalid(
                &format!("loads.{}.operational_hours", load.name),
                h,
                "hour of day must be below 24",
            ));
        }
    }

    Ok(())
}
