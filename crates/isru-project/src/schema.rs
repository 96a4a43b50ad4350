//! Scenario schema definitions.
//!
//! Every section defaults to the reference plant, so an empty document is a
//! complete scenario.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub run: RunDef,
    pub tanks: TanksDef,
    pub power: PowerDef,
    pub intake: IntakeDef,
    pub vessel: VesselDef,
    pub sabatier: SabatierDef,
    pub electrolysis: ElectrolysisDef,
    pub settings: SettingsDef,
    pub environment: EnvironmentDef,
    /// Habitat loads for power-budget runs
    pub loads: Vec<LoadDef>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: "Reference plant".to_string(),
            description: None,
            run: RunDef::default(),
            tanks: TanksDef::default(),
            power: PowerDef::default(),
            intake: IntakeDef::default(),
            vessel: VesselDef::default(),
            sabatier: SabatierDef::default(),
            electrolysis: ElectrolysisDef::default(),
            settings: SettingsDef::default(),
            environment: EnvironmentDef::default(),
            loads: default_loads(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunDef {
    /// Simulated Martian years
    pub sim_duration: f64,
    /// Accepted and recorded; does not affect the model
    pub sim_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            sim_duration: 0.1,
            sim_speed: 1.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankDef {
    pub capacity_g: f64,
    #[serde(default)]
    pub level_g: f64,
}

impl TankDef {
    pub fn new(capacity_g: f64, level_g: f64) -> Self {
        Self { capacity_g, level_g }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TanksDef {
    pub co2: TankDef,
    pub h2: TankDef,
    pub ch4: TankDef,
    pub h2o: TankDef,
    pub o2: TankDef,
}

impl Default for TanksDef {
    fn default() -> Self {
        Self {
            co2: TankDef::new(10_000.0, 0.0),
            h2: TankDef::new(5_000.0, 400.0),
            ch4: TankDef::new(3_000.0, 0.0),
            h2o: TankDef::new(2_000.0, 0.0),
            o2: TankDef::new(5_000.0, 0.0),
        }
    }
}

impl TanksDef {
    /// `(name, tank)` pairs in plant order.
    pub fn named(&self) -> [(&'static str, &TankDef); 5] {
        [
            ("CO2", &self.co2),
            ("H2", &self.h2),
            ("CH4", &self.ch4),
            ("H2O", &self.h2o),
            ("O2", &self.o2),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerDef {
    pub solar_max_kw: f64,
    pub solar_efficiency: f64,
    pub daylight_hours: u64,
    /// Standard deviation of the multiplicative solar noise
    pub solar_variability: f64,
    pub dust_storm_probability: f64,
    pub nuclear_max_kw: f64,
    pub nuclear_uptime: f64,
    pub nuclear_burnup_rate: f64,
    pub nuclear_maintenance_hours: Vec<usize>,
    pub battery_capacity_kj: f64,
    pub battery_level_kj: f64,
    pub charge_efficiency: f64,
    pub discharge_efficiency: f64,
    pub battery_degradation_rate: f64,
}

impl Default for PowerDef {
    fn default() -> Self {
        Self {
            solar_max_kw: 100.0,
            solar_efficiency: 0.85,
            daylight_hours: 10,
            solar_variability: 0.1,
            dust_storm_probability: 0.0,
            nuclear_max_kw: 500.0,
            nuclear_uptime: 1.0,
            nuclear_burnup_rate: 0.0,
            nuclear_maintenance_hours: Vec::new(),
            battery_capacity_kj: 1_000_000.0,
            battery_level_kj: 500_000.0,
            charge_efficiency: 0.90,
            discharge_efficiency: 0.92,
            battery_degradation_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntakeDef {
    pub name: String,
    pub intake_rate_g: f64,
    pub power_per_cycle_kj: f64,
    pub interval_hours: usize,
}

impl Default for IntakeDef {
    fn default() -> Self {
        Self {
            name: "Martian Atmosphere Intake".to_string(),
            intake_rate_g: 100.0,
            power_per_cycle_kj: 50.0,
            interval_hours: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VesselDef {
    pub target_temp_c: f64,
    pub target_pressure_pa: f64,
    pub volume_m3: f64,
    pub insulation_factor: f64,
    pub heating_power_kw: f64,
    pub pressurization_power_kw: f64,
    pub initial_temp_c: f64,
    pub initial_pressure_pa: f64,
}

impl Default for VesselDef {
    fn default() -> Self {
        Self {
            target_temp_c: 275.0,
            target_pressure_pa: 100_000.0,
            volume_m3: 1.0,
            insulation_factor: 0.8,
            heating_power_kw: 10.0,
            pressurization_power_kw: 5.0,
            initial_temp_c: -60.0,
            initial_pressure_pa: 600.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SabatierDef {
    pub base_efficiency: f64,
    pub degradation_rate: f64,
    pub min_operational_efficiency: f64,
    pub activation_energy_kj: f64,
}

impl Default for SabatierDef {
    fn default() -> Self {
        Self {
            base_efficiency: 0.9,
            degradation_rate: 1e-4,
            min_operational_efficiency: 0.1,
            activation_energy_kj: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElectrolysisDef {
    pub efficiency: f64,
}

impl Default for ElectrolysisDef {
    fn default() -> Self {
        Self { efficiency: 0.8 }
    }
}

/// Molar masses (g/mol) and reaction energies (kJ/mol).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsDef {
    pub molar_mass_co2: f64,
    pub molar_mass_h2: f64,
    pub molar_mass_ch4: f64,
    pub molar_mass_h2o: f64,
    pub molar_mass_o2: f64,
    pub energy_per_mole_ch4: f64,
    pub energy_per_mole_h2o: f64,
}

impl Default for SettingsDef {
    fn default() -> Self {
        Self {
            molar_mass_co2: 44.01,
            molar_mass_h2: 2.016,
            molar_mass_ch4: 16.04,
            molar_mass_h2o: 18.015,
            molar_mass_o2: 32.0,
            energy_per_mole_ch4: 165.0,
            energy_per_mole_h2o: 285.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentDef {
    pub baseline_temp_c: f64,
    pub seasonal_temp_amplitude_c: f64,
    pub daily_temp_amplitude_c: f64,
    pub temp_noise_std_c: f64,
    pub baseline_pressure_pa: f64,
    pub seasonal_pressure_amplitude_pa: f64,
    pub daily_pressure_amplitude_pa: f64,
    pub pressure_noise_std_pa: f64,
}

impl Default for EnvironmentDef {
    fn default() -> Self {
        Self {
            baseline_temp_c: -60.0,
            seasonal_temp_amplitude_c: 30.0,
            daily_temp_amplitude_c: 40.0,
            temp_noise_std_c: 2.0,
            baseline_pressure_pa: 800.0,
            seasonal_pressure_amplitude_pa: 300.0,
            daily_pressure_amplitude_pa: 50.0,
            pressure_noise_std_pa: 10.0,
        }
    }
}

/// A scheduled consumer on the habitat bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadDef {
    pub name: String,
    pub demand_kj: f64,
    /// 1 = most critical
    pub criticality: u8,
    /// Hours of the day (0-23) the load runs; all day when omitted
    #[serde(default = "all_day")]
    pub operational_hours: Vec<u8>,
}

fn all_day() -> Vec<u8> {
    (0..24).collect()
}

fn default_loads() -> Vec<LoadDef> {
    vec![
        LoadDef {
            name: "Life Support".to_string(),
            demand_kj: 10_000.0,
            criticality: 1,
            operational_hours: all_day(),
        },
        LoadDef {
            name: "Communications".to_string(),
            demand_kj: 5_000.0,
            criticality: 2,
            operational_hours: (8..20).collect(),
        },
    ]
}
