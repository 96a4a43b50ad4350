//! Compilation of a `Scenario` into runnable plant structures.

use isru_components::{
    AtmosphereIntakeSystem, Battery, ContainmentVessel, ElectrolysisReactor, FissionReactor,
    LoadConsumer, PowerDistributionManager, PowerSystem, ReactorSettings, SabatierReactor,
    SabatierTanks, SolarArray, StorageTank, TankBank,
};
use isru_project::schema::{EnvironmentDef, PowerDef, Scenario, SettingsDef, TankDef};
use isru_sim::{EnvironmentCycles, IsruPlant, MarsEnvironment, PlantTanks};
use rand::RngCore;

use crate::error::AppResult;

pub fn environment_cycles(def: &EnvironmentDef) -> EnvironmentCycles {
    EnvironmentCycles {
        baseline_temp_c: def.baseline_temp_c,
        seasonal_temp_amplitude_c: def.seasonal_temp_amplitude_c,
        daily_temp_amplitude_c: def.daily_temp_amplitude_c,
        temp_noise_std_c: def.temp_noise_std_c,
        baseline_pressure_pa: def.baseline_pressure_pa,
        seasonal_pressure_amplitude_pa: def.seasonal_pressure_amplitude_pa,
        daily_pressure_amplitude_pa: def.daily_pressure_amplitude_pa,
        pressure_noise_std_pa: def.pressure_noise_std_pa,
    }
}

pub fn reactor_settings(def: &SettingsDef) -> AppResult<ReactorSettings> {
    let settings = ReactorSettings {
        molar_mass_co2: def.molar_mass_co2,
        molar_mass_h2: def.molar_mass_h2,
        molar_mass_ch4: def.molar_mass_ch4,
        molar_mass_h2o: def.molar_mass_h2o,
        molar_mass_o2: def.molar_mass_o2,
        energy_per_mole_ch4: def.energy_per_mole_ch4,
        energy_per_mole_h2o: def.energy_per_mole_h2o,
    };
    settings.validate()?;
    Ok(settings)
}

/// External temperature and pressure cycles for `years` of the scenario.
pub fn compile_environment(
    scenario: &Scenario,
    years: f64,
    rng: &mut dyn RngCore,
) -> AppResult<MarsEnvironment> {
    Ok(MarsEnvironment::generate(
        &environment_cycles(&scenario.environment),
        years,
        rng,
    )?)
}

fn build_tank(name: &str, def: &TankDef) -> AppResult<StorageTank> {
    Ok(StorageTank::new(name, def.capacity_g)?.with_level(def.level_g)?)
}

fn build_solar(def: &PowerDef) -> AppResult<SolarArray> {
    Ok(SolarArray::new("Solar Array", def.solar_max_kw)?
        .with_efficiency(def.solar_efficiency)?
        .with_daylight_hours(def.daylight_hours)?
        .with_variability(def.solar_variability)?
        .with_dust_storms(def.dust_storm_probability)?)
}

fn build_nuclear(def: &PowerDef) -> AppResult<FissionReactor> {
    Ok(FissionReactor::new("Fission Reactor", def.nuclear_max_kw)?
        .with_maintenance(def.nuclear_maintenance_hours.clone())
        .with_uptime(def.nuclear_uptime)?
        .with_burnup(def.nuclear_burnup_rate)?)
}

fn build_battery(def: &PowerDef) -> AppResult<Battery> {
    Ok(Battery::new(def.battery_capacity_kj, def.battery_level_kj)?
        .with_efficiencies(def.charge_efficiency, def.discharge_efficiency)?
        .with_degradation(def.battery_degradation_rate)?)
}

pub fn compile_power_system(def: &PowerDef) -> AppResult<PowerSystem> {
    Ok(PowerSystem::from_parts(
        build_solar(def)?,
        build_nuclear(def)?,
        build_battery(def)?,
    ))
}

/// Build the plant arena. The environment series feed the Sabatier reactor.
pub fn compile_plant(scenario: &Scenario, environment: MarsEnvironment) -> AppResult<IsruPlant> {
    let mut tanks = TankBank::new();
    let ids = PlantTanks {
        co2: tanks.insert(build_tank("CO2", &scenario.tanks.co2)?),
        h2: tanks.insert(build_tank("H2", &scenario.tanks.h2)?),
        ch4: tanks.insert(build_tank("CH4", &scenario.tanks.ch4)?),
        h2o: tanks.insert(build_tank("H2O", &scenario.tanks.h2o)?),
        o2: tanks.insert(build_tank("O2", &scenario.tanks.o2)?),
    };

    let intake_def = &scenario.intake;
    let intake = AtmosphereIntakeSystem::new(
        intake_def.name.clone(),
        ids.co2,
        intake_def.intake_rate_g,
        intake_def.power_per_cycle_kj,
        intake_def.interval_hours,
        &tanks,
    )?;

    let v = &scenario.vessel;
    let vessel = ContainmentVessel::new(v.target_temp_c, v.target_pressure_pa, v.volume_m3)?
        .with_insulation(v.insulation_factor)?
        .with_power(v.heating_power_kw, v.pressurization_power_kw)?
        .with_initial_state(v.initial_temp_c, v.initial_pressure_pa)?;

    let s = &scenario.sabatier;
    let sabatier = SabatierReactor::new(
        vessel,
        SabatierTanks {
            co2: ids.co2,
            h2: ids.h2,
            ch4: ids.ch4,
            h2o: ids.h2o,
        },
        environment.temperature_c,
        environment.pressure_pa,
        &tanks,
    )?
    .with_catalyst(s.base_efficiency, s.degradation_rate)?
    .with_min_efficiency(s.min_operational_efficiency)?
    .with_activation_energy(s.activation_energy_kj)?;

    let electrolysis = ElectrolysisReactor::new(ids.h2o, ids.h2, ids.o2, &tanks)?
        .with_efficiency(scenario.electrolysis.efficiency)?;

    let plant = IsruPlant {
        tanks,
        ids,
        power: compile_power_system(&scenario.power)?,
        settings: reactor_settings(&scenario.settings)?,
        intake,
        sabatier,
        electrolysis,
    };
    plant.validate()?;
    Ok(plant)
}

/// Habitat loads on the scenario's generation and battery.
pub fn compile_distribution(scenario: &Scenario) -> AppResult<PowerDistributionManager> {
    let power = &scenario.power;
    let mut manager = PowerDistributionManager::new(build_battery(power)?);
    manager.add_producer(Box::new(build_solar(power)?));
    manager.add_producer(Box::new(build_nuclear(power)?));
    for load in &scenario.loads {
        manager.add_consumer(Box::new(LoadConsumer::new(
            load.name.clone(),
            load.demand_kj,
            load.criticality,
            load.operational_hours.clone(),
        )?));
    }
    Ok(manager)
}
