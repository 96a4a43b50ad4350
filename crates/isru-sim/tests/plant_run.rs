//! End-to-end runs of the reference plant.

use isru_components::{
    AtmosphereIntakeSystem, ContainmentVessel, ElectrolysisReactor, PowerSystem, ReactorSettings,
    SabatierReactor, SabatierTanks, StorageTank, TankBank,
};
use isru_core::mars::total_time_steps;
use isru_sim::{
    COLUMNS, EnvironmentCycles, IsruPlant, MarsEnvironment, PlantTanks, SimError, SimOptions,
    SimOutput, SimProgress, run_sim, run_sim_with_progress,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn reference_plant(env: MarsEnvironment, co2_g: f64) -> IsruPlant {
    let mut tanks = TankBank::new();
    let ids = PlantTanks {
        co2: tanks.insert(StorageTank::new("CO2", 10_000.0).unwrap().with_level(co2_g).unwrap()),
        h2: tanks.insert(StorageTank::new("H2", 5_000.0).unwrap().with_level(400.0).unwrap()),
        ch4: tanks.insert(StorageTank::new("CH4", 3_000.0).unwrap()),
        h2o: tanks.insert(StorageTank::new("H2O", 2_000.0).unwrap()),
        o2: tanks.insert(StorageTank::new("O2", 5_000.0).unwrap()),
    };
    let intake = AtmosphereIntakeSystem::new("Martian Atmosphere Intake", ids.co2, 100.0, 50.0, 12, &tanks).unwrap();
    let sabatier = SabatierReactor::new(
        ContainmentVessel::new(275.0, 100_000.0, 1.0).unwrap(),
        SabatierTanks {
            co2: ids.co2,
            h2: ids.h2,
            ch4: ids.ch4,
            h2o: ids.h2o,
        },
        env.temperature_c,
        env.pressure_pa,
        &tanks,
    )
    .unwrap();
    let electrolysis = ElectrolysisReactor::new(ids.h2o, ids.h2, ids.o2, &tanks).unwrap();
    IsruPlant {
        tanks,
        ids,
        power: PowerSystem::new(100.0, 500.0, 1e6, 5e5).unwrap(),
        settings: ReactorSettings::default(),
        intake,
        sabatier,
        electrolysis,
    }
}

fn seeded_run(seed: u64, years: f64) -> SimOutput {
    let mut rng = StdRng::seed_from_u64(seed);
    let env = MarsEnvironment::generate(&EnvironmentCycles::default(), years, &mut rng).unwrap();
    let mut plant = reference_plant(env, 0.0);
    let opts = SimOptions {
        total_steps: total_time_steps(years),
        ..SimOptions::default()
    };
    run_sim(&mut plant, &opts, &mut rng).unwrap()
}

#[test]
fn tenth_of_a_year_has_equal_length_columns() {
    let out = seeded_run(42, 0.1);
    assert_eq!(out.table.len(), 1648);
    let names: Vec<&str> = out.table.column_names().collect();
    assert_eq!(names, COLUMNS.to_vec());
    for column in out.table.columns() {
        assert_eq!(column.values.len(), 1648, "{}", column.name);
    }
}

#[test]
fn same_seed_same_table() {
    let a = seeded_run(7, 0.1);
    let b = seeded_run(7, 0.1);
    assert_eq!(a.table.column("hour"), b.table.column("hour"));
    assert_eq!(a.table.column("sol"), b.table.column("sol"));
    assert_eq!(a.table, b.table);
}

#[test]
fn hour_and_sol_do_not_depend_on_randomness() {
    let a = seeded_run(1, 0.05);
    let b = seeded_run(2, 0.05);
    assert_eq!(a.table.column("hour"), b.table.column("hour"));
    assert_eq!(a.table.column("sol"), b.table.column("sol"));
    let sol = a.table.column("sol").unwrap();
    assert!((sol[246] - 10.0).abs() < 1e-12);
}

#[test]
fn every_value_is_non_negative() {
    let out = seeded_run(3, 0.1);
    for column in out.table.columns() {
        for (row, v) in column.values.iter().enumerate() {
            assert!(*v >= 0.0, "{} row {} = {}", column.name, row, v);
        }
    }
}

#[test]
fn plant_makes_methane_and_oxygen() {
    let out = seeded_run(5, 0.05);
    let ch4 = out.table.column("CH4_level").unwrap();
    let o2 = out.table.column("O2_produced").unwrap();
    assert!(ch4.last().copied().unwrap_or(0.0) > 0.0);
    assert!(o2.last().copied().unwrap_or(0.0) > 0.0);
    let added: f64 = out.table.column("CO2_added").unwrap().iter().sum();
    // 12-hour intake cadence over 824 hours
    assert!(added > 0.0 && added <= 69.0 * 100.0 + 1e-9);
}

#[test]
fn first_hour_without_co2_feed_makes_no_methane() {
    let mut rng = StdRng::seed_from_u64(9);
    let env = MarsEnvironment::generate(&EnvironmentCycles::default(), 0.01, &mut rng).unwrap();
    let mut plant = reference_plant(env, 0.0);
    plant.intake.interval_hours = 1000;
    // hour 0 is still due, so skip the intake by starting from hour 1
    let step = plant.step(1, &mut rng);
    assert_eq!(step.record.ch4_level, 0.0);
    assert_eq!(step.record.co2_level, 0.0);
}

#[test]
fn progress_reaches_completion() {
    let mut rng = StdRng::seed_from_u64(11);
    let env = MarsEnvironment::generate(&EnvironmentCycles::default(), 0.01, &mut rng).unwrap();
    let total = env.len();
    let mut plant = reference_plant(env, 0.0);
    let opts = SimOptions {
        total_steps: total,
        progress_every: 50,
    };
    let mut events: Vec<SimProgress> = Vec::new();
    run_sim_with_progress(&mut plant, &opts, &mut rng, |p| events.push(*p)).unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.hour, total);
    assert_eq!(last.fraction_complete, 1.0);
    assert!(events.windows(2).all(|w| w[0].hour < w[1].hour));
}

#[test]
fn short_environment_is_rejected() {
    let mut rng = StdRng::seed_from_u64(13);
    let env = MarsEnvironment::generate(&EnvironmentCycles::default(), 0.01, &mut rng).unwrap();
    let mut plant = reference_plant(env, 0.0);
    let opts = SimOptions {
        total_steps: 10_000,
        ..SimOptions::default()
    };
    let err = run_sim(&mut plant, &opts, &mut rng).unwrap_err();
    assert!(matches!(err, SimError::SeriesTooShort { needed: 10_000, .. }));
}

#[test]
fn zero_duration_yields_empty_table() {
    let out = seeded_run(17, 0.0);
    assert!(out.table.is_empty());
    assert_eq!(out.table.columns().len(), COLUMNS.len());
}

#[test]
fn battery_column_is_read_before_electrolysis() {
    let mut env_rng = StdRng::seed_from_u64(11);
    let env = MarsEnvironment::generate(&EnvironmentCycles::default(), 0.01, &mut env_rng).unwrap();
    let mut plant = reference_plant(env, 2_000.0);
    plant.power = PowerSystem::new(1.0, 1.0, 1e6, 5e5).unwrap();

    let mut replay = plant.clone();
    let mut replay_rng = StdRng::seed_from_u64(3);
    let available_kj = replay.power.available_power(0, &mut replay_rng);
    let mut ctx = isru_components::CycleContext {
        tanks: &mut replay.tanks,
        power: &mut replay.power,
        settings: &replay.settings,
    };
    replay.intake.run_cycle(0, available_kj, &mut ctx);
    let sabatier = replay.sabatier.run_cycle(0, available_kj, &mut ctx);
    assert!(sabatier.battery_level_kj < 1e6);

    let mut rng = StdRng::seed_from_u64(3);
    let step = plant.step(0, &mut rng);
    assert_eq!(step.record.battery_level, sabatier.battery_level_kj);
    assert!(plant.power.battery_level_kj() > step.record.battery_level);
}
