//! Integration tests wiring the equipment together the way the plant does.

use isru_components::{
    Advisory, AtmosphereIntakeSystem, ContainmentVessel, CycleContext, ElectrolysisReactor,
    PowerSystem, ReactorSettings, SabatierReactor, SabatierTanks, StorageTank, TankBank,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Plant {
    bank: TankBank,
    power: PowerSystem,
    settings: ReactorSettings,
    intake: AtmosphereIntakeSystem,
    sabatier: SabatierReactor,
    electrolysis: ElectrolysisReactor,
}

fn reference_plant(co2_g: f64) -> Plant {
    let mut bank = TankBank::new();
    let co2 = bank.insert(StorageTank::new("CO2", 10_000.0).unwrap().with_level(co2_g).unwrap());
    let h2 = bank.insert(StorageTank::new("H2", 5_000.0).unwrap().with_level(400.0).unwrap());
    let ch4 = bank.insert(StorageTank::new("CH4", 3_000.0).unwrap());
    let h2o = bank.insert(StorageTank::new("H2O", 2_000.0).unwrap());
    let o2 = bank.insert(StorageTank::new("O2", 5_000.0).unwrap());

    let intake = AtmosphereIntakeSystem::new("Martian Atmosphere Intake", co2, 100.0, 50.0, 12, &bank).unwrap();
    let vessel = ContainmentVessel::new(275.0, 100_000.0, 1.0).unwrap();
    let sabatier = SabatierReactor::new(
        vessel,
        SabatierTanks { co2, h2, ch4, h2o },
        vec![-60.0; 24],
        vec![800.0; 24],
        &bank,
    )
    .unwrap();
    let electrolysis = ElectrolysisReactor::new(h2o, h2, o2, &bank).unwrap();

    Plant {
        bank,
        power: PowerSystem::new(100.0, 500.0, 1e6, 5e5).unwrap(),
        settings: ReactorSettings::default(),
        intake,
        sabatier,
        electrolysis,
    }
}

#[test]
fn sabatier_without_co2_makes_no_methane() {
    let mut plant = reference_plant(0.0);
    let mut rng = StdRng::seed_from_u64(7);
    let available = plant.power.available_power(0, &mut rng);
    let mut ctx = CycleContext {
        tanks: &mut plant.bank,
        power: &mut plant.power,
        settings: &plant.settings,
    };
    let out = plant.sabatier.run_cycle(0, available, &mut ctx);
    assert_eq!(out.ch4_produced_g, 0.0);
    assert_eq!(out.h2o_produced_g, 0.0);
    assert!(out.advisories.contains(&Advisory::depleted("CO2")));
}

#[test]
fn one_day_of_hourly_cycles_keeps_tanks_bounded() {
    let mut plant = reference_plant(2_000.0);
    let mut rng = StdRng::seed_from_u64(11);
    let mut methane = 0.0;
    for hour in 0..24 {
        let available = plant.power.available_power(hour, &mut rng);
        let mut ctx = CycleContext {
            tanks: &mut plant.bank,
            power: &mut plant.power,
            settings: &plant.settings,
        };
        plant.intake.run_cycle(hour, available, &mut ctx);
        methane += plant.sabatier.run_cycle(hour, available, &mut ctx).ch4_produced_g;
        plant.electrolysis.run_cycle(hour, available, &mut ctx);

        for (_, tank) in plant.bank.iter() {
            assert!(tank.level_g() >= 0.0 && tank.level_g() <= tank.capacity_g());
        }
        let battery = plant.power.battery();
        assert!(battery.level_kj() >= 0.0 && battery.level_kj() <= battery.capacity_kj());
    }
    assert!(methane > 0.0);
    let ch4 = plant.bank.find("CH4").unwrap();
    assert!(plant.bank.level_g(ch4) > 0.0);
}

#[test]
fn electrolysis_feeds_hydrogen_back() {
    let mut plant = reference_plant(2_000.0);
    let h2 = plant.bank.find("H2").unwrap();
    let mut ctx = CycleContext {
        tanks: &mut plant.bank,
        power: &mut plant.power,
        settings: &plant.settings,
    };
    plant.sabatier.run_cycle(0, 2e6, &mut ctx);
    let h2_after_reaction = ctx.tanks.level_g(h2);
    let out = plant.electrolysis.run_cycle(0, 2e6, &mut ctx);
    assert!(out.h2_produced_g > 0.0);
    assert!(ctx.tanks.level_g(h2) > h2_after_reaction);
}
