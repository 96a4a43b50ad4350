//! Habitat load shedding against the scenario's power system.

use isru_app::{AppError, run_power_budget};
use isru_project::{LoadDef, Scenario};

#[test]
fn reference_loads_are_never_shed() {
    let report = run_power_budget(&Scenario::default(), 48, 9).expect("power budget");
    assert_eq!(report.records.len(), 48);
    assert!(report.shed_hours.is_empty());
    assert!((0.0..=1.0).contains(&report.final_battery_soc));
}

#[test]
fn least_critical_load_is_shed_first() {
    let mut scenario = Scenario::default();
    scenario.power.solar_max_kw = 0.0;
    scenario.power.nuclear_max_kw = 0.0;
    scenario.power.battery_level_kj = 0.0;
    scenario.loads = vec![
        LoadDef {
            name: "Life Support".to_string(),
            demand_kj: 10.0,
            criticality: 1,
            operational_hours: (0..24).collect(),
        },
        LoadDef {
            name: "Science".to_string(),
            demand_kj: 10.0,
            criticality: 3,
            operational_hours: (0..24).collect(),
        },
    ];

    let report = run_power_budget(&scenario, 5, 1).expect("power budget");
    assert_eq!(report.shed_hours.get("Science"), Some(&5));
    assert_eq!(report.shed_hours.get("Life Support"), Some(&5));
    for record in &report.records {
        assert_eq!(record.shed.first().map(String::as_str), Some("Science"));
        assert_eq!(record.total_consumption_kj, 0.0);
    }
}

#[test]
fn zero_hours_is_invalid() {
    assert!(matches!(
        run_power_budget(&Scenario::default(), 0, 1),
        Err(AppError::InvalidInput(_))
    ));
}
