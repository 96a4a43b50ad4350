//! Scenario version migration.

use crate::ProjectError;
use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 documents ran the intake every hour.
fn migrate_v0_to_v1(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    if scenario.intake.interval_hours == 0 {
        scenario.intake.interval_hours = 1;
    }
    scenario.version = 1;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v0_zero_interval_becomes_hourly() {
        let mut s = Scenario::default();
        s.version = 0;
        s.intake.interval_hours = 0;
        let s = migrate_to_latest(s).unwrap();
        assert_eq!(s.version, LATEST_VERSION);
        assert_eq!(s.intake.interval_hours, 1);
    }

    #[test]
    fn latest_is_untouched() {
        let s = Scenario::default();
        assert_eq!(migrate_to_latest(s.clone()).unwrap(), s);
    }
}
