//! Scenario loading, saving and validation.

use std::path::Path;

use isru_project::{ProjectError, Scenario};

use crate::error::{AppError, AppResult};

/// Load, migrate and validate a scenario file (`.yaml`, `.yml` or `.json`).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    isru_project::load_scenario(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Reference plant unless a scenario file is given.
pub fn load_or_default(path: Option<&Path>) -> AppResult<Scenario> {
    match path {
        Some(p) => load_scenario(p),
        None => Ok(Scenario::default()),
    }
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    Ok(isru_project::save_scenario(path, scenario)?)
}

/// Write the reference plant to `path`, refusing to overwrite.
pub fn init_scenario(path: &Path) -> AppResult<()> {
    if path.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            path.display()
        )));
    }
    save_scenario(path, &Scenario::default())
}

pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    Ok(isru_project::validate_scenario(scenario)?)
}
