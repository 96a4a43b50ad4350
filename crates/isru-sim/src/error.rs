//! Error types for building and running the plant simulation.

use thiserror::Error;

/// Errors encountered while setting up or running a simulation.
///
/// Resource shortfalls inside a run are not errors; they are counted as
/// advisories. These variants cover configuration problems only.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("External condition series covers {got} hours but the run needs {needed}")]
    SeriesTooShort { needed: usize, got: usize },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Column {name} has {got} values, expected {expected}")]
    RaggedColumn {
        name: String,
        got: usize,
        expected: usize,
    },

    #[error("Component error: {message}")]
    Component { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<isru_components::ComponentError> for SimError {
    fn from(e: isru_components::ComponentError) -> Self {
        SimError::Component {
            message: e.to_string(),
        }
    }
}

impl From<isru_core::IsruError> for SimError {
    fn from(e: isru_core::IsruError) -> Self {
        SimError::Component {
            message: e.to_string(),
        }
    }
}
