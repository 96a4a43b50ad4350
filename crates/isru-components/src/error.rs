//! Error types for component construction.
//!
//! Hourly cycles never fail on resource shortfalls; those are reported as
//! [`Advisory`](crate::Advisory) values. Errors here are configuration
//! problems caught when a component is built.

use isru_core::error::IsruError;
use thiserror::Error;

/// Errors that can occur while configuring plant equipment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown tank: {what}")]
    UnknownTank { what: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<IsruError> for ComponentError {
    fn from(e: IsruError) -> Self {
        match e {
            IsruError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            IsruError::InvalidArg { what } => ComponentError::InvalidArg { what },
        }
    }
}

impl From<ComponentError> for IsruError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => IsruError::InvalidArg { what },
            ComponentError::InvalidArg { what } => IsruError::InvalidArg { what },
            ComponentError::UnknownTank { .. } => IsruError::InvalidArg {
                what: "unknown tank",
            },
        }
    }
}
