use thiserror::Error;

pub type IsruResult<T> = Result<T, IsruError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IsruError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
