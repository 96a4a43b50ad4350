//! Common parameter checks shared by component constructors.

use crate::error::{ComponentError, ComponentResult};
use isru_core::numeric::ensure_finite;

/// Fraction of capacity below which a tank is flagged low.
pub const LOW_LEVEL_FRACTION: f64 = 0.1;

/// Battery fraction below which a discharge is reported as critically low.
pub const LOAD_SHEDDING_THRESHOLD: f64 = 0.1;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<f64> {
    let v = check_finite(value, what)?;
    if v <= 0.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(v)
}

/// Ensure a value is finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<f64> {
    let v = check_finite(value, what)?;
    if v < 0.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(v)
}

/// Ensure an efficiency lies in `(0, 1]`.
pub fn check_efficiency(value: f64, what: &'static str) -> ComponentResult<f64> {
    let v = check_positive(value, what)?;
    if v > 1.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(v)
}

/// Ensure a fraction lies in `[0, 1]`.
pub fn check_fraction(value: f64, what: &'static str) -> ComponentResult<f64> {
    let v = check_non_negative(value, what)?;
    if v > 1.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(v)
}
