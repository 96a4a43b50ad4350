//! isru-core: stable foundation for the ISRU plant simulator.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real + tolerances + float guards)
//! - ids (compact handles into entity arenas)
//! - mars (calendar: sols, years, seasonal phase)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod mars;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{IsruError, IsruResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
