//! Hourly simulation of the Mars ISRU plant.
//!
//! Provides:
//! - Seeded external temperature and pressure cycles
//! - The plant arena and its fixed per-hour order:
//!   power sample, intake, Sabatier, electrolysis, record
//! - The column-oriented [`SimulationTable`] consumed by callers

pub mod environment;
pub mod error;
pub mod events;
pub mod plant;
pub mod record;
pub mod sim;

// Re-exports for public API
pub use environment::{EnvironmentCycles, MarsEnvironment};
pub use error::{SimError, SimResult};
pub use events::AdvisoryCounts;
pub use plant::{IsruPlant, PlantTanks, StepOutcome};
pub use record::{COLUMNS, Column, HourRecord, SimulationTable};
pub use sim::{SimOptions, SimOutput, SimProgress, run_sim, run_sim_with_progress};
