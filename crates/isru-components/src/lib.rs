//! isru-components: the physical equipment of the ISRU plant.
//!
//! Provides:
//! - Storage tanks and the [`TankBank`] arena that owns them
//! - The power bus: solar array, fission reactor, battery, load shedding
//! - The containment vessel and the Sabatier, electrolysis and intake units
//!
//! Every unit runs one hourly cycle against a [`CycleContext`] borrowed from
//! the driver. Shortfalls never fail a cycle; they clamp, log and attach an
//! [`Advisory`] to the cycle outcome.
//!
//! # Example
//!
//! ```
//! use isru_components::{StorageTank, TankBank};
//!
//! let mut bank = TankBank::new();
//! let h2 = bank.insert(StorageTank::new("H2", 5000.0).unwrap().with_level(400.0).unwrap());
//! assert_eq!(bank[h2].remove(1000.0), 400.0);
//! assert_eq!(bank.level_g(h2), 0.0);
//! ```

pub mod advisory;
pub mod common;
pub mod distribution;
pub mod electrolysis;
pub mod error;
pub mod intake;
pub mod power;
pub mod sabatier;
pub mod settings;
pub mod tank;
pub mod traits;
pub mod vessel;

// Re-exports
pub use advisory::Advisory;
pub use distribution::{DistributionRecord, LoadConsumer, PowerDistributionManager};
pub use electrolysis::{ElectrolysisOutcome, ElectrolysisReactor};
pub use error::{ComponentError, ComponentResult};
pub use intake::{AtmosphereIntakeSystem, IntakeOutcome};
pub use power::{Battery, FissionReactor, PowerSystem, SolarArray};
pub use sabatier::{ReactionOutcome, SabatierOutcome, SabatierReactor, SabatierTanks};
pub use settings::ReactorSettings;
pub use tank::{StorageTank, TankBank};
pub use traits::{CycleContext, PowerConsumer, PowerProducer};
pub use vessel::{ContainmentVessel, HeatingOutcome, PressurizationOutcome};
