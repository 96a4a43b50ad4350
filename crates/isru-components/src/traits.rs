//! Capability traits at the power seam.
//!
//! Producers turn an hour index into delivered energy; consumers declare what
//! they would draw and when. Stochastic producers take the run's random
//! source explicitly so seeded runs are reproducible.

use rand::RngCore;

/// Anything that delivers energy to the plant bus.
pub trait PowerProducer {
    /// Producer name for diagnostics and reports.
    fn name(&self) -> &str;

    /// Energy delivered during `hour`, in kJ (never negative).
    ///
    /// Each call draws fresh randomness; call at most once per hour.
    fn produces(&mut self, hour: usize, rng: &mut dyn RngCore) -> f64;
}

/// A scheduled load on the plant bus.
pub trait PowerConsumer {
    /// Consumer name for diagnostics and load-shedding reports.
    fn name(&self) -> &str;

    /// Energy the consumer draws during an hour it operates, in kJ.
    fn demand_kj(&self, hour: usize) -> f64;

    /// 1 = most critical; larger numbers are shed first.
    fn criticality(&self) -> u8;

    /// Whether the consumer runs during `hour`.
    fn is_operational(&self, hour: usize) -> bool;
}

/// Mutable plant state borrowed by a subsystem for one cycle.
///
/// The driver owns the tanks, the power bus and the settings; a subsystem
/// only sees them through this view while it runs.
pub struct CycleContext<'a> {
    pub tanks: &'a mut crate::tank::TankBank,
    pub power: &'a mut crate::power::PowerSystem,
    pub settings: &'a crate::settings::ReactorSettings,
}
