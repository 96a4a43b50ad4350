//! Power generation and storage: solar array, fission reactor, battery.
//!
//! [`PowerSystem`] is the plant bus used by the hourly loop. It samples its
//! producers once per hour through [`PowerSystem::available_power`] and keeps
//! the only battery, mutated solely through [`PowerSystem::manage_battery`].

use crate::common::{
    LOAD_SHEDDING_THRESHOLD, check_efficiency, check_fraction, check_non_negative, check_positive,
};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::PowerProducer;
use isru_core::hourly_energy_kj;
use isru_core::mars::{hour_of_day, seasonal_modifier};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::{debug, warn};

/// Energy store with asymmetric charge/discharge losses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Battery {
    capacity_kj: f64,
    level_kj: f64,
    /// Fraction of surplus energy actually stored
    pub charge_efficiency: f64,
    /// Fraction of drawn energy actually delivered
    pub discharge_efficiency: f64,
    /// Capacity lost per [`Battery::update_degradation`] call
    pub degradation_rate: f64,
}

impl Battery {
    /// Create a battery with 0.90 charge and 0.92 discharge efficiency.
    pub fn new(capacity_kj: f64, level_kj: f64) -> ComponentResult<Self> {
        let capacity_kj = check_positive(capacity_kj, "battery capacity")?;
        let level_kj = check_non_negative(level_kj, "battery level")?;
        if level_kj > capacity_kj {
            return Err(ComponentError::InvalidArg {
                what: "battery level exceeds capacity",
            });
        }
        Ok(Self {
            capacity_kj,
            level_kj,
            charge_efficiency: 0.90,
            discharge_efficiency: 0.92,
            degradation_rate: 0.0,
        })
    }

    pub fn with_efficiencies(mut self, charge: f64, discharge: f64) -> ComponentResult<Self> {
        self.charge_efficiency = check_efficiency(charge, "battery charge efficiency")?;
        self.discharge_efficiency = check_efficiency(discharge, "battery discharge efficiency")?;
        Ok(self)
    }

    pub fn with_degradation(mut self, rate: f64) -> ComponentResult<Self> {
        self.degradation_rate = check_fraction(rate, "battery degradation rate")?;
        Ok(self)
    }

    pub fn capacity_kj(&self) -> f64 {
        self.capacity_kj
    }

    pub fn level_kj(&self) -> f64 {
        self.level_kj
    }

    pub fn state_of_charge(&self) -> f64 {
        isru_core::safe_ratio(self.level_kj, self.capacity_kj, 0.0)
    }

    pub fn is_low(&self, threshold: f64) -> bool {
        self.level_kj < threshold * self.capacity_kj
    }

    /// Energy the battery could deliver right now if fully drained.
    pub fn deliverable_kj(&self) -> f64 {
        self.level_kj * self.discharge_efficiency
    }

    /// Store a surplus; returns the energy actually added to the level.
    pub fn charge(&mut self, surplus_kj: f64) -> f64 {
        let before = self.level_kj;
        let stored = surplus_kj.max(0.0) * self.charge_efficiency;
        self.level_kj = (self.level_kj + stored).clamp(0.0, self.capacity_kj);
        self.level_kj - before
    }

    /// Cover a deficit; returns the energy delivered to the bus.
    pub fn discharge(&mut self, deficit_kj: f64) -> f64 {
        let required = deficit_kj.max(0.0) / self.discharge_efficiency;
        let drawn = required.min(self.level_kj);
        self.level_kj = (self.level_kj - drawn).clamp(0.0, self.capacity_kj);
        drawn * self.discharge_efficiency
    }

    /// Settle one consumer's draw against the hour's generation.
    ///
    /// A surplus charges the battery, a deficit discharges it. Returns the
    /// net surplus (positive) or unmet deficit (negative) after the battery.
    pub fn manage(&mut self, used_kj: f64, generated_kj: f64) -> f64 {
        let mut surplus = generated_kj.max(0.0) - used_kj.max(0.0);
        if surplus > 0.0 {
            self.charge(surplus);
        } else {
            surplus += self.discharge(-surplus);
            if self.is_low(LOAD_SHEDDING_THRESHOLD) {
                warn!(
                    level_kj = self.level_kj,
                    capacity_kj = self.capacity_kj,
                    "battery level critically low"
                );
            }
        }
        surplus
    }

    /// Shrink capacity by one hour of wear, re-clamping the level.
    pub fn update_degradation(&mut self) {
        if self.degradation_rate > 0.0 {
            self.capacity_kj *= 1.0 - self.degradation_rate;
            self.level_kj = self.level_kj.min(self.capacity_kj);
        }
    }
}

/// Photovoltaic array with day/night, seasonal, noise and dust-storm effects.
#[derive(Debug, Clone)]
pub struct SolarArray {
    name: String,
    /// Peak electrical output in kW
    pub max_output_kw: f64,
    /// Panel efficiency after dust and aging
    pub efficiency: f64,
    /// Hours of each 24-hour day with output
    pub daylight_hours: u64,
    /// Chance per daylight hour of a dust storm
    pub dust_storm_probability: f64,
    variability: Normal<f64>,
}

impl SolarArray {
    pub fn new(name: impl Into<String>, max_output_kw: f64) -> ComponentResult<Self> {
        Ok(Self {
            name: name.into(),
            max_output_kw: check_non_negative(max_output_kw, "solar max output")?,
            efficiency: 0.85,
            daylight_hours: 10,
            dust_storm_probability: 0.0,
            variability: Self::noise(0.1)?,
        })
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> ComponentResult<Self> {
        self.efficiency = check_efficiency(efficiency, "solar efficiency")?;
        Ok(self)
    }

    pub fn with_daylight_hours(mut self, hours: u64) -> ComponentResult<Self> {
        if hours > 24 {
            return Err(ComponentError::InvalidArg {
                what: "daylight hours exceed a day",
            });
        }
        self.daylight_hours = hours;
        Ok(self)
    }

    /// Standard deviation of the multiplicative output noise.
    pub fn with_variability(mut self, std_dev: f64) -> ComponentResult<Self> {
        self.variability = Self::noise(std_dev)?;
        Ok(self)
    }

    pub fn with_dust_storms(mut self, probability: f64) -> ComponentResult<Self> {
        self.dust_storm_probability = check_fraction(probability, "dust storm probability")?;
        Ok(self)
    }

    pub fn is_daytime(&self, hour: usize) -> bool {
        hour_of_day(hour) < self.daylight_hours
    }

    fn noise(std_dev: f64) -> ComponentResult<Normal<f64>> {
        let std_dev = check_non_negative(std_dev, "solar variability")?;
        Normal::new(1.0, std_dev).map_err(|_| ComponentError::InvalidArg {
            what: "solar variability",
        })
    }
}

impl PowerProducer for SolarArray {
    fn name(&self) -> &str {
        &self.name
    }

    fn produces(&mut self, hour: usize, rng: &mut dyn RngCore) -> f64 {
        if !self.is_daytime(hour) {
            return 0.0;
        }
        let variability = self.variability.sample(rng);
        let mut dust_factor = 1.0;
        if self.dust_storm_probability > 0.0 && rng.r#gen::<f64>() < self.dust_storm_probability {
            dust_factor = rng.gen_range(0.1..0.5);
            debug!(hour, dust_factor, "dust storm over {}", self.name);
        }
        let kw = self.max_output_kw
            * seasonal_modifier(hour)
            * variability
            * self.efficiency
            * dust_factor;
        hourly_energy_kj(kw).max(0.0)
    }
}

/// Fission power unit: near-constant output with optional downtime and burnup.
#[derive(Debug, Clone, PartialEq)]
pub struct FissionReactor {
    name: String,
    /// Rated electrical output in kW
    pub max_output_kw: f64,
    /// Hours (absolute) with scheduled zero output
    pub maintenance_hours: Vec<usize>,
    /// Probability of running in any given hour
    pub operational_uptime: f64,
    /// Fractional output loss per elapsed hour
    pub burnup_rate: f64,
}

impl FissionReactor {
    pub fn new(name: impl Into<String>, max_output_kw: f64) -> ComponentResult<Self> {
        Ok(Self {
            name: name.into(),
            max_output_kw: check_non_negative(max_output_kw, "nuclear max output")?,
            maintenance_hours: Vec::new(),
            operational_uptime: 1.0,
            burnup_rate: 0.0,
        })
    }

    pub fn with_maintenance(mut self, hours: Vec<usize>) -> Self {
        self.maintenance_hours = hours;
        self
    }

    pub fn with_uptime(mut self, uptime: f64) -> ComponentResult<Self> {
        self.operational_uptime = check_fraction(uptime, "reactor uptime")?;
        Ok(self)
    }

    pub fn with_burnup(mut self, rate: f64) -> ComponentResult<Self> {
        self.burnup_rate = check_non_negative(rate, "reactor burnup rate")?;
        Ok(self)
    }
}

impl PowerProducer for FissionReactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn produces(&mut self, hour: usize, rng: &mut dyn RngCore) -> f64 {
        if self.maintenance_hours.contains(&hour) {
            debug!(hour, "{} down for scheduled maintenance", self.name);
            return 0.0;
        }
        if self.operational_uptime < 1.0 && rng.r#gen::<f64>() > self.operational_uptime {
            warn!(hour, "{} down for unscheduled maintenance", self.name);
            return 0.0;
        }
        let burnup = (1.0 - self.burnup_rate * hour as f64).max(0.0);
        let kw = rng.gen_range(0.9..1.0) * self.max_output_kw * burnup;
        hourly_energy_kj(kw).max(0.0)
    }
}

/// The plant's power bus: one solar array, one reactor, one battery.
#[derive(Debug, Clone)]
pub struct PowerSystem {
    pub solar: SolarArray,
    pub nuclear: FissionReactor,
    battery: Battery,
    last_solar_kj: f64,
    last_nuclear_kj: f64,
}

impl PowerSystem {
    /// Reference configuration: default efficiencies, no storms or downtime.
    pub fn new(
        solar_max_kw: f64,
        nuclear_max_kw: f64,
        battery_capacity_kj: f64,
        battery_level_kj: f64,
    ) -> ComponentResult<Self> {
        Ok(Self::from_parts(
            SolarArray::new("Solar Array", solar_max_kw)?,
            FissionReactor::new("Fission Reactor", nuclear_max_kw)?,
            Battery::new(battery_capacity_kj, battery_level_kj)?,
        ))
    }

    pub fn from_parts(solar: SolarArray, nuclear: FissionReactor, battery: Battery) -> Self {
        Self {
            solar,
            nuclear,
            battery,
            last_solar_kj: 0.0,
            last_nuclear_kj: 0.0,
        }
    }

    /// Energy generated during `hour`, in kJ.
    ///
    /// Draws fresh randomness, so the driver calls it once per hour and hands
    /// the result to every subsystem. Caches the per-source split.
    pub fn available_power(&mut self, hour: usize, rng: &mut dyn RngCore) -> f64 {
        self.last_solar_kj = self.solar.produces(hour, rng);
        self.last_nuclear_kj = self.nuclear.produces(hour, rng);
        debug!(
            hour,
            solar_kj = self.last_solar_kj,
            nuclear_kj = self.last_nuclear_kj,
            "power sampled"
        );
        self.last_solar_kj + self.last_nuclear_kj
    }

    /// Settle a consumer's draw against generation through the battery.
    pub fn manage_battery(&mut self, used_kj: f64, generated_kj: f64) -> f64 {
        self.battery.manage(used_kj, generated_kj)
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn battery_level_kj(&self) -> f64 {
        self.battery.level_kj()
    }

    pub fn last_solar_kj(&self) -> f64 {
        self.last_solar_kj
    }

    pub fn last_nuclear_kj(&self) -> f64 {
        self.last_nuclear_kj
    }
}
