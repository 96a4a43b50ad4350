//! Interval-gated CO2 capture from the Martian atmosphere.

use crate::advisory::Advisory;
use crate::common::{check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::tank::TankBank;
use crate::traits::CycleContext;
use isru_core::{TankId, safe_ratio};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntakeOutcome {
    pub co2_added_g: f64,
    pub power_used_kj: f64,
    pub advisory: Option<Advisory>,
}

/// Compressor that pulls a fixed batch of CO2 every `interval_hours`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereIntakeSystem {
    pub name: String,
    /// Grams of CO2 captured per cycle
    pub intake_rate_g: f64,
    /// Energy of one full cycle, kJ
    pub power_per_cycle_kj: f64,
    /// Hours between cycles; 1 runs every hour
    pub interval_hours: usize,
    co2: TankId,
}

impl AtmosphereIntakeSystem {
    pub fn new(
        name: impl Into<String>,
        co2: TankId,
        intake_rate_g: f64,
        power_per_cycle_kj: f64,
        interval_hours: usize,
        tanks: &TankBank,
    ) -> ComponentResult<Self> {
        tanks.ensure(co2)?;
        if interval_hours == 0 {
            return Err(ComponentError::InvalidArg {
                what: "intake interval must be at least one hour",
            });
        }
        Ok(Self {
            name: name.into(),
            intake_rate_g: check_positive(intake_rate_g, "intake rate")?,
            power_per_cycle_kj: check_non_negative(power_per_cycle_kj, "intake power per cycle")?,
            interval_hours,
            co2,
        })
    }

    pub fn co2_tank(&self) -> TankId {
        self.co2
    }

    pub fn is_due(&self, hour: usize) -> bool {
        hour % self.interval_hours == 0
    }

    /// Capture `min(rate, power-limited amount, free tank space)` grams.
    pub fn run_cycle(
        &self,
        hour: usize,
        available_kj: f64,
        ctx: &mut CycleContext<'_>,
    ) -> IntakeOutcome {
        if !self.is_due(hour) {
            return IntakeOutcome::default();
        }

        let bus_kj = available_kj.max(0.0);
        let power_limited_g = safe_ratio(bus_kj, self.power_per_cycle_kj, f64::INFINITY) * self.intake_rate_g;
        let tank = &mut ctx.tanks[self.co2];
        let amount = self
            .intake_rate_g
            .min(power_limited_g)
            .min(tank.available_capacity_g());

        if !(amount > 0.0) {
            warn!(hour, "insufficient power or tank capacity for atmosphere intake");
            let advisory = (bus_kj <= 0.0)
                .then(|| Advisory::power_shortfall(self.name.as_str(), bus_kj, self.power_per_cycle_kj));
            return IntakeOutcome {
                advisory,
                ..IntakeOutcome::default()
            };
        }

        let added = tank.add(amount);
        let power_used_kj = added / self.intake_rate_g * self.power_per_cycle_kj;
        ctx.power.manage_battery(power_used_kj, available_kj);
        info!(hour, co2_added_g = added, power_used_kj, "{} captured CO2", self.name);

        IntakeOutcome {
            co2_added_g: added,
            power_used_kj,
            advisory: None,
        }
    }
}
