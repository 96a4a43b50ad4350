//! External Martian conditions over the simulated horizon.
//!
//! Temperature and pressure each combine a seasonal sinusoid over the run's
//! years, a daily sinusoid with the sol period, and Gaussian noise.

use crate::error::{SimError, SimResult};
use isru_core::linspace;
use isru_core::mars::{SOL_HOURS, total_time_steps};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Shape of the temperature and pressure cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentCycles {
    pub baseline_temp_c: f64,
    pub seasonal_temp_amplitude_c: f64,
    pub daily_temp_amplitude_c: f64,
    pub temp_noise_std_c: f64,
    pub baseline_pressure_pa: f64,
    pub seasonal_pressure_amplitude_pa: f64,
    pub daily_pressure_amplitude_pa: f64,
    pub pressure_noise_std_pa: f64,
}

impl Default for EnvironmentCycles {
    fn default() -> Self {
        Self {
            baseline_temp_c: -60.0,
            seasonal_temp_amplitude_c: 30.0,
            daily_temp_amplitude_c: 40.0,
            temp_noise_std_c: 2.0,
            baseline_pressure_pa: 800.0,
            seasonal_pressure_amplitude_pa: 300.0,
            daily_pressure_amplitude_pa: 50.0,
            pressure_noise_std_pa: 10.0,
        }
    }
}

/// Hour-indexed external temperature (C) and pressure (Pa).
#[derive(Debug, Clone, PartialEq)]
pub struct MarsEnvironment {
    pub temperature_c: Vec<f64>,
    pub pressure_pa: Vec<f64>,
}

impl MarsEnvironment {
    /// Sample the cycles for `years` Martian years.
    ///
    /// Temperature noise is drawn before pressure noise.
    pub fn generate<R: Rng + ?Sized>(
        cycles: &EnvironmentCycles,
        years: f64,
        rng: &mut R,
    ) -> SimResult<Self> {
        if !years.is_finite() || years < 0.0 {
            return Err(SimError::InvalidArg {
                what: "simulated years must be finite and non-negative",
            });
        }
        let temp_noise = noise(cycles.temp_noise_std_c, "temperature noise")?;
        let pressure_noise = noise(cycles.pressure_noise_std_pa, "pressure noise")?;

        let n = total_time_steps(years);
        let seasonal = linspace(0.0, TAU * years, n);
        let daily = linspace(0.0, TAU * n as f64 / SOL_HOURS, n);

        let temperature_c: Vec<f64> = seasonal
            .iter()
            .zip(&daily)
            .map(|(s, d)| {
                cycles.baseline_temp_c
                    + cycles.seasonal_temp_amplitude_c * s.sin()
                    + cycles.daily_temp_amplitude_c * d.sin()
                    + temp_noise.sample(rng)
            })
            .collect();
        let pressure_pa: Vec<f64> = seasonal
            .iter()
            .zip(&daily)
            .map(|(s, d)| {
                cycles.baseline_pressure_pa
                    + cycles.seasonal_pressure_amplitude_pa * s.cos()
                    + cycles.daily_pressure_amplitude_pa * d.cos()
                    + pressure_noise.sample(rng)
            })
            .collect();

        Ok(Self {
            temperature_c,
            pressure_pa,
        })
    }

    pub fn len(&self) -> usize {
        self.temperature_c.len().min(self.pressure_pa.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn noise(std_dev: f64, what: &'static str) -> SimResult<Normal<f64>> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(SimError::InvalidArg { what });
    }
    Normal::new(0.0, std_dev).map_err(|_| SimError::InvalidArg { what })
}
