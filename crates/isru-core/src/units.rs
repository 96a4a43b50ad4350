// isru-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

/// Energy in kJ delivered by a source running at `power_kw` for one simulation hour.
#[inline]
pub fn hourly_energy_kj(power_kw: f64) -> f64 {
    use uom::si::energy::kilojoule;
    let energy: Energy = kw(power_kw) * hours(1.0);
    energy.get::<kilojoule>()
}

/// Absolute temperature (K) of a Celsius reading.
#[inline]
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    degc(temp_c).get::<kelvin>()
}

/// Pressure in standard atmospheres.
#[inline]
pub fn pa_to_atm(p_pa: f64) -> f64 {
    use uom::si::pressure::atmosphere;
    pa(p_pa).get::<atmosphere>()
}

pub mod constants {
    /// Universal gas constant, J/(mol·K).
    pub const GAS_CONSTANT_J_PER_MOL_K: f64 = 8.314;
    /// Specific gas constant used for the vessel atmosphere, J/(kg·K).
    pub const R_SPECIFIC_GAS_J_PER_KG_K: f64 = 287.0;
    /// Mean specific heat of the vessel gas mixture, J/(kg·K).
    pub const CP_GAS_J_PER_KG_K: f64 = 1005.0;
    /// Compression work charged per mole admitted to the vessel, kJ/mol.
    pub const COMPRESSION_KJ_PER_MOL: f64 = 1.0;
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    pub const PA_PER_ATM: f64 = 101_325.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_kilowatt_hour_is_3600_kj() {
        assert!((hourly_energy_kj(1.0) - constants::SECONDS_PER_HOUR).abs() < 1e-9);
        assert!((hourly_energy_kj(500.0) - 1_800_000.0).abs() < 1e-6);
    }

    #[test]
    fn temperature_and_pressure_conversions() {
        assert!((celsius_to_kelvin(275.0) - 548.15).abs() < 1e-9);
        assert!((pa_to_atm(constants::PA_PER_ATM) - 1.0).abs() < 1e-12);
    }
}
