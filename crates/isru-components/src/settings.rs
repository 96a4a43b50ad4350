//! Physical constants shared by the reactors.

use serde::{Deserialize, Serialize};

/// Molar masses (g/mol) and reaction energies (kJ/mol).
///
/// Built once per run and shared by reference; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorSettings {
    pub molar_mass_co2: f64,
    pub molar_mass_h2: f64,
    pub molar_mass_ch4: f64,
    pub molar_mass_h2o: f64,
    pub molar_mass_o2: f64,
    /// Energy per mole of CH4 formed, kJ/mol.
    pub energy_per_mole_ch4: f64,
    /// Energy to split one mole of H2O, kJ/mol.
    pub energy_per_mole_h2o: f64,
}

impl Default for ReactorSettings {
    fn default() -> Self {
        Self {
            molar_mass_co2: 44.01,
            molar_mass_h2: 2.016,
            molar_mass_ch4: 16.04,
            molar_mass_h2o: 18.015,
            molar_mass_o2: 32.0,
            energy_per_mole_ch4: 165.0,
            energy_per_mole_h2o: 285.8,
        }
    }
}

impl ReactorSettings {
    pub fn validate(&self) -> crate::ComponentResult<()> {
        use crate::common::check_positive;
        check_positive(self.molar_mass_co2, "molar_mass_co2")?;
        check_positive(self.molar_mass_h2, "molar_mass_h2")?;
        check_positive(self.molar_mass_ch4, "molar_mass_ch4")?;
        check_positive(self.molar_mass_h2o, "molar_mass_h2o")?;
        check_positive(self.molar_mass_o2, "molar_mass_o2")?;
        check_positive(self.energy_per_mole_ch4, "energy_per_mole_ch4")?;
        check_positive(self.energy_per_mole_h2o, "energy_per_mole_h2o")?;
        Ok(())
    }
}
