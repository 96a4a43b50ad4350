//! Sabatier methanation: `CO2 + 4 H2 -> CH4 + 2 H2O`.
//!
//! Each cycle decays the catalyst, conditions the vessel, derives an
//! operating efficiency from Arrhenius temperature and pressure effects, and
//! reacts the limiting reactant at that efficiency.

use crate::advisory::Advisory;
use crate::common::{check_efficiency, check_fraction, check_non_negative};
use crate::error::{ComponentError, ComponentResult};
use crate::settings::ReactorSettings;
use crate::tank::TankBank;
use crate::traits::CycleContext;
use crate::vessel::ContainmentVessel;
use isru_core::constants::GAS_CONSTANT_J_PER_MOL_K;
use isru_core::{TankId, celsius_to_kelvin, pa_to_atm, safe_ratio, unit_clamp};
use tracing::{debug, info, warn};

/// Handles of the four tanks the reactor reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SabatierTanks {
    pub co2: TankId,
    pub h2: TankId,
    pub ch4: TankId,
    pub h2o: TankId,
}

/// Mass balance of one reaction step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactionOutcome {
    pub moles_reacted: f64,
    pub co2_consumed_g: f64,
    pub h2_consumed_g: f64,
    pub ch4_produced_g: f64,
    pub h2o_produced_g: f64,
}

/// Everything one hourly cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct SabatierOutcome {
    pub ch4_produced_g: f64,
    pub h2o_produced_g: f64,
    pub heating_kj: f64,
    pub pressurization_kj: f64,
    /// Energy settled against the battery for the reaction step
    pub power_used_kj: f64,
    /// Catalyst efficiency before environmental effects
    pub catalyst_efficiency: f64,
    /// Efficiency actually applied to the limiting reactant
    pub adjusted_efficiency: f64,
    pub internal_temp_c: f64,
    pub internal_pressure_pa: f64,
    pub battery_level_kj: f64,
    pub advisories: Vec<Advisory>,
}

impl SabatierOutcome {
    /// Heating plus pressurization energy spent this hour.
    pub fn conditioning_kj(&self) -> f64 {
        self.heating_kj + self.pressurization_kj
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SabatierReactor {
    /// Fresh-catalyst efficiency
    pub base_efficiency: f64,
    /// Exponential decay per operating hour
    pub degradation_rate: f64,
    /// Below this the catalyst is replaced
    pub min_operational_efficiency: f64,
    pub activation_energy_kj: f64,
    pub vessel: ContainmentVessel,
    tanks: SabatierTanks,
    temperature_cycle_c: Vec<f64>,
    pressure_cycle_pa: Vec<f64>,
    current_efficiency: f64,
    installed_hour: usize,
    catalyst_replacements: u32,
}

impl SabatierReactor {
    /// Reactor with a 0.9 efficient catalyst decaying at 1e-4 per hour.
    pub fn new(
        vessel: ContainmentVessel,
        tanks: SabatierTanks,
        temperature_cycle_c: Vec<f64>,
        pressure_cycle_pa: Vec<f64>,
        bank: &TankBank,
    ) -> ComponentResult<Self> {
        for id in [tanks.co2, tanks.h2, tanks.ch4, tanks.h2o] {
            bank.ensure(id)?;
        }
        if temperature_cycle_c.iter().chain(&pressure_cycle_pa).any(|v| !v.is_finite()) {
            return Err(ComponentError::NonPhysical {
                what: "external condition series",
            });
        }
        Ok(Self {
            base_efficiency: 0.9,
            degradation_rate: 1e-4,
            min_operational_efficiency: 0.1,
            activation_energy_kj: 50.0,
            vessel,
            tanks,
            temperature_cycle_c,
            pressure_cycle_pa,
            current_efficiency: 0.9,
            installed_hour: 0,
            catalyst_replacements: 0,
        })
    }

    pub fn with_catalyst(mut self, base_efficiency: f64, degradation_rate: f64) -> ComponentResult<Self> {
        self.base_efficiency = check_efficiency(base_efficiency, "catalyst efficiency")?;
        self.degradation_rate = check_non_negative(degradation_rate, "catalyst degradation rate")?;
        self.current_efficiency = self.base_efficiency;
        Ok(self)
    }

    pub fn with_min_efficiency(mut self, min: f64) -> ComponentResult<Self> {
        self.min_operational_efficiency = check_fraction(min, "minimum operational efficiency")?;
        Ok(self)
    }

    pub fn with_activation_energy(mut self, kj_per_mol: f64) -> ComponentResult<Self> {
        self.activation_energy_kj = check_non_negative(kj_per_mol, "activation energy")?;
        Ok(self)
    }

    pub fn tanks(&self) -> SabatierTanks {
        self.tanks
    }

    pub fn current_efficiency(&self) -> f64 {
        self.current_efficiency
    }

    pub fn installed_hour(&self) -> usize {
        self.installed_hour
    }

    pub fn catalyst_replacements(&self) -> u32 {
        self.catalyst_replacements
    }

    /// Number of hours covered by both external condition series.
    pub fn series_len(&self) -> usize {
        self.temperature_cycle_c.len().min(self.pressure_cycle_pa.len())
    }

    /// External temperature and pressure for `hour`.
    ///
    /// Hours past the end of the series hold the last sample.
    pub fn external_conditions(&self, hour: usize) -> (f64, f64) {
        let sample = |series: &[f64], fallback: f64| {
            series.get(hour).or(series.last()).copied().unwrap_or(fallback)
        };
        (
            sample(&self.temperature_cycle_c, self.vessel.internal_temp_c()),
            sample(&self.pressure_cycle_pa, self.vessel.internal_pressure_pa()),
        )
    }

    /// Arrhenius rate at `temp_c` relative to the rate at the vessel target.
    ///
    /// 1 at target, below 1 when colder, above 1 when hotter.
    pub fn temp_factor(&self, temp_c: f64) -> f64 {
        let temp_k = celsius_to_kelvin(temp_c);
        let target_k = celsius_to_kelvin(self.vessel.target_temp_c);
        if temp_k <= 0.0 || target_k <= 0.0 {
            return 0.0;
        }
        let ea_over_r = self.activation_energy_kj * 1000.0 / GAS_CONSTANT_J_PER_MOL_K;
        (ea_over_r * (1.0 / target_k - 1.0 / temp_k)).exp()
    }

    /// Current over target pressure, clamped to `[0, 1]`.
    pub fn pressure_factor(&self, pressure_pa: f64) -> f64 {
        unit_clamp(safe_ratio(
            pa_to_atm(pressure_pa),
            pa_to_atm(self.vessel.target_pressure_pa),
            0.0,
        ))
    }

    /// Decay the catalyst to `hour`, replacing it when it falls below the floor.
    fn age_catalyst(&mut self, hour: usize) -> Option<Advisory> {
        let elapsed = hour.saturating_sub(self.installed_hour) as f64;
        let decayed = (self.base_efficiency * (-self.degradation_rate * elapsed).exp()).max(0.0);
        if decayed < self.min_operational_efficiency {
            warn!(hour, efficiency = decayed, "catalyst efficiency too low, replacing catalyst");
            self.installed_hour = hour;
            self.catalyst_replacements += 1;
            self.current_efficiency = self.base_efficiency;
            return Some(Advisory::EfficiencyCollapse {
                efficiency: decayed,
                restored_to: self.base_efficiency,
            });
        }
        self.current_efficiency = decayed;
        None
    }

    /// React the limiting reactant at `efficiency` and store the products.
    pub fn process_reaction(
        &self,
        efficiency: f64,
        tanks: &mut TankBank,
        settings: &ReactorSettings,
    ) -> ReactionOutcome {
        let co2_mol = tanks.level_g(self.tanks.co2) / settings.molar_mass_co2;
        let h2_mol = tanks.level_g(self.tanks.h2) / settings.molar_mass_h2 / 4.0;
        let target_mol = (co2_mol.min(h2_mol) * unit_clamp(efficiency)).max(0.0);
        if !(target_mol > 0.0) {
            return ReactionOutcome::default();
        }

        let co2_consumed_g = tanks[self.tanks.co2].remove(target_mol * settings.molar_mass_co2);
        let h2_consumed_g = tanks[self.tanks.h2].remove(target_mol * 4.0 * settings.molar_mass_h2);
        let moles_reacted = (co2_consumed_g / settings.molar_mass_co2)
            .min(h2_consumed_g / (4.0 * settings.molar_mass_h2));

        let ch4_produced_g = moles_reacted * settings.molar_mass_ch4;
        let h2o_produced_g = moles_reacted * 2.0 * settings.molar_mass_h2o;
        tanks[self.tanks.ch4].add(ch4_produced_g);
        tanks[self.tanks.h2o].add(h2o_produced_g);
        info!(ch4_g = ch4_produced_g, h2o_g = h2o_produced_g, "Sabatier reactor produced CH4");

        ReactionOutcome {
            moles_reacted,
            co2_consumed_g,
            h2_consumed_g,
            ch4_produced_g,
            h2o_produced_g,
        }
    }

    /// One hour of operation against the hour's sampled generation.
    pub fn run_cycle(
        &mut self,
        hour: usize,
        available_kj: f64,
        ctx: &mut CycleContext<'_>,
    ) -> SabatierOutcome {
        let mut advisories = Vec::new();
        advisories.extend(self.age_catalyst(hour));
        debug!(hour, efficiency = self.current_efficiency, "Sabatier cycle");

        let (external_temp_c, external_pressure_pa) = self.external_conditions(hour);
        let heating = self
            .vessel
            .adjust_temperature(external_temp_c, hour, ctx.power, available_kj);
        let pressurization = self.vessel.adjust_pressure(hour, ctx.power, available_kj);
        advisories.extend(heating.advisory.clone());
        advisories.extend(pressurization.advisory.clone());
        debug!(hour, external_temp_c, external_pressure_pa, "vessel conditioned");

        let temp_effect = self.temp_factor(heating.internal_temp_c);
        let pressure_effect = self.pressure_factor(pressurization.internal_pressure_pa);
        let mut adjusted = unit_clamp(self.current_efficiency * temp_effect * pressure_effect);

        let needed_kj = heating.energy_used_kj + pressurization.energy_used_kj;
        let bus_kj = available_kj.max(0.0);
        let power_used_kj = if bus_kj >= needed_kj {
            needed_kj
        } else {
            adjusted *= safe_ratio(bus_kj, needed_kj, 0.0);
            warn!(hour, available_kj = bus_kj, needed_kj, "scaled down Sabatier operation due to limited power");
            advisories.push(Advisory::power_shortfall("sabatier", bus_kj, needed_kj));
            bus_kj
        };

        let reaction = self.process_reaction(adjusted, ctx.tanks, ctx.settings);
        if reaction.moles_reacted == 0.0 {
            for (id, resource) in [(self.tanks.co2, "CO2"), (self.tanks.h2, "H2")] {
                if ctx.tanks.level_g(id) <= 0.0 {
                    advisories.push(Advisory::depleted(resource));
                }
            }
        }
        ctx.power.manage_battery(power_used_kj, available_kj);

        SabatierOutcome {
            ch4_produced_g: reaction.ch4_produced_g,
            h2o_produced_g: reaction.h2o_produced_g,
            heating_kj: heating.energy_used_kj,
            pressurization_kj: pressurization.energy_used_kj,
            power_used_kj,
            catalyst_efficiency: self.current_efficiency,
            adjusted_efficiency: adjusted,
            internal_temp_c: self.vessel.internal_temp_c(),
            internal_pressure_pa: self.vessel.internal_pressure_pa(),
            battery_level_kj: ctx.power.battery_level_kj(),
            advisories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::PowerSystem;
    use crate::tank::StorageTank;
    use isru_core::{Tolerances, nearly_equal};

    struct Rig {
        bank: TankBank,
        power: PowerSystem,
        settings: ReactorSettings,
        reactor: SabatierReactor,
    }

    fn rig(co2_g: f64, h2_g: f64) -> Rig {
        let mut bank = TankBank::new();
        let tanks = SabatierTanks {
            co2: bank.insert(StorageTank::new("CO2", 10_000.0).unwrap().with_level(co2_g).unwrap()),
            h2: bank.insert(StorageTank::new("H2", 5_000.0).unwrap().with_level(h2_g).unwrap()),
            ch4: bank.insert(StorageTank::new("CH4", 3_000.0).unwrap()),
            h2o: bank.insert(StorageTank::new("H2O", 2_000.0).unwrap()),
        };
        let vessel = ContainmentVessel::new(275.0, 100_000.0, 1.0).unwrap();
        let reactor = SabatierReactor::new(vessel, tanks, vec![-60.0; 48], vec![800.0; 48], &bank).unwrap();
        Rig {
            bank,
            power: PowerSystem::new(100.0, 500.0, 1e6, 5e5).unwrap(),
            settings: ReactorSettings::default(),
            reactor,
        }
    }

    #[test]
    fn temp_factor_is_one_at_target() {
        let r = rig(0.0, 0.0);
        assert!((r.reactor.temp_factor(275.0) - 1.0).abs() < 1e-12);
        assert!(r.reactor.temp_factor(100.0) < 1.0);
        assert!(r.reactor.temp_factor(400.0) > 1.0);
    }

    #[test]
    fn pressure_factor_clamps() {
        let r = rig(0.0, 0.0);
        assert!((r.reactor.pressure_factor(50_000.0) - 0.5).abs() < 1e-12);
        assert_eq!(r.reactor.pressure_factor(200_000.0), 1.0);
        assert_eq!(r.reactor.pressure_factor(-1.0), 0.0);
    }

    #[test]
    fn hydrogen_limited_reaction_balances_atoms() {
        let mut r = rig(1_000.0, 40.0);
        let s = r.settings.clone();
        let out = r.reactor.process_reaction(1.0, &mut r.bank, &s);
        let h2_mol = 40.0 / s.molar_mass_h2;
        assert!((out.moles_reacted - h2_mol / 4.0).abs() < 1e-9);

        let co2_mol = out.co2_consumed_g / s.molar_mass_co2;
        let h2_used_mol = out.h2_consumed_g / s.molar_mass_h2;
        let ch4_mol = out.ch4_produced_g / s.molar_mass_ch4;
        let h2o_mol = out.h2o_produced_g / s.molar_mass_h2o;
        let tol = Tolerances::default();
        // carbon, hydrogen, oxygen
        assert!(nearly_equal(co2_mol, ch4_mol, tol));
        assert!(nearly_equal(2.0 * h2_used_mol, 4.0 * ch4_mol + 2.0 * h2o_mol, tol));
        assert!(nearly_equal(2.0 * co2_mol, h2o_mol, tol));

        assert!((r.bank.level_g(r.reactor.tanks().co2) - (1_000.0 - ch4_mol * s.molar_mass_co2)).abs() < 1e-9);
        assert!(r.bank.level_g(r.reactor.tanks().h2).abs() < 1e-9);
    }

    #[test]
    fn output_scales_with_limiting_reactant() {
        let s = ReactorSettings::default();
        let mut a = rig(44.01, 5_000.0);
        let mut b = rig(88.02, 5_000.0);
        let out_a = a.reactor.process_reaction(0.5, &mut a.bank, &s);
        let out_b = b.reactor.process_reaction(0.5, &mut b.bank, &s);
        assert!((out_b.ch4_produced_g - 2.0 * out_a.ch4_produced_g).abs() < 1e-9);
        assert!((out_a.ch4_produced_g - 0.5 * s.molar_mass_ch4).abs() < 1e-9);
    }

    #[test]
    fn no_co2_means_no_methane() {
        let mut r = rig(0.0, 400.0);
        let mut ctx = CycleContext {
            tanks: &mut r.bank,
            power: &mut r.power,
            settings: &r.settings,
        };
        let out = r.reactor.run_cycle(0, 2e6, &mut ctx);
        assert_eq!(out.ch4_produced_g, 0.0);
        assert!(out.advisories.contains(&Advisory::depleted("CO2")));
        assert_eq!(r.bank.level_g(r.reactor.tanks().h2), 400.0);
    }

    #[test]
    fn catalyst_is_replaced_below_floor() {
        let mut r = rig(0.0, 0.0);
        r.reactor = r.reactor.clone().with_catalyst(0.9, 0.5).unwrap();
        let mut ctx = CycleContext {
            tanks: &mut r.bank,
            power: &mut r.power,
            settings: &r.settings,
        };
        let first = r.reactor.run_cycle(0, 2e6, &mut ctx);
        assert!((first.catalyst_efficiency - 0.9).abs() < 1e-12);
        // 0.9 * exp(-0.5 * 5) < 0.1
        let out = r.reactor.run_cycle(5, 2e6, &mut ctx);
        assert_eq!(out.catalyst_efficiency, 0.9);
        assert!(out.advisories.iter().any(|a| matches!(a, Advisory::EfficiencyCollapse { .. })));
        assert_eq!(r.reactor.installed_hour(), 5);
        assert_eq!(r.reactor.catalyst_replacements(), 1);
        let later = r.reactor.run_cycle(6, 2e6, &mut ctx);
        assert!((later.catalyst_efficiency - 0.9 * (-0.5_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn power_shortfall_derates_the_reaction() {
        let mut r = rig(1_000.0, 400.0);
        let mut ctx = CycleContext {
            tanks: &mut r.bank,
            power: &mut r.power,
            settings: &r.settings,
        };
        let out = r.reactor.run_cycle(0, 1.0, &mut ctx);
        assert!(out.conditioning_kj() > out.power_used_kj);
        assert_eq!(out.power_used_kj, 1.0);
        assert!(out.advisories.iter().any(|a| matches!(a, Advisory::PowerShortfall { subsystem, .. } if subsystem == "sabatier")));
        assert!(out.adjusted_efficiency >= 0.0 && out.adjusted_efficiency <= 1.0);
    }
}
