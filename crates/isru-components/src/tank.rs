//! Bounded single-species reservoirs and the arena that owns them.

use crate::common::{LOW_LEVEL_FRACTION, check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use isru_core::TankId;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use tracing::warn;

/// A reservoir of one chemical species, tracked in grams.
///
/// `0 <= level <= capacity` holds after every mutation. Overflow and
/// over-draw are clamped and logged, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageTank {
    name: String,
    capacity_g: f64,
    level_g: f64,
    is_low: bool,
}

impl StorageTank {
    /// Create an empty tank.
    pub fn new(name: impl Into<String>, capacity_g: f64) -> ComponentResult<Self> {
        let capacity_g = check_positive(capacity_g, "tank capacity")?;
        let mut tank = Self {
            name: name.into(),
            capacity_g,
            level_g: 0.0,
            is_low: false,
        };
        tank.refresh_low_flag();
        Ok(tank)
    }

    /// Set the initial fill level.
    pub fn with_level(mut self, level_g: f64) -> ComponentResult<Self> {
        let level_g = check_non_negative(level_g, "tank level")?;
        if level_g > self.capacity_g {
            return Err(ComponentError::InvalidArg {
                what: "tank level exceeds capacity",
            });
        }
        self.level_g = level_g;
        self.refresh_low_flag();
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_g(&self) -> f64 {
        self.capacity_g
    }

    pub fn level_g(&self) -> f64 {
        self.level_g
    }

    /// True while the level sits below 10% of capacity.
    pub fn is_low(&self) -> bool {
        self.is_low
    }

    /// Free space in grams. Pure query.
    pub fn available_capacity_g(&self) -> f64 {
        (self.capacity_g - self.level_g).max(0.0)
    }

    /// Level as a fraction of capacity.
    pub fn fill_fraction(&self) -> f64 {
        isru_core::safe_ratio(self.level_g, self.capacity_g, 0.0)
    }

    /// Add up to `amount_g`; any excess over capacity is discarded.
    ///
    /// Returns the grams actually stored. Non-positive or NaN amounts are ignored.
    pub fn add(&mut self, amount_g: f64) -> f64 {
        if !(amount_g > 0.0) {
            return 0.0;
        }
        let room = self.available_capacity_g();
        if amount_g > room {
            warn!(
                tank = %self.name,
                discarded_g = amount_g - room,
                "{} tank is full, cannot add more",
                self.name
            );
        }
        let added = amount_g.min(room);
        self.level_g = (self.level_g + added).min(self.capacity_g);
        self.refresh_low_flag();
        added
    }

    /// Remove up to `amount_g`, never driving the level below zero.
    ///
    /// Returns the grams actually removed, which callers must use for any
    /// downstream accounting.
    pub fn remove(&mut self, amount_g: f64) -> f64 {
        if !(amount_g > 0.0) {
            return 0.0;
        }
        if amount_g > self.level_g {
            warn!(
                tank = %self.name,
                requested_g = amount_g,
                available_g = self.level_g,
                "attempting to remove more than available in the {} tank",
                self.name
            );
        }
        let removed = amount_g.min(self.level_g);
        self.level_g = (self.level_g - removed).max(0.0);
        self.refresh_low_flag();
        if self.is_low {
            warn!(
                tank = %self.name,
                level_g = self.level_g,
                "{} tank is almost empty",
                self.name
            );
        }
        removed
    }

    fn refresh_low_flag(&mut self) {
        self.is_low = self.level_g < LOW_LEVEL_FRACTION * self.capacity_g;
    }
}

/// Arena owning every tank of a plant.
///
/// Subsystems keep [`TankId`] handles and borrow the bank per cycle, so the
/// single writer in any instant is whoever the driver is currently running.
#[derive(Debug, Clone, Default)]
pub struct TankBank {
    tanks: Vec<StorageTank>,
}

impl TankBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a tank into the bank and return its handle.
    pub fn insert(&mut self, tank: StorageTank) -> TankId {
        let id = TankId::from_index(self.tanks.len() as u32);
        self.tanks.push(tank);
        id
    }

    pub fn get(&self, id: TankId) -> Option<&StorageTank> {
        self.tanks.get(id.slot())
    }

    pub fn get_mut(&mut self, id: TankId) -> Option<&mut StorageTank> {
        self.tanks.get_mut(id.slot())
    }

    /// Handle of the first tank with the given name.
    pub fn find(&self, name: &str) -> Option<TankId> {
        self.tanks
            .iter()
            .position(|t| t.name == name)
            .map(|i| TankId::from_index(i as u32))
    }

    /// Fail unless `id` refers to a tank in this bank.
    pub fn ensure(&self, id: TankId) -> ComponentResult<()> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(ComponentError::UnknownTank {
                what: format!("{id:?} (bank holds {} tanks)", self.tanks.len()),
            })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TankId, &StorageTank)> {
        self.tanks
            .iter()
            .enumerate()
            .map(|(i, t)| (TankId::from_index(i as u32), t))
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    /// Level of a tank, 0 for an unknown handle.
    pub fn level_g(&self, id: TankId) -> f64 {
        self.get(id).map(StorageTank::level_g).unwrap_or(0.0)
    }
}

impl Index<TankId> for TankBank {
    type Output = StorageTank;

    fn index(&self, id: TankId) -> &StorageTank {
        &self.tanks[id.slot()]
    }
}

impl IndexMut<TankId> for TankBank {
    fn index_mut(&mut self, id: TankId) -> &mut StorageTank {
        &mut self.tanks[id.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2() -> StorageTank {
        StorageTank::new("H2", 5000.0)
            .unwrap()
            .with_level(400.0)
            .unwrap()
    }

    #[test]
    fn add_clamps_at_capacity() {
        let mut t = h2();
        let added = t.add(10_000.0);
        assert_eq!(added, 4600.0);
        assert_eq!(t.level_g(), 5000.0);
        assert_eq!(t.available_capacity_g(), 0.0);
    }

    #[test]
    fn over_draw_returns_prior_level() {
        let mut t = h2();
        let removed = t.remove(1000.0);
        assert_eq!(removed, 400.0);
        assert_eq!(t.level_g(), 0.0);
        assert!(t.is_low());
    }

    #[test]
    fn low_flag_tracks_level() {
        let mut t = StorageTank::new("CO2", 1000.0).unwrap();
        assert!(t.is_low());
        t.add(200.0);
        assert!(!t.is_low());
        t.remove(150.0);
        assert!(t.is_low());
    }

    #[test]
    fn negative_and_nan_amounts_are_ignored() {
        let mut t = h2();
        assert_eq!(t.add(-5.0), 0.0);
        assert_eq!(t.remove(f64::NAN), 0.0);
        assert_eq!(t.level_g(), 400.0);
    }

    #[test]
    fn available_capacity_is_a_pure_query() {
        let t = h2();
        let before = t.clone();
        let _ = t.available_capacity_g();
        let _ = t.available_capacity_g();
        assert_eq!(t, before);
    }

    #[test]
    fn construction_rejects_bad_parameters() {
        assert!(StorageTank::new("X", 0.0).is_err());
        assert!(StorageTank::new("X", f64::NAN).is_err());
        assert!(StorageTank::new("X", 10.0).unwrap().with_level(11.0).is_err());
        assert!(StorageTank::new("X", 10.0).unwrap().with_level(-1.0).is_err());
    }

    #[test]
    fn bank_hands_out_stable_ids() {
        let mut bank = TankBank::new();
        let a = bank.insert(StorageTank::new("CO2", 10.0).unwrap());
        let b = bank.insert(h2());
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.find("H2"), Some(b));
        assert_eq!(bank[a].name(), "CO2");
        bank[b].remove(100.0);
        assert_eq!(bank.level_g(b), 300.0);
        assert!(bank.ensure(TankId::from_index(7)).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(f64),
        Remove(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-100.0_f64..5_000.0).prop_map(Op::Add),
            (-100.0_f64..5_000.0).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn level_stays_within_bounds(
            capacity in 1.0_f64..10_000.0,
            ops in prop::collection::vec(op(), 0..64),
        ) {
            let mut tank = StorageTank::new("T", capacity).unwrap();
            for op in ops {
                let before = tank.level_g();
                match op {
                    Op::Add(a) => {
                        let added = tank.add(a);
                        prop_assert!(added >= 0.0);
                        prop_assert!((tank.level_g() - (before + added)).abs() < 1e-9);
                    }
                    Op::Remove(a) => {
                        let removed = tank.remove(a);
                        prop_assert!(removed >= 0.0 && removed <= before + 1e-12);
                    }
                }
                prop_assert!(tank.level_g() >= 0.0);
                prop_assert!(tank.level_g() <= tank.capacity_g());
                prop_assert_eq!(tank.is_low(), tank.level_g() < 0.1 * tank.capacity_g());
            }
        }
    }
}
