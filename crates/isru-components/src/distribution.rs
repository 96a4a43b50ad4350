//! Priority-based power distribution with load shedding.

use crate::common::{LOAD_SHEDDING_THRESHOLD, check_non_negative};
use crate::error::{ComponentError, ComponentResult};
use crate::power::Battery;
use crate::traits::{PowerConsumer, PowerProducer};
use isru_core::ConsumerId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A habitat or process load with a fixed hourly demand and a daily schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConsumer {
    pub name: String,
    pub demand_kj: f64,
    /// 1 = most critical, larger numbers are shed first
    pub criticality: u8,
    /// Hours of the 24-hour day during which the load runs
    pub operational_hours: Vec<u8>,
}

impl LoadConsumer {
    pub fn new(
        name: impl Into<String>,
        demand_kj: f64,
        criticality: u8,
        operational_hours: Vec<u8>,
    ) -> ComponentResult<Self> {
        if operational_hours.iter().any(|h| *h >= 24) {
            return Err(ComponentError::InvalidArg {
                what: "operational hour outside 0..24",
            });
        }
        Ok(Self {
            name: name.into(),
            demand_kj: check_non_negative(demand_kj, "consumer demand")?,
            criticality,
            operational_hours,
        })
    }

    /// Load running every hour of the day.
    pub fn always_on(name: impl Into<String>, demand_kj: f64, criticality: u8) -> ComponentResult<Self> {
        Self::new(name, demand_kj, criticality, (0..24).collect())
    }
}

impl PowerConsumer for LoadConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    fn demand_kj(&self, _hour: usize) -> f64 {
        self.demand_kj
    }

    fn criticality(&self) -> u8 {
        self.criticality
    }

    fn is_operational(&self, hour: usize) -> bool {
        let hour_of_day = (hour % 24) as u8;
        self.operational_hours.contains(&hour_of_day)
    }
}

/// Outcome of one hour of distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub hour: usize,
    pub total_generation_kj: f64,
    /// Demand actually served after shedding
    pub total_consumption_kj: f64,
    /// Battery state of charge after settling, in `[0, 1]`
    pub battery_soc: f64,
    /// Net surplus (positive) or unmet deficit after the battery
    pub net_kj: f64,
    /// Consumers disconnected this hour, in shedding order
    pub shed: Vec<String>,
}

/// Combines producers, a battery and prioritized consumers.
pub struct PowerDistributionManager {
    producers: Vec<Box<dyn PowerProducer>>,
    consumers: Vec<Box<dyn PowerConsumer>>,
    battery: Battery,
    records: Vec<DistributionRecord>,
}

impl PowerDistributionManager {
    pub fn new(battery: Battery) -> Self {
        Self {
            producers: Vec::new(),
            consumers: Vec::new(),
            battery,
            records: Vec::new(),
        }
    }

    pub fn add_producer(&mut self, producer: Box<dyn PowerProducer>) {
        self.producers.push(producer);
    }

    pub fn add_consumer(&mut self, consumer: Box<dyn PowerConsumer>) -> ConsumerId {
        let id = ConsumerId::from_index(self.consumers.len() as u32);
        self.consumers.push(consumer);
        id
    }

    pub fn consumer(&self, id: ConsumerId) -> Option<&dyn PowerConsumer> {
        self.consumers.get(id.slot()).map(|c| c.as_ref())
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn records(&self) -> &[DistributionRecord] {
        &self.records
    }

    /// Run one hour: generate, shed what cannot be served, settle the battery.
    ///
    /// Shedding starts at the least critical operational consumer and stops
    /// as soon as the remaining demand fits within generation plus what the
    /// battery can deliver.
    pub fn distribute_power(&mut self, hour: usize, rng: &mut dyn RngCore) -> &DistributionRecord {
        let generation: f64 = self
            .producers
            .iter_mut()
            .map(|p| p.produces(hour, rng))
            .sum();

        let mut operational: Vec<&dyn PowerConsumer> = self
            .consumers
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| c.is_operational(hour))
            .collect();
        let mut demand: f64 = operational.iter().map(|c| c.demand_kj(hour)).sum();

        let deliverable = generation + self.battery.deliverable_kj();
        let mut shed = Vec::new();
        if demand > deliverable {
            operational.sort_by(|a, b| b.criticality().cmp(&a.criticality()));
            for consumer in &operational {
                if demand <= deliverable {
                    break;
                }
                info!(hour, consumer = consumer.name(), "load shedding initiated");
                demand -= consumer.demand_kj(hour);
                shed.push(consumer.name().to_string());
            }
            demand = demand.max(0.0);
        }

        let net_kj = self.battery.manage(demand, generation);
        if self.battery.is_low(LOAD_SHEDDING_THRESHOLD) && !shed.is_empty() {
            warn!(hour, shed = shed.len(), "battery low with loads shed");
        }
        let battery_soc = self.battery.state_of_charge();
        self.battery.update_degradation();

        self.records.push(DistributionRecord {
            hour,
            total_generation_kj: generation,
            total_consumption_kj: demand,
            battery_soc,
            net_kj,
            shed,
        });
        let last = self.records.len() - 1;
        &self.records[last]
    }

    /// Whether `name` was shed during `hour`.
    pub fn is_subsystem_shed(&self, name: &str, hour: usize) -> bool {
        self.records
            .iter()
            .find(|r| r.hour == hour)
            .is_some_and(|r| r.shed.iter().any(|s| s == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::FissionReactor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixed(f64);

    impl PowerProducer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn produces(&mut self, _hour: usize, _rng: &mut dyn RngCore) -> f64 {
            self.0
        }
    }

    fn manager(generation: f64, battery_level: f64) -> PowerDistributionManager {
        let battery = Battery::new(1000.0, battery_level).unwrap();
        let mut pdm = PowerDistributionManager::new(battery);
        pdm.add_producer(Box::new(Fixed(generation)));
        pdm
    }

    #[test]
    fn everything_served_when_generation_covers_demand() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pdm = manager(500.0, 0.0);
        pdm.add_consumer(Box::new(LoadConsumer::always_on("life", 200.0, 1).unwrap()));
        let rec = pdm.distribute_power(0, &mut rng).clone();
        assert!(rec.shed.is_empty());
        assert_eq!(rec.total_consumption_kj, 200.0);
        assert!((pdm.battery().level_kj() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn least_critical_shed_first() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pdm = manager(100.0, 0.0);
        pdm.add_consumer(Box::new(LoadConsumer::always_on("life", 80.0, 1).unwrap()));
        pdm.add_consumer(Box::new(LoadConsumer::always_on("comms", 50.0, 2).unwrap()));
        pdm.add_consumer(Box::new(LoadConsumer::always_on("science", 50.0, 3).unwrap()));
        let rec = pdm.distribute_power(3, &mut rng).clone();
        assert_eq!(rec.shed, vec!["science".to_string(), "comms".to_string()]);
        assert_eq!(rec.total_consumption_kj, 80.0);
        assert!(pdm.is_subsystem_shed("comms", 3));
        assert!(!pdm.is_subsystem_shed("life", 3));
        assert!(!pdm.is_subsystem_shed("comms", 4));
    }

    #[test]
    fn battery_reserve_avoids_shedding() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pdm = manager(100.0, 1000.0);
        pdm.add_consumer(Box::new(LoadConsumer::always_on("heater", 300.0, 3).unwrap()));
        let rec = pdm.distribute_power(0, &mut rng).clone();
        assert!(rec.shed.is_empty());
        assert!(rec.net_kj.abs() < 1e-9);
    }

    #[test]
    fn schedule_gates_demand() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pdm = manager(0.0, 0.0);
        pdm.add_producer(Box::new(FissionReactor::new("n", 0.0).unwrap()));
        let id = pdm.add_consumer(Box::new(
            LoadConsumer::new("comms", 50.0, 2, (8..20).collect()).unwrap(),
        ));
        assert!(!pdm.consumer(id).unwrap().is_operational(3));
        let rec = pdm.distribute_power(3, &mut rng).clone();
        assert_eq!(rec.total_consumption_kj, 0.0);
        assert!(rec.shed.is_empty());
        let rec = pdm.distribute_power(10, &mut rng).clone();
        assert_eq!(rec.shed, vec!["comms".to_string()]);
    }

    #[test]
    fn rejects_hour_outside_day() {
        assert!(LoadConsumer::new("x", 1.0, 1, vec![24]).is_err());
    }
}
