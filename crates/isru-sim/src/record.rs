//! Per-hour metrics and the column-oriented result table.

use crate::error::{SimError, SimResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Column names of a simulation table, in output order.
pub const COLUMNS: [&str; 20] = [
    "CO2_level",
    "H2_level",
    "CH4_level",
    "H2O_level",
    "O2_level",
    "battery_level",
    "power_demand",
    "H2_produced",
    "O2_produced",
    "CO2_added",
    "intake_power_demand",
    "electrolysis_power_demand",
    "sabatier_power_demand",
    "internal_temp_c",
    "internal_pressure_pa",
    "catalyst_efficiency",
    "solar_power_generated",
    "nuclear_power_generated",
    "hour",
    "sol",
];

/// One simulated hour, as recorded after all subsystems ran.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HourRecord {
    pub co2_level: f64,
    pub h2_level: f64,
    pub ch4_level: f64,
    pub h2o_level: f64,
    pub o2_level: f64,
    /// Battery level after the Sabatier cycle, before electrolysis, kJ
    pub battery_level: f64,
    pub power_demand: f64,
    pub h2_produced: f64,
    /// O2 tank level (cumulative stock), g
    pub o2_produced: f64,
    pub co2_added: f64,
    pub intake_power_demand: f64,
    pub electrolysis_power_demand: f64,
    pub sabatier_power_demand: f64,
    pub internal_temp_c: f64,
    pub internal_pressure_pa: f64,
    /// Exponentially decayed catalyst efficiency used this hour,
    /// not the linear `base * (1 - rate * hour)` figure
    pub catalyst_efficiency: f64,
    pub solar_power_generated: f64,
    pub nuclear_power_generated: f64,
    pub hour: f64,
    pub sol: f64,
}

impl HourRecord {
    /// Values in [`COLUMNS`] order.
    pub fn values(&self) -> [f64; 20] {
        [
            self.co2_level,
            self.h2_level,
            self.ch4_level,
            self.h2o_level,
            self.o2_level,
            self.battery_level,
            self.power_demand,
            self.h2_produced,
            self.o2_produced,
            self.co2_added,
            self.intake_power_demand,
            self.electrolysis_power_demand,
            self.sabatier_power_demand,
            self.internal_temp_c,
            self.internal_pressure_pa,
            self.catalyst_efficiency,
            self.solar_power_generated,
            self.nuclear_power_generated,
            self.hour,
            self.sol,
        ]
    }
}

/// A named series of per-hour values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Append-only, column-oriented run output.
///
/// Serializes as a JSON object `{ column: [values...] }` keeping column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationTable {
    columns: Vec<Column>,
}

impl Default for SimulationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationTable {
    /// Empty table with the standard columns.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(rows: usize) -> Self {
        Self {
            columns: COLUMNS
                .iter()
                .map(|name| Column {
                    name: (*name).to_string(),
                    values: Vec::with_capacity(rows),
                })
                .collect(),
        }
    }

    /// Build from explicit columns; all must have equal length.
    pub fn from_columns(columns: Vec<Column>) -> SimResult<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for c in &columns {
                if c.values.len() != expected {
                    return Err(SimError::RaggedColumn {
                        name: c.name.clone(),
                        got: c.values.len(),
                        expected,
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn push(&mut self, record: &HourRecord) {
        for (column, value) in self.columns.iter_mut().zip(record.values()) {
            column.values.push(value);
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Like [`SimulationTable::column`], but an unknown name is an error.
    pub fn require(&self, name: &str) -> SimResult<&[f64]> {
        self.column(name).ok_or_else(|| SimError::UnknownColumn {
            name: name.to_string(),
        })
    }

    /// Values of row `index` in column order.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[index]).collect())
    }
}

impl Serialize for SimulationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for c in &self.columns {
            map.serialize_entry(&c.name, &c.values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SimulationTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SimulationTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut columns = Vec::new();
                while let Some((name, values)) = access.next_entry::<String, Vec<f64>>()? {
                    columns.push(Column { name, values });
                }
                SimulationTable::from_columns(columns).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hour: usize) -> HourRecord {
        HourRecord {
            co2_level: 100.0,
            hour: hour as f64,
            sol: isru_core::mars::sol_of(hour),
            ..HourRecord::default()
        }
    }

    #[test]
    fn columns_keep_contract_order() {
        let table = SimulationTable::new();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, COLUMNS.to_vec());
        assert_eq!(names.first(), Some(&"CO2_level"));
        assert_eq!(names.last(), Some(&"sol"));
    }

    #[test]
    fn push_grows_every_column() {
        let mut table = SimulationTable::new();
        table.push(&record(0));
        table.push(&record(1));
        assert_eq!(table.len(), 2);
        assert!(table.columns().iter().all(|c| c.values.len() == 2));
        assert_eq!(table.column("hour"), Some(&[0.0, 1.0][..]));
        assert_eq!(table.row(1).map(|r| r[0]), Some(100.0));
        assert!(table.require("nope").is_err());
    }

    #[test]
    fn json_preserves_column_order() {
        let mut table = SimulationTable::new();
        table.push(&record(3));
        let json = serde_json::to_string(&table).unwrap();
        let co2 = json.find("\"CO2_level\"").unwrap();
        let sol = json.find("\"sol\"").unwrap();
        assert!(co2 < sol);
        let back: SimulationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn ragged_columns_rejected() {
        let err = SimulationTable::from_columns(vec![
            Column { name: "a".into(), values: vec![1.0] },
            Column { name: "b".into(), values: vec![] },
        ]);
        assert!(matches!(err, Err(SimError::RaggedColumn { .. })));
    }
}
