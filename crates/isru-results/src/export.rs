//! CSV export of simulation tables.

use crate::{ResultsError, ResultsResult};
use isru_sim::SimulationTable;
use std::io::Write;
use std::path::Path;

fn write_csv<W: Write>(wtr: W, table: &SimulationTable, columns: &[&str]) -> ResultsResult<()> {
    let series = columns
        .iter()
        .map(|name| {
            table.column(name).ok_or_else(|| ResultsError::UnknownColumn {
                name: (*name).to_string(),
            })
        })
        .collect::<ResultsResult<Vec<&[f64]>>>()?;

    let mut wtr = csv::Writer::from_writer(wtr);
    wtr.write_record(columns)?;
    for row in 0..table.len() {
        wtr.write_record(series.iter().map(|s| s[row].to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Whole table, one row per hour, header in column order.
pub fn table_to_csv(table: &SimulationTable) -> ResultsResult<String> {
    let names: Vec<&str> = table.column_names().collect();
    let mut buf = Vec::new();
    write_csv(&mut buf, table, &names)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_table_csv(path: &Path, table: &SimulationTable) -> ResultsResult<()> {
    let names: Vec<&str> = table.column_names().collect();
    let file = std::fs::File::create(path)?;
    write_csv(file, table, &names)
}

/// A single column against the `hour` axis.
pub fn column_to_csv(table: &SimulationTable, column: &str) -> ResultsResult<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table, &["hour", column])?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use isru_sim::HourRecord;

    fn table() -> SimulationTable {
        let mut t = SimulationTable::new();
        for hour in 0..3 {
            t.push(&HourRecord {
                co2_level: 100.0 * hour as f64,
                hour: hour as f64,
                ..HourRecord::default()
            });
        }
        t
    }

    #[test]
    fn header_follows_column_order() {
        let csv = table_to_csv(&table()).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.starts_with("CO2_level,H2_level"));
        assert!(header.ends_with("hour,sol"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn single_column_export() {
        let csv = column_to_csv(&table(), "CO2_level").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "hour,CO2_level");
        assert_eq!(lines[2], "1,100");
    }

    #[test]
    fn unknown_column_is_an_error() {
        assert!(matches!(
            column_to_csv(&table(), "nope"),
            Err(ResultsError::UnknownColumn { .. })
        ));
    }
}
