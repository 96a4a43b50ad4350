//! Query helpers for extracting data from loaded runs.

use isru_sim::SimulationTable;

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and data.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub hour_range: (f64, f64),
    pub sol_range: (f64, f64),
    pub record_count: usize,
    pub column_count: usize,
}

pub fn get_run_summary(table: &SimulationTable) -> AppResult<RunSummary> {
    if table.is_empty() {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    }

    let range = |name: &str| -> AppResult<(f64, f64)> {
        let values = table.require(name)?;
        Ok((
            values.first().copied().unwrap_or(0.0),
            values.last().copied().unwrap_or(0.0),
        ))
    };

    Ok(RunSummary {
        hour_range: range("hour")?,
        sol_range: range("sol")?,
        record_count: table.len(),
        column_count: table.columns().len(),
    })
}

pub fn list_columns(table: &SimulationTable) -> Vec<String> {
    table.column_names().map(str::to_string).collect()
}

/// `(hour, value)` pairs for one column.
pub fn extract_series(table: &SimulationTable, column: &str) -> AppResult<Vec<(f64, f64)>> {
    let hours = table.require("hour")?;
    let values = table.column(column).ok_or_else(|| {
        AppError::InvalidInput(format!("Unknown column: {}", column))
    })?;
    Ok(hours.iter().copied().zip(values.iter().copied()).collect())
}
