//! isru-results: run cache, table storage and export.

pub mod export;
pub mod hash;
pub mod store;
pub mod types;

pub use export::{column_to_csv, table_to_csv, write_table_csv};
pub use hash::compute_run_id;
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
