//! Error type shared by the loader and the aggregators.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("source not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected column '{column}' is missing from the header")]
    SchemaMismatch { column: String },

    #[error("row {row}: cannot parse start date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: cannot parse data value '{value}'")]
    InvalidValue { row: usize, value: String },

    #[error("{operation} requires at least one record")]
    EmptyDataset { operation: &'static str },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid coordinate map: {0}")]
    Coordinates(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
