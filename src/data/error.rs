use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a [`Dataset`](super::model::Dataset).
///
/// Loading is all-or-nothing: the first bad row aborts the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading Parquet batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("column '{found}' must be spelled '{expected}'")]
    MisCasedColumn { found: String, expected: &'static str },

    #[error("unexpected column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: &'static str,
        found: String,
        expected: &'static str,
    },

    #[error("row {row}: '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: '{column}' value '{value}' is not a finite number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: '{value}' is not a recognised date")]
    InvalidDate { row: usize, value: String },
}

/// Raised by bound and distinct-value queries on a dataset with zero rows.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("dataset has no rows")]
pub struct EmptyDatasetError;
