//! Error types for barway-timeseries

use thiserror::Error;

/// Result type for time-series operations
pub type TimeSeriesResult<T> = Result<T, TimeSeriesError>;

/// Error types for time-series operations
#[derive(Error, Debug)]
pub enum TimeSeriesError {
    /// Polars error, including malformed frequency tokens
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Missing column error
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Invalid time column
    #[error("Invalid time column: {0}")]
    InvalidTimeColumn(String),

    /// Time column decreases at `row`
    #[error("Time column '{column}' is not sorted ascending (row {row} precedes its predecessor)")]
    UnsortedIndex { column: String, row: usize },

    /// Time column holds a null at `row`
    #[error("Time column '{column}' has a null timestamp at row {row}")]
    NullTimestamp { column: String, row: usize },

    /// A custom aggregation rule returned an unusable frame
    #[error("Invalid aggregation rule for '{column}': {reason}")]
    InvalidRule { column: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
