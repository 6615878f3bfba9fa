//! Error types for bar table I/O

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Temporary file could not be renamed over the destination
    #[error("Failed to persist temporary file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Destination path is unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type IoResult<T> = Result<T, IoError>;
