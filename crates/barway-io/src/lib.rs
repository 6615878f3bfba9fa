//! Barway I/O
//!
//! Load bar tables from CSV and save them atomically.
//!
//! ```rust,no_run
//! use barway_io::{read_bars_csv, write_csv_atomic, CsvConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CsvConfig::default();
//! let bars = read_bars_csv("bars_1m.csv", &config)?;
//! write_csv_atomic(&bars, "bars_copy.csv", &config)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod csv;
mod error;

pub use config::CsvConfig;
pub use csv::{read_bars_csv, write_csv_atomic};
pub use error::{IoError, IoResult};
