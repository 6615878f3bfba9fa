//! Barway Time-Series
//!
//! OHLCV bar resampling on Polars DataFrames:
//!
//! - **Bar resampling**: aggregate bars to a coarser frequency with per-column rules
//!   (`o` first, `h` max, `l` min, `c` last, `v` sum, everything else last)
//! - **VWAP rollup**: recompute `vwap` as Σ(vwap·v) / Σ(v) from the finer rows
//! - **Custom rules**: caller closures evaluated on the unaggregated table
//! - **Time checks and conversions**: monotonic index validation, epoch/datetime helpers
//!
//! # Examples
//!
//! ```rust,no_run
//! use polars::prelude::*;
//! use barway_timeseries::{resample_bars, ResampleConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let df = DataFrame::new(vec![
//!     // ... your OHLCV data
//! ])?;
//!
//! // Daily bars from intraday bars
//! let daily = resample_bars(&df, &ResampleConfig::new("date").with_frequency("1d"))?;
//! # Ok(())
//! # }
//! ```

mod dates;
mod error;
mod resample;
mod rules;
mod validate;
mod vwap;

pub use dates::{datetime_to_epoch, ensure_datetime, epoch_from_naive, epoch_to_datetime, naive_from_epoch};
pub use error::{TimeSeriesError, TimeSeriesResult};
pub use resample::{resample_bars, resample_ts, ResampleConfig};
pub use rules::{
    AggregationRule, BucketSpec, RuleFn, RuleSet, CLOSE, DEFAULT_TIME_COL, HIGH, LOW, OPEN, VOLUME, VWAP,
};
pub use validate::{check_monotonic, is_monotonic};
pub use vwap::{bucketed_vwap, resample_vwap};
