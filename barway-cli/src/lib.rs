//! Barway command-line front end
//!
//! `barway resample` loads a CSV bar table, resamples it with
//! [`barway_timeseries::resample_bars`] and writes the result atomically.

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::{run, run_check, run_resample, CheckArgs, Cli, Commands, ResampleArgs};
pub use config::JobConfig;
pub use logging::{init_tracing, LogConfig};
