//! Command-line interface

use std::path::{Path, PathBuf};

use anyhow::Context;
use barway_io::{read_bars_csv, write_csv_atomic};
use barway_timeseries::{check_monotonic, ensure_datetime, resample_bars};
use clap::{Args, Parser, Subcommand};
use polars::prelude::*;
use tracing::info;

use crate::config::{parse_rule_arg, JobConfig};

/// Barway - resample OHLCV bar tables to coarser frequencies.
#[derive(Debug, Parser)]
#[command(name = "barway")]
#[command(version)]
#[command(about = "Resample OHLCV bar tables stored as CSV")]
#[command(long_about = None)]
pub struct Cli {
    /// Verbosity level (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resample a CSV bar table and write the result atomically
    Resample(ResampleArgs),

    /// Check that the time column is sorted and free of nulls
    Check(CheckArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Path to the CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Time column name [default: date]
    #[arg(long)]
    pub time_col: Option<String>,

    /// JSON job configuration; its CSV dialect and epoch unit apply
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CheckArgs {
    /// Job configuration from `--config` (if any) with `--time-col` applied
    pub fn job(&self) -> anyhow::Result<JobConfig> {
        let mut job = load_job(self.config.as_deref())?;
        if let Some(time_col) = &self.time_col {
            job.time_col = Some(time_col.clone());
        }
        Ok(job)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ResampleArgs {
    /// Path to the input CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path of the CSV file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target frequency (e.g. 5m, 1h, 1d); omitted means pass-through
    #[arg(short, long)]
    pub freq: Option<String>,

    /// Time column name [default: date]
    #[arg(long)]
    pub time_col: Option<String>,

    /// Per-column rule COL=VERB (first, last, max, min, sum, mean, vwap); repeatable
    #[arg(short, long = "rule", value_parser = parse_rule_arg)]
    pub rules: Vec<(String, String)>,

    /// JSON job configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ResampleArgs {
    /// Job configuration from `--config` (if any) overlaid with the flags
    pub fn job(&self) -> anyhow::Result<JobConfig> {
        let mut job = load_job(self.config.as_deref())?;

        if let Some(freq) = &self.freq {
            job.frequency = Some(freq.clone());
        }
        if let Some(time_col) = &self.time_col {
            job.time_col = Some(time_col.clone());
        }
        for (column, verb) in &self.rules {
            job.rules.insert(column.clone(), verb.clone());
        }

        Ok(job)
    }
}

fn load_job(path: Option<&Path>) -> anyhow::Result<JobConfig> {
    match path {
        Some(path) => JobConfig::from_file(path),
        None => Ok(JobConfig::default()),
    }
}

/// Run the parsed command
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Resample(args) => run_resample(args),
        Commands::Check(args) => run_check(args),
    }
}

/// Load, resample and atomically write one bar table
pub fn run_resample(args: &ResampleArgs) -> anyhow::Result<()> {
    let job = args.job()?;
    let config = job.resample_config()?;

    let bars = read_bars_csv(&args.input, &job.csv)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!(path = %args.input.display(), rows = bars.height(), "loaded bars");

    let bars = if config.frequency.is_some() {
        prepare_time_column(bars, &job)?
    } else {
        bars
    };

    let resampled = resample_bars(&bars, &config).with_context(|| match &config.frequency {
        Some(freq) => format!("resampling {} to {freq}", args.input.display()),
        None => format!("passing through {}", args.input.display()),
    })?;

    write_csv_atomic(&resampled, &args.output, &job.csv)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        rows = resampled.height(),
        frequency = config.frequency.as_deref().unwrap_or("none"),
        "wrote bars"
    );

    Ok(())
}

/// Validate the time column of a CSV bar table
pub fn run_check(args: &CheckArgs) -> anyhow::Result<()> {
    let job = args.job()?;
    let input = &args.input;

    let bars = read_bars_csv(input, &job.csv)
        .with_context(|| format!("reading {}", input.display()))?;
    let bars = prepare_time_column(bars, &job)?;

    check_monotonic(&bars, job.time_col())
        .with_context(|| format!("checking {}", input.display()))?;
    info!(path = %input.display(), rows = bars.height(), "time column is sorted");
    Ok(())
}

/// String timestamps are always parsed; integer epochs only when a unit is configured
fn prepare_time_column(bars: DataFrame, job: &JobConfig) -> anyhow::Result<DataFrame> {
    let time_col = job.time_col();
    let Some(dtype) = bars.column(time_col).ok().map(|c| c.dtype().clone()) else {
        // resample_bars reports the missing column
        return Ok(bars);
    };

    let converted = match (&dtype, job.epoch_unit()?) {
        (DataType::String, unit) => {
            ensure_datetime(&bars, time_col, unit.unwrap_or(TimeUnit::Microseconds))?
        }
        (dtype, Some(unit)) if dtype.is_integer() => ensure_datetime(&bars, time_col, unit)?,
        _ => bars,
    };
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from([
            "barway", "resample", "-i", "in.csv", "-o", "out.csv", "--freq", "1d", "-r", "c=max", "-r",
            "v=sum",
        ])
        .unwrap();

        let Commands::Resample(args) = cli.command else {
            panic!("expected resample");
        };
        assert_eq!(args.freq.as_deref(), Some("1d"));
        assert_eq!(args.rules.len(), 2);
        assert_eq!(args.rules[0], ("c".to_string(), "max".to_string()));
    }

    #[test]
    fn test_unknown_verb_rejected_at_parse() {
        let cli = Cli::try_parse_from(["barway", "resample", "-i", "a", "-o", "b", "-r", "c=bogus"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["barway", "-v", "check", "-i", "bars.csv"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.job().unwrap().time_col(), "date");
    }

    #[test]
    fn test_check_uses_job_csv_dialect() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bars.csv");
        let job = dir.path().join("job.json");
        std::fs::write(
            &input,
            "ts;c\n2024-03-04 09:30:00;1.0\n2024-03-04 09:31:00;2.0\n",
        )
        .unwrap();
        std::fs::write(&job, r#"{"time_col": "ts", "csv": {"delimiter": 59}}"#).unwrap();

        let cli = Cli::try_parse_from([
            "barway",
            "check",
            "-i",
            input.to_str().unwrap(),
            "-c",
            job.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();

        let without_config = CheckArgs {
            input,
            time_col: Some("ts".to_string()),
            config: None,
        };
        assert!(run_check(&without_config).is_err());
    }

    #[test]
    fn test_flags_override_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(&path, r#"{"frequency": "1h", "time_col": "ts", "rules": {"c": "last"}}"#).unwrap();

        let args = ResampleArgs {
            input: "in.csv".into(),
            output: "out.csv".into(),
            freq: Some("1d".to_string()),
            time_col: None,
            rules: vec![("c".to_string(), "max".to_string())],
            config: Some(path),
        };

        let job = args.job().unwrap();
        assert_eq!(job.frequency.as_deref(), Some("1d"));
        assert_eq!(job.time_col(), "ts");
        assert_eq!(job.rules.get("c").map(String::as_str), Some("max"));
    }
}
