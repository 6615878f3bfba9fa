//! Job configuration: JSON file values overlaid by command-line flags

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use barway_io::CsvConfig;
use barway_timeseries::{AggregationRule, ResampleConfig, DEFAULT_TIME_COL};
use polars::prelude::TimeUnit;
use serde::{Deserialize, Serialize};

/// Resampling job as stored in a `--config` file
///
/// ```json
/// {
///   "time_col": "date",
///   "frequency": "1d",
///   "rules": { "c": "max", "vwap": "vwap" },
///   "epoch_unit": "ms",
///   "csv": { "delimiter": 44 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub time_col: Option<String>,
    pub frequency: Option<String>,
    /// Column → verb (first, last, max, min, sum, mean, vwap)
    pub rules: BTreeMap<String, String>,
    /// Unit of integer epoch time columns ("ms", "us", "ns"); unset keeps integers as-is
    pub epoch_unit: Option<String>,
    pub csv: CsvConfig,
}

impl JobConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading job config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing job config {}", path.display()))
    }

    pub fn time_col(&self) -> &str {
        self.time_col.as_deref().unwrap_or(DEFAULT_TIME_COL)
    }

    pub fn epoch_unit(&self) -> anyhow::Result<Option<TimeUnit>> {
        let unit = match self.epoch_unit.as_deref() {
            None => return Ok(None),
            Some("ms") => TimeUnit::Milliseconds,
            Some("us") => TimeUnit::Microseconds,
            Some("ns") => TimeUnit::Nanoseconds,
            Some(other) => bail!("unknown epoch unit '{other}' (expected ms, us or ns)"),
        };
        Ok(Some(unit))
    }

    pub fn resample_config(&self) -> anyhow::Result<ResampleConfig> {
        let mut config = ResampleConfig::new(self.time_col());
        if let Some(frequency) = &self.frequency {
            config = config.with_frequency(frequency.clone());
        }
        for (column, verb) in &self.rules {
            let rule: AggregationRule = verb
                .parse()
                .with_context(|| format!("rule for column '{column}'"))?;
            config = config.with_rule(column.clone(), rule);
        }
        Ok(config)
    }
}

/// Split `COL=VERB`, checking the verb is known
pub fn parse_rule_arg(arg: &str) -> Result<(String, String), String> {
    let (column, verb) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected COL=VERB, got '{arg}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("empty column name in '{arg}'"));
    }
    verb.parse::<AggregationRule>().map_err(|e| e.to_string())?;
    Ok((column.to_string(), verb.trim().to_ascii_lowercase()))
}
