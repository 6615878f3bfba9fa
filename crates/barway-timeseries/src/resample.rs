//! Bar resampling to a coarser frequency

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{TimeSeriesError, TimeSeriesResult};
use crate::rules::{AggregationRule, BucketSpec, RuleSet, DEFAULT_TIME_COL};
use crate::validate::check_monotonic;

/// Configuration for bar resampling
#[derive(Debug, Clone)]
pub struct ResampleConfig {
    /// Time column name
    pub time_col: String,

    /// Target frequency (e.g., "1m", "5m", "1h", "1d"); `None` disables resampling
    pub frequency: Option<String>,

    /// Caller rules, taking precedence over the per-column defaults
    pub rules: RuleSet,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_COL)
    }
}

impl ResampleConfig {
    /// Create a new resample configuration
    pub fn new(time_col: impl Into<String>) -> Self {
        Self {
            time_col: time_col.into(),
            frequency: None,
            rules: RuleSet::new(),
        }
    }

    /// Set the target frequency
    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    /// Add or replace the rule for a column
    pub fn with_rule(mut self, column: impl Into<String>, rule: AggregationRule) -> Self {
        self.rules.insert(column, rule);
        self
    }

    /// Bucket specification, `None` when no frequency is set
    pub fn bucket_spec(&self) -> Option<BucketSpec> {
        self.frequency
            .as_ref()
            .map(|frequency| BucketSpec::new(self.time_col.clone(), frequency.clone()))
    }
}

/// Resample OHLCV bars to the configured frequency
///
/// Defaults per column: `o` first, `h` max, `l` min, `c` last, `v` sum,
/// `vwap` volume-weighted from `vwap` and `v`, everything else last.
/// Buckets without rows are dropped, as are buckets where every batched
/// column aggregated to null. Custom rules are evaluated on the unaggregated
/// input and joined onto the surviving buckets.
///
/// # Example
/// ```rust,no_run
/// use polars::prelude::*;
/// use barway_timeseries::{resample_bars, AggregationRule, ResampleConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let df = DataFrame::new(vec![
///     // 1-minute bars with date, o, h, l, c, v, vwap
/// ])?;
///
/// let config = ResampleConfig::new("date")
///     .with_frequency("5m")
///     .with_rule("c", AggregationRule::Mean);
///
/// let resampled = resample_bars(&df, &config)?;
/// # Ok(())
/// # }
/// ```
pub fn resample_bars(df: &DataFrame, config: &ResampleConfig) -> TimeSeriesResult<DataFrame> {
    let Some(spec) = config.bucket_spec() else {
        return Ok(df.clone());
    };
    let time_col = spec.time_col.as_str();

    if df.column(time_col).is_err() {
        return Err(TimeSeriesError::MissingColumn(time_col.to_string()));
    }
    check_monotonic(df, time_col)?;

    if df.height() == 0 {
        return Ok(df.clone());
    }

    let plan = RulePlan::build(df, time_col, &config.rules)?;

    let bars = spec.aggregate(df, plan.batched)?;
    let mut bars = drop_empty_buckets(bars, time_col)?;

    for (name, rule) in &plan.deferred {
        let Some(values) = rule.apply(name, df, &spec)? else {
            debug!(column = %name, "rule produced no values, column skipped");
            continue;
        };
        bars = join_rule_output(bars, values, time_col, name)?;
    }

    let bars = restore_column_order(bars, df, time_col)?;

    debug!(
        rows_in = df.height(),
        rows_out = bars.height(),
        frequency = %spec.frequency,
        "resampled bars"
    );

    Ok(bars)
}

/// Resample every non-time column of a series with the same rule
pub fn resample_ts(
    df: &DataFrame,
    time_col: &str,
    frequency: &str,
    rule: &AggregationRule,
) -> TimeSeriesResult<DataFrame> {
    let mut config = ResampleConfig::new(time_col).with_frequency(frequency);
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name != time_col {
            config = config.with_rule(name, rule.clone());
        }
    }

    resample_bars(df, &config)
}

/// Split of the rule set into one batched aggregation and per-column custom passes
struct RulePlan {
    batched: Vec<Expr>,
    deferred: Vec<(String, AggregationRule)>,
}

impl RulePlan {
    fn build(df: &DataFrame, time_col: &str, overrides: &RuleSet) -> TimeSeriesResult<Self> {
        let mut plan = Self {
            batched: Vec::new(),
            deferred: Vec::new(),
        };

        for column in df.get_columns() {
            let name = column.name().as_str();
            if name == time_col {
                continue;
            }
            let rule = overrides
                .get(name)
                .cloned()
                .unwrap_or_else(|| AggregationRule::default_for(name));
            plan.push(name, rule);
        }

        for (name, rule) in overrides.iter() {
            if name == time_col {
                return Err(TimeSeriesError::InvalidConfig(format!(
                    "cannot aggregate the time column '{time_col}'"
                )));
            }
            if df.column(name).is_ok() {
                continue;
            }
            if !rule.is_custom() {
                return Err(TimeSeriesError::MissingColumn(name.to_string()));
            }
            plan.push(name, rule.clone());
        }

        Ok(plan)
    }

    fn push(&mut self, name: &str, rule: AggregationRule) {
        match rule.to_expr(name) {
            Some(expr) => self.batched.push(expr),
            None => self.deferred.push((name.to_string(), rule)),
        }
    }
}

/// Drop buckets where every aggregated column is null or NaN
fn drop_empty_buckets(bars: DataFrame, time_col: &str) -> TimeSeriesResult<DataFrame> {
    let mut keep: Option<BooleanChunked> = None;

    for column in bars.get_columns() {
        if column.name().as_str() == time_col {
            continue;
        }
        let series = column.as_materialized_series();
        let mut present = series.is_not_null();
        if series.dtype().is_float() {
            present = &present & &series.is_not_nan()?;
        }
        keep = Some(match keep {
            Some(mask) => &mask | &present,
            None => present,
        });
    }

    match keep {
        Some(mask) => Ok(bars.filter(&mask)?),
        None => Ok(bars),
    }
}

fn join_rule_output(
    bars: DataFrame,
    values: DataFrame,
    time_col: &str,
    name: &str,
) -> TimeSeriesResult<DataFrame> {
    let invalid = |reason: &str| TimeSeriesError::InvalidRule {
        column: name.to_string(),
        reason: reason.to_string(),
    };

    if values.column(time_col).is_err() {
        return Err(invalid("output is missing the time column"));
    }
    let value_col = values
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .find(|n| n != time_col)
        .ok_or_else(|| invalid("output has no value column"))?;

    let mut bars = bars;
    if bars.column(name).is_ok() {
        warn!(column = %name, "custom rule replaces an aggregated column");
        bars = bars.drop(name)?;
    }

    let values = values
        .lazy()
        .select([col(time_col), col(value_col.as_str()).alias(name)]);

    let joined = bars
        .lazy()
        .left_join(values, col(time_col), col(time_col))
        .collect()?;

    Ok(joined)
}

/// Time column first, then the input's columns, then rule-only columns
fn restore_column_order(bars: DataFrame, input: &DataFrame, time_col: &str) -> TimeSeriesResult<DataFrame> {
    let mut order = vec![time_col.to_string()];

    for column in input.get_columns() {
        let name = column.name().to_string();
        if name != time_col && bars.column(&name).is_ok() {
            order.push(name);
        }
    }
    for column in bars.get_columns() {
        let name = column.name().to_string();
        if !order.contains(&name) {
            order.push(name);
        }
    }

    let exprs: Vec<Expr> = order.iter().map(|name| col(name.as_str())).collect();
    let result = bars
        .lazy()
        .select(exprs)
        .sort([time_col], SortMultipleOptions::default())
        .collect()?;

    Ok(result)
}
