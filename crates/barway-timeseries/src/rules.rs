//! Per-column aggregation rules and the bucket specification they run against

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use polars::prelude::*;
use polars::series::IsSorted;

use crate::error::{TimeSeriesError, TimeSeriesResult};
use crate::vwap::bucketed_vwap;

/// Open column
pub const OPEN: &str = "o";
/// High column
pub const HIGH: &str = "h";
/// Low column
pub const LOW: &str = "l";
/// Close column
pub const CLOSE: &str = "c";
/// Volume column
pub const VOLUME: &str = "v";
/// Volume-weighted average price column
pub const VWAP: &str = "vwap";

/// Default name of the time column
pub const DEFAULT_TIME_COL: &str = "date";

/// Signature of a caller-supplied aggregation.
///
/// The closure receives the original, unaggregated table and the bucket
/// specification. It returns `None` to skip the column, or a frame holding the
/// bucket-start time column plus exactly one value column.
pub type RuleFn = dyn Fn(&DataFrame, &BucketSpec) -> TimeSeriesResult<Option<DataFrame>> + Send + Sync;

/// Time bucketing shared by the batched pass and custom rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    /// Time column name
    pub time_col: String,

    /// Bucket width as a Polars duration token (e.g. "5m", "1h", "1d")
    pub frequency: String,
}

impl BucketSpec {
    pub fn new(time_col: impl Into<String>, frequency: impl Into<String>) -> Self {
        Self {
            time_col: time_col.into(),
            frequency: frequency.into(),
        }
    }

    /// Group `df` into left-closed buckets of `frequency` and evaluate `aggs`
    /// in each one. Buckets without rows are not emitted.
    ///
    /// `df` must already be sorted on the time column.
    pub fn aggregate(&self, df: &DataFrame, aggs: Vec<Expr>) -> TimeSeriesResult<DataFrame> {
        let every = Duration::try_parse(&self.frequency)?;
        if every.is_zero() {
            return Err(TimeSeriesError::InvalidConfig(format!(
                "frequency '{}' has zero width",
                self.frequency
            )));
        }
        // integer indices take integer offsets
        let offset = if self.frequency.trim_end().ends_with('i') { "0i" } else { "0s" };
        let time = self.time_col.as_str();

        let result = df
            .clone()
            .lazy()
            .with_column(col(time).set_sorted_flag(IsSorted::Ascending))
            .group_by_dynamic(
                col(time),
                Vec::<Expr>::new(),
                DynamicGroupOptions {
                    every,
                    period: every,
                    offset: Duration::parse(offset),
                    label: Label::Left,
                    closed_window: ClosedWindow::Left,
                    start_by: StartBy::WindowBound,
                    ..Default::default()
                },
            )
            .agg(aggs)
            .collect()?;

        Ok(result)
    }
}

/// Aggregation applied to one column within each bucket
#[derive(Clone)]
pub enum AggregationRule {
    /// First value in bucket
    First,

    /// Last value in bucket
    Last,

    /// Maximum value
    Max,

    /// Minimum value
    Min,

    /// Sum of values
    Sum,

    /// Mean/average value
    Mean,

    /// Volume-weighted average of the column itself, weighted by `v`
    Vwap,

    /// Caller-supplied aggregation over the unaggregated table
    Custom(Arc<RuleFn>),
}

impl AggregationRule {
    /// Wrap a closure as a custom rule
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&DataFrame, &BucketSpec) -> TimeSeriesResult<Option<DataFrame>> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Aggregation expression for a built-in verb, `None` for custom rules
    pub fn to_expr(&self, column: &str) -> Option<Expr> {
        let expr = match self {
            Self::First => col(column).drop_nulls().first(),
            Self::Last => col(column).drop_nulls().last(),
            Self::Max => col(column).max(),
            Self::Min => col(column).min(),
            Self::Sum => col(column).sum(),
            Self::Mean => col(column).mean(),
            Self::Vwap | Self::Custom(_) => return None,
        };
        Some(expr.alias(column))
    }

    /// Run a rule that needs the unaggregated table for `column`; batched verbs yield `None`
    pub fn apply(
        &self,
        column: &str,
        df: &DataFrame,
        spec: &BucketSpec,
    ) -> TimeSeriesResult<Option<DataFrame>> {
        match self {
            Self::Vwap => bucketed_vwap(df, spec, column, VOLUME),
            Self::Custom(f) => f(df, spec),
            _ => Ok(None),
        }
    }

    /// Built-in rule for a reserved bar column
    pub fn default_for(column: &str) -> Self {
        match column {
            OPEN => Self::First,
            HIGH => Self::Max,
            LOW => Self::Min,
            CLOSE => Self::Last,
            VOLUME => Self::Sum,
            VWAP => Self::Vwap,
            _ => Self::Last,
        }
    }
}

impl fmt::Debug for AggregationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("First"),
            Self::Last => f.write_str("Last"),
            Self::Max => f.write_str("Max"),
            Self::Min => f.write_str("Min"),
            Self::Sum => f.write_str("Sum"),
            Self::Mean => f.write_str("Mean"),
            Self::Vwap => f.write_str("Vwap"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for AggregationRule {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            "vwap" => Ok(Self::Vwap),
            other => Err(TimeSeriesError::InvalidConfig(format!(
                "unknown aggregation '{other}' (expected first, last, max, min, sum, mean or vwap)"
            ))),
        }
    }
}

/// Ordered column → rule mapping. Later inserts replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, AggregationRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, rule: AggregationRule) {
        let column = column.into();
        match self.rules.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = rule,
            None => self.rules.push((column, rule)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&AggregationRule> {
        self.rules
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregationRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
