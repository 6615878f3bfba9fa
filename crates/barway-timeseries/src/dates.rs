//! Conversions between epoch integers, strings and Polars temporal columns

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

use crate::error::{TimeSeriesError, TimeSeriesResult};

/// Reinterpret an integer epoch column as `Datetime(unit)`
pub fn epoch_to_datetime(df: &DataFrame, column: &str, unit: TimeUnit) -> TimeSeriesResult<DataFrame> {
    let series = series_of(df, column)?;
    if !series.dtype().is_integer() {
        return Err(TimeSeriesError::InvalidTimeColumn(format!(
            "'{column}' has dtype {}, expected an integer epoch",
            series.dtype()
        )));
    }

    let converted = series
        .cast(&DataType::Int64)?
        .cast(&DataType::Datetime(unit, None))?;
    replace_column(df, converted)
}

/// Replace a `Date`/`Datetime` column by its `Int64` epoch in the column's own unit
/// (days for `Date`)
pub fn datetime_to_epoch(df: &DataFrame, column: &str) -> TimeSeriesResult<DataFrame> {
    let series = series_of(df, column)?;
    if !matches!(series.dtype(), DataType::Date | DataType::Datetime(_, _)) {
        return Err(TimeSeriesError::InvalidTimeColumn(format!(
            "'{column}' has dtype {}, expected date or datetime",
            series.dtype()
        )));
    }

    let converted = series.to_physical_repr().cast(&DataType::Int64)?;
    replace_column(df, converted)
}

/// Make `column` usable as a bucketing index.
///
/// Temporal columns pass through, integer epochs are read in `unit` and
/// strings are parsed by Polars' string to datetime cast.
pub fn ensure_datetime(df: &DataFrame, column: &str, unit: TimeUnit) -> TimeSeriesResult<DataFrame> {
    let series = series_of(df, column)?;
    match series.dtype() {
        DataType::Date | DataType::Datetime(_, _) => Ok(df.clone()),
        dtype if dtype.is_integer() => epoch_to_datetime(df, column, unit),
        DataType::String => {
            let parsed = series.cast(&DataType::Datetime(unit, None))?;
            if parsed.null_count() > series.null_count() {
                return Err(TimeSeriesError::InvalidTimeColumn(format!(
                    "'{column}' holds values that are not timestamps"
                )));
            }
            replace_column(df, parsed)
        }
        dtype => Err(TimeSeriesError::InvalidTimeColumn(format!(
            "'{column}' has dtype {dtype}, cannot convert to datetime"
        ))),
    }
}

/// Epoch value of a naive (UTC) timestamp in `unit`
pub fn epoch_from_naive(ts: &NaiveDateTime, unit: TimeUnit) -> i64 {
    let utc = ts.and_utc();
    match unit {
        TimeUnit::Milliseconds => utc.timestamp_millis(),
        TimeUnit::Microseconds => utc.timestamp_micros(),
        TimeUnit::Nanoseconds => utc
            .timestamp_nanos_opt()
            .unwrap_or_else(|| utc.timestamp_micros().saturating_mul(1_000)),
    }
}

/// Naive (UTC) timestamp of an epoch value in `unit`, `None` when out of range
pub fn naive_from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    };
    utc.map(|dt| dt.naive_utc())
}

fn series_of<'a>(df: &'a DataFrame, column: &str) -> TimeSeriesResult<&'a Series> {
    df.column(column)
        .map(|c| c.as_materialized_series())
        .map_err(|_| TimeSeriesError::MissingColumn(column.to_string()))
}

fn replace_column(df: &DataFrame, series: Series) -> TimeSeriesResult<DataFrame> {
    let mut result = df.clone();
    result.with_column(series)?;
    Ok(result)
}
