//! Time-ordering checks for bar tables

use polars::prelude::*;

use crate::error::{TimeSeriesError, TimeSeriesResult};

/// Fail unless `time_col` is non-null and non-decreasing.
///
/// Equal consecutive timestamps are accepted.
pub fn check_monotonic(df: &DataFrame, time_col: &str) -> TimeSeriesResult<()> {
    let ticks = physical_ticks(df, time_col)?;

    let mut previous: Option<i64> = None;
    for (row, tick) in ticks.into_iter().enumerate() {
        let tick = tick.ok_or_else(|| TimeSeriesError::NullTimestamp {
            column: time_col.to_string(),
            row,
        })?;

        if previous.is_some_and(|prev| tick < prev) {
            return Err(TimeSeriesError::UnsortedIndex {
                column: time_col.to_string(),
                row,
            });
        }
        previous = Some(tick);
    }

    Ok(())
}

/// Non-failing variant of [`check_monotonic`]
pub fn is_monotonic(df: &DataFrame, time_col: &str) -> TimeSeriesResult<bool> {
    match check_monotonic(df, time_col) {
        Ok(()) => Ok(true),
        Err(TimeSeriesError::UnsortedIndex { .. } | TimeSeriesError::NullTimestamp { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

fn physical_ticks(df: &DataFrame, time_col: &str) -> TimeSeriesResult<Int64Chunked> {
    let column = df
        .column(time_col)
        .map_err(|_| TimeSeriesError::MissingColumn(time_col.to_string()))?;
    let series = column.as_materialized_series();

    let dtype = series.dtype();
    if !(dtype.is_temporal() || dtype.is_integer()) {
        return Err(TimeSeriesError::InvalidTimeColumn(format!(
            "'{time_col}' has dtype {dtype}, expected a date, datetime or integer column"
        )));
    }

    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
    Ok(physical.i64()?.clone())
}
