//! VWAP (Volume-Weighted Average Price) rollup
//!
//! Resampled VWAP is recomputed from the finer-grained rows rather than
//! reduced from already-aggregated values:
//!
//! Formula: VWAP = Σ(Price × Volume) / Σ(Volume)

use polars::prelude::*;

use crate::error::TimeSeriesResult;
use crate::rules::{BucketSpec, VOLUME, VWAP};

/// Bucketed VWAP over `price_col` weighted by `volume_col`
///
/// # Arguments
/// * `df` - Unaggregated input, sorted on `spec.time_col`
/// * `spec` - Bucket specification
/// * `price_col` - Per-row price (typically a finer-grained vwap)
/// * `volume_col` - Per-row volume
///
/// # Returns
/// `None` when either column is absent, otherwise a frame with the bucket
/// start column and a `price_col` column. Buckets whose volume sums to zero
/// hold a null.
///
/// # Example
/// ```rust,no_run
/// use polars::prelude::*;
/// use barway_timeseries::{bucketed_vwap, BucketSpec};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let df = DataFrame::new(vec![
///     Series::new("date".into(), vec![0i64, 1, 2, 3]).into(),
///     Series::new("close".into(), vec![100.0, 101.0, 102.0, 101.5]).into(),
///     Series::new("volume".into(), vec![1000i64, 1500, 1200, 1100]).into(),
/// ])?;
///
/// let spec = BucketSpec::new("date", "2i");
/// let rolled = bucketed_vwap(&df, &spec, "close", "volume")?;
/// # Ok(())
/// # }
/// ```
pub fn bucketed_vwap(
    df: &DataFrame,
    spec: &BucketSpec,
    price_col: &str,
    volume_col: &str,
) -> TimeSeriesResult<Option<DataFrame>> {
    if df.column(price_col).is_err() || df.column(volume_col).is_err() {
        return Ok(None);
    }

    let price = col(price_col).cast(DataType::Float64);
    let volume = col(volume_col).cast(DataType::Float64);

    let notional = (price * volume.clone()).sum();
    let total_volume = volume.sum();

    let vwap = when(total_volume.clone().eq(lit(0.0)))
        .then(lit(NULL))
        .otherwise(notional / total_volume)
        .cast(DataType::Float64)
        .alias(price_col);

    spec.aggregate(df, vec![vwap]).map(Some)
}

/// Bucketed VWAP of the reserved `vwap` column weighted by `v`
pub fn resample_vwap(df: &DataFrame, spec: &BucketSpec) -> TimeSeriesResult<Option<DataFrame>> {
    bucketed_vwap(df, spec, VWAP, VOLUME)
}
