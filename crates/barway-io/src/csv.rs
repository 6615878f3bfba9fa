//! CSV read and atomic CSV write for bar tables

use std::io::Write;
use std::path::Path;

use polars::prelude::*;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::CsvConfig;
use crate::error::{IoError, IoResult};

/// Read a CSV file into a DataFrame
pub fn read_bars_csv(path: impl AsRef<Path>, config: &CsvConfig) -> IoResult<DataFrame> {
    let path = path.as_ref();

    let null_values = config.null_values.as_ref().map(|values| {
        NullValues::AllColumns(values.iter().map(|v| v.as_str().into()).collect())
    });

    let df = CsvReadOptions::default()
        .with_has_header(config.has_header)
        .with_skip_rows(config.skip_rows)
        .map_parse_options(|opts| {
            opts.with_separator(config.delimiter)
                .with_try_parse_dates(config.try_parse_dates)
                .with_null_values(null_values.clone())
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read csv");
    Ok(df)
}

/// Write `df` to `path` so that readers never observe a partial file.
///
/// The frame is written to a temporary file in the destination directory,
/// synced, then renamed over `path`.
pub fn write_csv_atomic(df: &DataFrame, path: impl AsRef<Path>, config: &CsvConfig) -> IoResult<()> {
    let path = path.as_ref();
    if path.file_name().is_none() {
        return Err(IoError::InvalidPath(format!("{} has no file name", path.display())));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    let mut frame = df.clone();
    CsvWriter::new(&mut tmp)
        .include_header(config.has_header)
        .with_separator(config.delimiter)
        .finish(&mut frame)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(path)?;

    debug!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(())
}
