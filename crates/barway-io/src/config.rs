//! CSV configuration

use serde::{Deserialize, Serialize};

/// CSV-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: u8,
    pub has_header: bool,
    pub skip_rows: usize,
    pub null_values: Option<Vec<String>>,
    /// Parse ISO-8601 looking columns as dates/datetimes on read
    pub try_parse_dates: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            skip_rows: 0,
            null_values: None,
            try_parse_dates: true,
        }
    }
}

impl CsvConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    pub fn with_null_values(mut self, values: Vec<String>) -> Self {
        self.null_values = Some(values);
        self
    }

    pub fn with_try_parse_dates(mut self, enable: bool) -> Self {
        self.try_parse_dates = enable;
        self
    }
}
