//! Configuration management and validation.
//!
//! Holds the tunable constants of the pipeline: table detection thresholds,
//! the export date format and forecast defaults.

use crate::constants::{
    DEFAULT_AVG_BOOKINGS, DEFAULT_DATA_MIN_DELIMITERS, DEFAULT_DATE_FORMAT,
    DEFAULT_FALLBACK_MIN_DELIMITERS, DEFAULT_FORECAST_DAYS, FLIGHT_ID_PATTERN, SUMMARY_LABEL,
};
use crate::encoding::TextEncoding;
use crate::error::{NoshowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Global configuration for no-show analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Average bookings assumed for weekdays missing from the history
    pub default_avg_bookings: u64,

    /// Number of days projected, starting with the reference date
    pub forecast_days: u32,

    /// chrono format string for the date column
    pub date_format: String,

    /// Delimiters a line needs (strictly more than) to be taken as a data row
    /// when no header signature is present
    pub fallback_min_delimiters: usize,

    /// Delimiters a line after the header needs (strictly more than) to be kept
    pub data_min_delimiters: usize,

    /// Flight column value marking a totals row
    pub summary_label: String,

    /// Regex a flight identifier starts with, used to spot headerless tables
    pub flight_id_pattern: String,

    /// Encodings tried in order when decoding an export
    pub encodings: Vec<TextEncoding>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_avg_bookings: DEFAULT_AVG_BOOKINGS,
            forecast_days: DEFAULT_FORECAST_DAYS,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            fallback_min_delimiters: DEFAULT_FALLBACK_MIN_DELIMITERS,
            data_min_delimiters: DEFAULT_DATA_MIN_DELIMITERS,
            summary_label: SUMMARY_LABEL.to_string(),
            flight_id_pattern: FLIGHT_ID_PATTERN.to_string(),
            encodings: TextEncoding::CANDIDATES.to_vec(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| NoshowError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_default_avg_bookings(mut self, bookings: u64) -> Self {
        self.default_avg_bookings = bookings;
        self
    }

    pub fn with_forecast_days(mut self, days: u32) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.forecast_days == 0 {
            return Err(NoshowError::configuration(
                "forecast_days must be at least 1",
            ));
        }
        if self.forecast_days > 366 {
            return Err(NoshowError::configuration(format!(
                "forecast_days must not exceed 366, got {}",
                self.forecast_days
            )));
        }
        if self.date_format.trim().is_empty() {
            return Err(NoshowError::configuration("date_format must not be empty"));
        }
        if self.summary_label.trim().is_empty() {
            return Err(NoshowError::configuration(
                "summary_label must not be empty",
            ));
        }
        if self.encodings.is_empty() {
            return Err(NoshowError::configuration(
                "encodings must list at least one candidate",
            ));
        }
        regex::Regex::new(&self.flight_id_pattern).map_err(|e| {
            NoshowError::configuration(format!(
                "invalid flight_id_pattern '{}': {}",
                self.flight_id_pattern, e
            ))
        })?;
        Ok(())
    }
}
