//! Error handling for no-show analysis.
//!
//! Separates the two per-file conditions a caller is expected to recover
//! from (no table, no flights) from genuine I/O and configuration failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoshowError {
    #[error("Failed to read input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No flight table found: neither a known header nor a flight data row was detected")]
    TableNotFound,

    #[error("No flights found: {skipped} of {total} data rows were skipped")]
    NoFlights { total: usize, skipped: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid date '{value}' (expected {format})")]
    InvalidDate { value: String, format: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NoshowError {
    /// Conditions that end processing for one file but leave the tool usable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TableNotFound | Self::NoFlights { .. })
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NoshowError>;
