//! Header row detection and data block extraction.
//!
//! Exports often carry report titles, period lines or blank separators
//! around the actual table. This module finds the header row and the data
//! rows that follow it.

use crate::config::AnalyzerConfig;
use crate::constants::{FALLBACK_DELIMITER, HEADER_SIGNATURES, PRIMARY_DELIMITER};
use crate::error::{NoshowError, Result};
use regex::Regex;
use tracing::{debug, warn};

/// Header line and data lines cut out of a decoded export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Zero-based line index of the header in the decoded text
    pub header_index: usize,
    pub header_line: String,
    pub data_lines: Vec<String>,
    pub delimiter: char,
}

impl TableBlock {
    /// Header and data rows joined back into a single CSV blob
    pub fn to_csv(&self) -> String {
        let mut blob = String::with_capacity(
            self.header_line.len() + self.data_lines.iter().map(|l| l.len() + 1).sum::<usize>(),
        );
        blob.push_str(&self.header_line);
        for line in &self.data_lines {
            blob.push('\n');
            blob.push_str(line);
        }
        blob
    }
}

/// `;` when the line contains one, `,` otherwise
pub fn detect_delimiter(line: &str) -> char {
    if line.contains(PRIMARY_DELIMITER) {
        PRIMARY_DELIMITER
    } else {
        FALLBACK_DELIMITER
    }
}

/// Finds the flight table inside decoded export text
#[derive(Debug, Clone)]
pub struct TableLocator {
    flight_id_pattern: Regex,
    fallback_min_delimiters: usize,
    data_min_delimiters: usize,
}

impl TableLocator {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let flight_id_pattern = Regex::new(&config.flight_id_pattern).map_err(|e| {
            NoshowError::configuration(format!("invalid flight_id_pattern: {}", e))
        })?;

        Ok(Self {
            flight_id_pattern,
            fallback_min_delimiters: config.fallback_min_delimiters,
            data_min_delimiters: config.data_min_delimiters,
        })
    }

    /// Locate header and data rows; `None` when the text holds no flight table
    pub fn locate(&self, text: &str) -> Option<TableBlock> {
        let lines: Vec<&str> = text.lines().collect();

        let header_index = match lines.iter().position(|line| is_header_signature(line)) {
            Some(index) => {
                debug!("Header signature found at line {}", index + 1);
                index
            }
            None => {
                let data_index = lines.iter().position(|line| self.is_data_like(line))?;
                if data_index == 0 {
                    warn!("First line looks like data, no header line precedes it");
                    return None;
                }
                debug!(
                    "No header signature, first data row at line {}, using line {} as header",
                    data_index + 1,
                    data_index
                );
                data_index - 1
            }
        };

        let header_line = strip_bom(lines[header_index]).trim_end().to_string();
        let delimiter = detect_delimiter(&header_line);

        let data_lines: Vec<String> = lines[header_index + 1..]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| line.matches(delimiter).count() > self.data_min_delimiters)
            .map(|line| line.to_string())
            .collect();

        debug!(
            "Table block: header at line {}, {} data lines, delimiter '{}'",
            header_index + 1,
            data_lines.len(),
            delimiter
        );

        Some(TableBlock {
            header_index,
            header_line,
            data_lines,
            delimiter,
        })
    }

    /// Like [`TableLocator::locate`], reporting a missing table as an error
    pub fn locate_required(&self, text: &str) -> Result<TableBlock> {
        self.locate(text).ok_or_else(|| {
            warn!("No flight table found in input");
            NoshowError::TableNotFound
        })
    }

    fn is_data_like(&self, line: &str) -> bool {
        let delimiter = detect_delimiter(line);
        self.flight_id_pattern.is_match(line.trim_start())
            && line.matches(delimiter).count() > self.fallback_min_delimiters
    }
}

fn strip_bom(line: &str) -> &str {
    line.trim_start_matches('\u{feff}')
}

/// A line whose cells contain one of the known header column sequences
fn is_header_signature(line: &str) -> bool {
    let line = strip_bom(line);
    [PRIMARY_DELIMITER, FALLBACK_DELIMITER].iter().any(|&delimiter| {
        let cells: Vec<&str> = line
            .split(delimiter)
            .map(|cell| cell.trim().trim_matches('"').trim())
            .collect();
        HEADER_SIGNATURES.iter().any(|signature| {
            cells
                .windows(signature.len())
                .any(|window| window == *signature)
        })
    })
}
