//! Record parsing for located flight tables
//!
//! Turns the header and data lines of a [`TableBlock`] into
//! [`FlightRecord`]s. Column names are resolved through fixed alias lists so
//! both export schemes parse the same way, numeric fields are read
//! permissively and every rejected row is counted by reason rather than
//! aborting the file.

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::constants::columns;
use crate::header::TableBlock;
use crate::models::FlightRecord;

/// One data line keyed by column name
pub type RawRow<'a> = HashMap<&'a str, &'a str>;

/// Why a data line did not produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SkipReason {
    MissingFlight,
    MissingDate,
    InvalidDate,
    SummaryRow,
    MalformedLine,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingFlight => "missing flight number",
            SkipReason::MissingDate => "missing date",
            SkipReason::InvalidDate => "unparseable date",
            SkipReason::SummaryRow => "summary row",
            SkipReason::MalformedLine => "malformed line",
        };
        f.write_str(text)
    }
}

/// Row counters for one parsed table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Data rows encountered
    pub total_rows: usize,

    /// Rows that produced a record
    pub processed_rows: usize,

    /// Rows dropped for any reason
    pub skipped_rows: usize,

    pub skip_reasons: BTreeMap<SkipReason, usize>,

    /// Per-row diagnostics for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_skip(&mut self, reason: SkipReason, detail: String) {
        self.skipped_rows += 1;
        *self.skip_reasons.entry(reason).or_insert(0) += 1;
        self.errors.push(detail);
    }

    /// Rows skipped for one particular reason
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skip_reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Share of rows that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.processed_rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Parsed records with their row statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub records: Vec<FlightRecord>,
    pub stats: ParseStats,
}

/// Parse every data line of a located table
pub fn parse_records(block: &TableBlock, config: &AnalyzerConfig) -> ParseResult {
    let mut stats = ParseStats::new();
    let mut records = Vec::new();

    let blob = block.to_csv();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(block.delimiter))
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(blob.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            warn!("Failed to read header row: {}", e);
            StringRecord::new()
        }
    };
    debug!("Columns: {:?}", headers.iter().collect::<Vec<_>>());

    for result in reader.records() {
        stats.total_rows += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                stats.record_skip(
                    SkipReason::MalformedLine,
                    format!("Row {}: {}", stats.total_rows, e),
                );
                continue;
            }
        };

        let row = raw_row(&headers, &record);
        match parse_row(&row, config) {
            Ok(flight_record) => {
                records.push(flight_record);
                stats.processed_rows += 1;
            }
            Err(reason) => {
                debug!("Skipped row {}: {}", stats.total_rows, reason);
                stats.record_skip(reason, format!("Row {}: {}", stats.total_rows, reason));
            }
        }
    }

    info!(
        "Parsed {} records from {} rows ({} skipped)",
        stats.processed_rows, stats.total_rows, stats.skipped_rows
    );

    ParseResult { records, stats }
}

/// Zip a data record with the header into a column-name mapping
pub fn raw_row<'a>(headers: &'a StringRecord, record: &'a StringRecord) -> RawRow<'a> {
    headers
        .iter()
        .zip(record.iter())
        .filter(|(name, _)| *name != columns::FREQUENCY)
        .collect()
}

/// Turn one row into a record, or say why it was rejected
pub fn parse_row(row: &RawRow<'_>, config: &AnalyzerConfig) -> Result<FlightRecord, SkipReason> {
    let flight_id = lookup(row, columns::FLIGHT).ok_or(SkipReason::MissingFlight)?;
    if flight_id.starts_with(config.summary_label.as_str()) {
        return Err(SkipReason::SummaryRow);
    }

    let date_text = lookup(row, columns::DATE).ok_or(SkipReason::MissingDate)?;
    let date = NaiveDate::parse_from_str(date_text, &config.date_format)
        .map_err(|_| SkipReason::InvalidDate)?;

    let bookings = lookup(row, columns::BOOKINGS).map(parse_count).unwrap_or(0);
    let noshows = lookup(row, columns::NOSHOWS).map(parse_count).unwrap_or(0);
    let segment = lookup(row, columns::SEGMENT).unwrap_or("");

    if noshows > bookings {
        debug!(
            "Flight {} on {}: {} no-shows exceed {} bookings",
            flight_id, date_text, noshows, bookings
        );
    }

    Ok(FlightRecord::new(flight_id, date, bookings, noshows, segment))
}

/// First alias with a non-empty value
fn lookup<'a>(row: &RawRow<'a>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias).copied())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Permissive count parsing: integer, then truncated float, then zero
pub fn parse_count(value: &str) -> u64 {
    let trimmed = value.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return count;
    }

    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => number.trunc() as u64,
        _ => 0,
    }
}

fn delimiter_byte(delimiter: char) -> u8 {
    if delimiter.is_ascii() {
        delimiter as u8
    } else {
        b';'
    }
}
