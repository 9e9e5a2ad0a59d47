//! Analysis pipeline for one export file.
//!
//! Chains the encoding resolver, table locator, record parser and
//! aggregator: bytes go in, an [`Analysis`] comes out. Selecting a flight
//! and a reference date then yields its [`FlightReport`]. No state is kept
//! between runs.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::config::AnalyzerConfig;
use crate::constants::UNKNOWN_SEGMENT;
use crate::encoding::{self, TextEncoding};
use crate::error::{NoshowError, Result};
use crate::forecast::{
    ForecastEntry, Recommendation, WeekdayStat, forecast, recommend, weekday_stats,
};
use crate::header::TableLocator;
use crate::models::FlightAggregate;
use crate::parser::{ParseStats, parse_records};

/// Result of analysing one export
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub encoding: TextEncoding,
    pub stats: ParseStats,
    /// Distinct flight identifiers in lexical order
    pub flights: Vec<String>,
    #[serde(skip)]
    pub aggregate: FlightAggregate,
    #[serde(skip)]
    config: AnalyzerConfig,
}

/// Everything the presentation layer shows for one selected flight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightReport {
    pub flight_id: String,
    pub segment: String,
    pub today: NaiveDate,
    pub stats: Vec<WeekdayStat>,
    pub forecast: Vec<ForecastEntry>,
    pub recommendation: Option<Recommendation>,
}

impl FlightReport {
    /// False when the flight has no weekday history; render a "no data" state
    pub fn has_data(&self) -> bool {
        !self.stats.is_empty()
    }
}

/// Stateless pipeline runner
#[derive(Debug, Clone)]
pub struct NoshowAnalyzer {
    config: AnalyzerConfig,
    locator: TableLocator,
}

impl NoshowAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let locator = TableLocator::new(&config)?;
        Ok(Self { config, locator })
    }

    /// Read and analyse an export from disk
    pub fn analyze_file(&self, path: &Path) -> Result<Analysis> {
        info!("Analysing {}", path.display());
        let bytes = std::fs::read(path).map_err(|source| NoshowError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.analyze_bytes(&bytes)
    }

    /// Analyse raw export bytes
    ///
    /// Fails with [`NoshowError::TableNotFound`] when no flight table is
    /// present and [`NoshowError::NoFlights`] when every row was rejected.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<Analysis> {
        let decoded = encoding::decode(bytes, &self.config.encodings);
        debug!("Input decoded as {}", decoded.encoding);

        let block = self.locator.locate_required(&decoded.text)?;

        let parsed = parse_records(&block, &self.config);
        let aggregate = aggregate(&parsed.records);

        if aggregate.is_empty() {
            warn!(
                "All {} data rows were skipped, no flights found",
                parsed.stats.total_rows
            );
            return Err(NoshowError::NoFlights {
                total: parsed.stats.total_rows,
                skipped: parsed.stats.skipped_rows,
            });
        }

        info!(
            "Processed {} of {} rows, {} flights",
            parsed.stats.processed_rows,
            parsed.stats.total_rows,
            aggregate.flight_count()
        );

        Ok(Analysis {
            encoding: decoded.encoding,
            stats: parsed.stats,
            flights: aggregate.flight_ids(),
            aggregate,
            config: self.config.clone(),
        })
    }
}

impl Analysis {
    pub fn contains_flight(&self, flight_id: &str) -> bool {
        self.aggregate.buckets(flight_id).is_some()
    }

    /// Rates, forecast and recommendation for one flight
    ///
    /// An unknown flight or one without buckets gives an empty report.
    pub fn flight_report(&self, flight_id: &str, today: NaiveDate) -> FlightReport {
        let Some(buckets) = self.aggregate.buckets(flight_id) else {
            debug!("No weekday data for flight {}", flight_id);
            return FlightReport {
                flight_id: flight_id.to_string(),
                segment: UNKNOWN_SEGMENT.to_string(),
                today,
                stats: Vec::new(),
                forecast: Vec::new(),
                recommendation: None,
            };
        };

        let segment = buckets
            .values()
            .filter_map(|bucket| bucket.sample_segment.as_deref())
            .find(|segment| !segment.is_empty())
            .unwrap_or(UNKNOWN_SEGMENT)
            .to_string();

        let stats = weekday_stats(buckets);
        let forecast = if stats.is_empty() {
            Vec::new()
        } else {
            forecast(
                &stats,
                today,
                self.config.forecast_days,
                self.config.default_avg_bookings,
            )
        };
        let recommendation = recommend(&stats);

        FlightReport {
            flight_id: flight_id.to_string(),
            segment,
            today,
            stats,
            forecast,
            recommendation,
        }
    }

    /// Reports for every flight in the file, in lexical order
    pub fn all_reports(&self, today: NaiveDate) -> Vec<FlightReport> {
        self.flights
            .iter()
            .map(|flight_id| self.flight_report(flight_id, today))
            .collect()
    }
}
