//! Noshow Analyzer Library
//!
//! Turns airline booking exports into per-weekday no-show statistics.
//!
//! This library provides tools for:
//! - Decoding exports written in UTF-8 or Cyrillic code pages
//! - Locating the flight table inside noisy report text
//! - Parsing rows of either known column scheme with permissive number handling
//! - Aggregating bookings and no-shows per flight and weekday
//! - Projecting no-shows for the coming week and sizing overbooking
//!
//! ```rust
//! use chrono::NaiveDate;
//! use noshow_analyzer::{AnalyzerConfig, NoshowAnalyzer};
//!
//! # fn example() -> noshow_analyzer::Result<()> {
//! let analyzer = NoshowAnalyzer::new(AnalyzerConfig::default())?;
//! let export = "Flight;Date;Segment;seg_bkd_total;noshow\nN4-281;01.09.2025;LED-KGD;216;6\n";
//! let analysis = analyzer.analyze_bytes(export.as_bytes())?;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
//! let report = analysis.flight_report("N4-281", today);
//! assert_eq!(report.forecast.len(), 7);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod forecast;
pub mod header;
pub mod models;
pub mod parser;
pub mod processor;

pub use config::AnalyzerConfig;
pub use error::{NoshowError, Result};
pub use forecast::{ForecastEntry, Recommendation, WeekdayStat};
pub use models::{FlightAggregate, FlightRecord, Weekday, WeekdayBucket};
pub use processor::{Analysis, FlightReport, NoshowAnalyzer};
