//! Core data structures for no-show analysis.
//!
//! Defines the weekday enum, parsed flight records, the per-weekday
//! accumulator and the aggregate produced by folding records together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Day of week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in calendar order
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Gregorian weekday of a calendar date
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        date.weekday().into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One valid data row of the export
///
/// `noshows` may exceed `bookings`; exports are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub flight_id: String,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub bookings: u64,
    pub noshows: u64,
    pub segment: String,
}

impl FlightRecord {
    pub fn new(
        flight_id: impl Into<String>,
        date: NaiveDate,
        bookings: u64,
        noshows: u64,
        segment: impl Into<String>,
    ) -> Self {
        Self {
            flight_id: flight_id.into(),
            date,
            weekday: Weekday::of(date),
            bookings,
            noshows,
            segment: segment.into(),
        }
    }
}

/// Running totals for one (flight, weekday) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekdayBucket {
    pub total_bookings: u64,
    pub total_noshows: u64,
    pub record_count: u64,
    /// Segment of the first record folded in; later values are ignored
    pub sample_segment: Option<String>,
}

impl WeekdayBucket {
    pub fn add(&mut self, record: &FlightRecord) {
        self.total_bookings = self.total_bookings.saturating_add(record.bookings);
        self.total_noshows = self.total_noshows.saturating_add(record.noshows);
        self.record_count = self.record_count.saturating_add(1);
        if self.sample_segment.is_none() {
            self.sample_segment = Some(record.segment.clone());
        }
    }
}

/// Per-weekday buckets for one flight
pub type FlightBuckets = BTreeMap<Weekday, WeekdayBucket>;

/// Aggregation result: flight id to its weekday buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlightAggregate {
    flights: BTreeMap<String, FlightBuckets>,
}

impl FlightAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into its (flight, weekday) bucket
    pub fn add(&mut self, record: &FlightRecord) {
        self.flights
            .entry(record.flight_id.clone())
            .or_default()
            .entry(record.weekday)
            .or_default()
            .add(record);
    }

    pub fn buckets(&self, flight_id: &str) -> Option<&FlightBuckets> {
        self.flights.get(flight_id)
    }

    pub fn bucket(&self, flight_id: &str, weekday: Weekday) -> Option<&WeekdayBucket> {
        self.buckets(flight_id).and_then(|days| days.get(&weekday))
    }

    /// Flight identifiers in lexical order
    pub fn flight_ids(&self) -> Vec<String> {
        self.flights.keys().cloned().collect()
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
