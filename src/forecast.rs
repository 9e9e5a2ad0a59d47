//! No-show rates, the forward projection and the overbooking recommendation.
//!
//! Everything here is derived on demand from a flight's weekday buckets and
//! an explicit reference date, so repeated calls give identical results.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{FlightBuckets, Weekday, WeekdayBucket};

/// Rate and average bookings of one weekday with history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStat {
    pub weekday: Weekday,
    /// `total_noshows / total_bookings`, 0.0 when there were no bookings
    pub rate: f64,
    /// `floor(total_bookings / record_count)`
    pub avg_bookings: u64,
    pub total_bookings: u64,
    pub total_noshows: u64,
    pub record_count: u64,
}

impl WeekdayStat {
    pub fn from_bucket(weekday: Weekday, bucket: &WeekdayBucket) -> Self {
        let rate = if bucket.total_bookings > 0 {
            bucket.total_noshows as f64 / bucket.total_bookings as f64
        } else {
            0.0
        };
        let avg_bookings = bucket
            .total_bookings
            .checked_div(bucket.record_count)
            .unwrap_or(0);

        Self {
            weekday,
            rate,
            avg_bookings,
            total_bookings: bucket.total_bookings,
            total_noshows: bucket.total_noshows,
            record_count: bucket.record_count,
        }
    }
}

/// Stats for every weekday present, in calendar order
pub fn weekday_stats(buckets: &FlightBuckets) -> Vec<WeekdayStat> {
    buckets
        .iter()
        .map(|(weekday, bucket)| WeekdayStat::from_bucket(*weekday, bucket))
        .collect()
}

/// Projected no-shows for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// `avg_bookings * rate`, not rounded
    pub predicted_noshow: f64,
    pub rate: f64,
    pub avg_bookings: u64,
    /// The weekday had no history and the defaults were used
    pub defaulted: bool,
}

/// Project `days` calendar days starting at `today`
///
/// Weekdays without history use `default_avg_bookings` and a zero rate.
pub fn forecast(
    stats: &[WeekdayStat],
    today: NaiveDate,
    days: u32,
    default_avg_bookings: u64,
) -> Vec<ForecastEntry> {
    (0..i64::from(days))
        .map(|offset| {
            let date = today + Duration::days(offset);
            let weekday = Weekday::of(date);
            let (rate, avg_bookings, defaulted) = match stats.iter().find(|s| s.weekday == weekday)
            {
                Some(stat) => (stat.rate, stat.avg_bookings, false),
                None => (0.0, default_avg_bookings, true),
            };

            ForecastEntry {
                date,
                weekday,
                predicted_noshow: avg_bookings as f64 * rate,
                rate,
                avg_bookings,
                defaulted,
            }
        })
        .collect()
}

/// Extra seats suggested for the weekday with the highest no-show rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub weekday: Weekday,
    pub rate: f64,
    /// `floor(avg_bookings * rate)`
    pub recommended_extra_seats: u64,
}

/// Recommend overbooking for the worst weekday
///
/// Ties go to the earliest weekday in calendar order. `None` when there
/// are no stats.
pub fn recommend(stats: &[WeekdayStat]) -> Option<Recommendation> {
    let worst = stats.iter().fold(None::<&WeekdayStat>, |best, stat| match best {
        Some(current) if stat.rate > current.rate => Some(stat),
        Some(current) if stat.rate == current.rate && stat.weekday < current.weekday => Some(stat),
        Some(current) => Some(current),
        None => Some(stat),
    })?;

    Some(Recommendation {
        weekday: worst.weekday,
        rate: worst.rate,
        recommended_extra_seats: (worst.avg_bookings as f64 * worst.rate).floor() as u64,
    })
}
