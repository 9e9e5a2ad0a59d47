//! Grouping of parsed records by flight and weekday.

use crate::models::{FlightAggregate, FlightRecord};
use tracing::debug;

/// Fold records into per-flight, per-weekday buckets
///
/// Totals do not depend on record order. The sample segment of a bucket is
/// taken from the first record that reaches it.
pub fn aggregate<'a, I>(records: I) -> FlightAggregate
where
    I: IntoIterator<Item = &'a FlightRecord>,
{
    let mut aggregate = FlightAggregate::new();
    let mut folded = 0usize;
    for record in records {
        aggregate.add(record);
        folded += 1;
    }
    debug!(
        "Aggregated {} records into {} flights",
        folded,
        aggregate.flight_count()
    );
    aggregate
}
