//! Application constants for the no-show analyzer
//!
//! Column names of the two known export schemes, detection thresholds and
//! forecast defaults used throughout the pipeline.

// =============================================================================
// Export Column Schemes
// =============================================================================

/// Candidate column names per logical field, tried in priority order.
///
/// Scheme A (`Flight;Date;Segment;seg_bkd_total;noshow`) comes first,
/// scheme B (`Рейс;Дата;Сегмент;Seg Bkd Total;Nsh`) second.
pub mod columns {
    pub const FLIGHT: &[&str] = &["Flight", "Рейс"];
    pub const DATE: &[&str] = &["Date", "Дата"];
    pub const BOOKINGS: &[&str] = &["seg_bkd_total", "Seg Bkd Total"];
    pub const NOSHOWS: &[&str] = &["noshow", "Nsh"];
    pub const SEGMENT: &[&str] = &["Segment", "Сегмент"];

    /// Present in some scheme B exports; never read
    pub const FREQUENCY: &str = "Частота";
}

/// Leading column sequences that identify a header row
pub const HEADER_SIGNATURES: &[&[&str]] = &[&["Flight", "Date"], &["Рейс", "Дата"]];

/// Flight identifier prefix used to spot data rows when no header matched
pub const FLIGHT_ID_PATTERN: &str = r"^[A-Z0-9]{2}-?\d+";

/// Label of the totals row some exports append below the data
pub const SUMMARY_LABEL: &str = "Итого";

// =============================================================================
// Parsing Defaults
// =============================================================================

/// Preferred field delimiter
pub const PRIMARY_DELIMITER: char = ';';

/// Delimiter used when the header has no `;`
pub const FALLBACK_DELIMITER: char = ',';

/// Export date format (DD.MM.YYYY)
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// A line must contain more delimiters than this to count as data-like
/// during header fallback detection
pub const DEFAULT_FALLBACK_MIN_DELIMITERS: usize = 3;

/// A line after the header must contain more delimiters than this to be kept
pub const DEFAULT_DATA_MIN_DELIMITERS: usize = 2;

// =============================================================================
// Forecast Defaults
// =============================================================================

/// Average bookings assumed for a weekday with no history
pub const DEFAULT_AVG_BOOKINGS: u64 = 200;

/// Number of calendar days projected, starting today
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

/// Segment shown when a flight has no segment values at all
pub const UNKNOWN_SEGMENT: &str = "unknown";
