//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps in Hiroba are UTC. Clients only ever see the time of day
//! (`HH:MM:SS`, 24-hour clock, no date, no offset).

use chrono::{DateTime, SecondsFormat, Utc};

/// Earliest instant (2000-01-01T00:00:00Z, Unix seconds) treated as a real
/// message timestamp. Anything older is a missing or zeroed value.
pub const PLAUSIBLE_EPOCH_SECS: i64 = 946_684_800;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current instant in UTC
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock returning the given instant
    pub fn new(fixed_time: DateTime<Utc>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.fixed_time
    }
}

/// Format an instant as a 24-hour UTC time of day (`HH:MM:SS`)
pub fn format_time_of_day(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

/// Whether a stored timestamp looks like a real value rather than a zeroed default
pub fn is_plausible(timestamp: &DateTime<Utc>) -> bool {
    timestamp.timestamp() >= PLAUSIBLE_EPOCH_SECS
}

/// Convert an instant to fixed-width RFC 3339 (microseconds, `Z` suffix)
///
/// Fixed width keeps the textual form sortable in storage.
pub fn to_utc_rfc3339(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 string into a UTC instant
pub fn parse_utc_rfc3339(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}
