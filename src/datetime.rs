//! Date/time helpers for database timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format used by `SQL_NOW` on every backend.
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a database timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
pub fn parse_db_datetime(datetime_str: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(datetime_str, DB_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
