//! Row parsing and value conversion helpers.
//!
//! `SQLite` integers are signed 64-bit while case counts are `u64`, and
//! `SQLite`'s `datetime('now')` differs from RFC 3339. These helpers keep the
//! conversions in one place.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Convert a count to a SQL integer.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the value exceeds `i64::MAX`.
pub fn to_sql_int(value: u64, column: &str) -> Result<i64, DatabaseError> {
    i64::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("{column} value {value} exceeds INTEGER range")))
}

/// Read a non-negative INTEGER column as `u64`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails or holds a negative value.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u64::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("negative count {value} in column {idx}")))
}

/// Read an INTEGER column as `i32` (years, ranks).
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails or is out of range.
pub fn get_i32(row: &libsql::Row, idx: i32) -> Result<i32, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    i32::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("value {value} in column {idx} out of range")))
}

/// Round to two decimals, matching a `NUMERIC(18,2)` column.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert_eq!(rfc.year(), 2026);
        assert!(parse_datetime("last tuesday").is_err());
    }

    #[test]
    fn round2_matches_numeric_column() {
        assert!((round2(180.004_9) - 180.0).abs() < f64::EPSILON);
        assert!((round2(12.345_6) - 12.35).abs() < 1e-12);
        assert!((round2(-3.141) + 3.14).abs() < 1e-12);
    }

    #[test]
    fn oversized_count_rejected() {
        assert!(to_sql_int(u64::MAX, "cases").is_err());
        assert_eq!(to_sql_int(64_530, "cases").unwrap(), 64_530);
    }
}
