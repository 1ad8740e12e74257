//! SQL repositories.
//!
//! Each submodule owns the statements for one entity. Repositories take a
//! `&rusqlite::Connection` so multi-step operations (payroll generation,
//! period close) can run under a single lock.
//!
//! Money is stored as TEXT (`rust_decimal` strings), dates as ISO-8601
//! strings and timestamps as RFC 3339 strings, so lexicographic ordering
//! matches chronological ordering.

pub mod attendance;
pub mod audit;
pub mod catalog;
pub mod employees;
pub mod loans;
pub mod payroll;
pub mod periods;
pub mod users;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rusqlite::Row;
use rusqlite::types::Type;

/// Error raised when a TEXT column holds a value the models cannot parse.
#[derive(Debug)]
struct InvalidColumn(String);

impl fmt::Display for InvalidColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid column value: {}", self.0)
    }
}

impl std::error::Error for InvalidColumn {}

fn bad_column(idx: usize, value: impl Into<String>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(InvalidColumn(value.into())))
}

/// Reads a `Decimal` stored as TEXT.
pub(crate) fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text).map_err(|_| bad_column(idx, text))
}

/// Reads an optional `Decimal` stored as TEXT.
pub(crate) fn opt_decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let text: Option<String> = row.get(idx)?;
    match text {
        Some(text) => Decimal::from_str(&text)
            .map(Some)
            .map_err(|_| bad_column(idx, text)),
        None => Ok(None),
    }
}

/// Reads a `NaiveDate` stored as an ISO-8601 string.
pub(crate) fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::from_str(&text).map_err(|_| bad_column(idx, text))
}

/// Reads an optional `NaiveDate` stored as an ISO-8601 string.
pub(crate) fn opt_date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    match text {
        Some(text) => NaiveDate::from_str(&text)
            .map(Some)
            .map_err(|_| bad_column(idx, text)),
        None => Ok(None),
    }
}

/// Reads a UTC timestamp stored as an RFC 3339 string.
pub(crate) fn datetime_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| bad_column(idx, text))
}

/// Parses an enum column through the model's `parse` function.
pub(crate) fn enum_col<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    parse(&text).ok_or_else(|| bad_column(idx, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use rusqlite::params;

    #[test]
    fn test_decimal_round_trips_through_text() {
        let db = Db::open_in_memory().unwrap();
        let conn = db.conn().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT)").unwrap();
        conn.execute("INSERT INTO t (v) VALUES (?1)", params!["4.83"])
            .unwrap();
        let value: Decimal = conn
            .query_row("SELECT v FROM t", [], |row| decimal_col(row, 0))
            .unwrap();
        assert_eq!(value, Decimal::new(483, 2));
    }

    #[test]
    fn test_invalid_decimal_text_is_an_error() {
        let db = Db::open_in_memory().unwrap();
        let conn = db.conn().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT)").unwrap();
        conn.execute("INSERT INTO t (v) VALUES ('not-a-number')", [])
            .unwrap();
        let result = conn.query_row("SELECT v FROM t", [], |row| decimal_col(row, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_rfc3339_ordering_matches_chronology() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(90);
        assert!(earlier.to_rfc3339() < later.to_rfc3339());
    }
}
