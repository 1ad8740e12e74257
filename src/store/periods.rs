//! Pay period repository.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{AppError, AppResult};
use crate::models::{PayPeriod, PeriodKind, PeriodStatus};

use super::{date_col, datetime_col, enum_col};

const COLUMNS: &str = "id, start_date, end_date, kind, status, created_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<PayPeriod> {
    Ok(PayPeriod {
        id: row.get(0)?,
        start_date: date_col(row, 1)?,
        end_date: date_col(row, 2)?,
        kind: enum_col(row, 3, PeriodKind::parse)?,
        status: enum_col(row, 4, PeriodStatus::parse)?,
        created_at: datetime_col(row, 5)?,
    })
}

/// Inserts a new open period and returns its id.
pub fn insert(
    conn: &Connection,
    start_date: NaiveDate,
    end_date: NaiveDate,
    kind: PeriodKind,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO pay_periods (start_date, end_date, kind, status, created_at) \
         VALUES (?1, ?2, ?3, 'open', ?4)",
        params![
            start_date.to_string(),
            end_date.to_string(),
            kind.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches a period by id.
pub fn get(conn: &Connection, id: i64) -> AppResult<PayPeriod> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM pay_periods WHERE id = ?1"),
        params![id],
        map_row,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "pay period",
        id,
    })
}

/// Lists periods, newest start date first.
pub fn list(conn: &Connection) -> AppResult<Vec<PayPeriod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM pay_periods ORDER BY start_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Marks a period closed.
pub fn close(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE pay_periods SET status = 'closed' WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "pay period",
            id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    fn test_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let id = insert(&conn, date("2026-01-01"), date("2026-01-31"), PeriodKind::Monthly).unwrap();

        let period = get(&conn, id).unwrap();
        assert_eq!(period.kind, PeriodKind::Monthly);
        assert_eq!(period.status, PeriodStatus::Open);
        assert_eq!(period.days(), 31);
    }

    #[test]
    fn test_list_orders_newest_first() {
        let db = test_db();
        let conn = db.conn().unwrap();
        insert(&conn, date("2026-01-01"), date("2026-01-31"), PeriodKind::Monthly).unwrap();
        insert(&conn, date("2026-02-01"), date("2026-02-28"), PeriodKind::Monthly).unwrap();

        let periods = list(&conn).unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start_date, date("2026-02-01"));
    }

    #[test]
    fn test_close_marks_period_closed() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let id = insert(&conn, date("2026-01-01"), date("2026-01-31"), PeriodKind::Monthly).unwrap();

        close(&conn, id).unwrap();

        assert_eq!(get(&conn, id).unwrap().status, PeriodStatus::Closed);
    }

    #[test]
    fn test_close_missing_returns_not_found() {
        let db = test_db();
        let conn = db.conn().unwrap();
        assert!(matches!(
            close(&conn, 42),
            Err(AppError::NotFound { entity: "pay period", id: 42 })
        ));
    }
}
