//! Attendance repository.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row, params};

use crate::error::AppResult;
use crate::models::{AttendanceEvent, PunchKind};

use super::{datetime_col, enum_col};

/// An attendance event joined with the employee's display name.
#[derive(Debug, Clone)]
pub struct AttendanceRow {
    /// The punch itself.
    pub event: AttendanceEvent,
    /// The employee's full name.
    pub employee_name: String,
}

fn map_event(row: &Row<'_>) -> rusqlite::Result<AttendanceEvent> {
    Ok(AttendanceEvent {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        happened_at: datetime_col(row, 2)?,
        kind: enum_col(row, 3, PunchKind::parse)?,
        note: row.get(4)?,
    })
}

/// Records a punch and returns its id.
pub fn record(
    conn: &Connection,
    employee_id: i64,
    happened_at: DateTime<Utc>,
    kind: PunchKind,
    note: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance_events (employee_id, happened_at, kind, note) \
         VALUES (?1, ?2, ?3, ?4)",
        params![employee_id, happened_at.to_rfc3339(), kind.as_str(), note],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists the most recent punches joined with employee names.
pub fn recent_with_names(conn: &Connection, limit: i64) -> AppResult<Vec<AttendanceRow>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.employee_id, a.happened_at, a.kind, a.note, \
                e.first_name || ' ' || e.last_name \
         FROM attendance_events a \
         JOIN employees e ON e.id = a.employee_id \
         ORDER BY a.happened_at DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(AttendanceRow {
            event: map_event(row)?,
            employee_name: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Counts distinct clock-in days for an employee within a date range
/// (inclusive). Drives salary proration.
pub fn worked_days(
    conn: &Connection,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT substr(happened_at, 1, 10)) FROM attendance_events \
         WHERE employee_id = ?1 AND kind = 'clock_in' \
         AND substr(happened_at, 1, 10) BETWEEN ?2 AND ?3",
        params![employee_id, start.to_string(), end.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Returns true if the employee has any punch (of either kind) within the
/// date range. Employees with no punches at all are paid the full period.
pub fn has_punches(
    conn: &Connection,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(1) FROM attendance_events \
         WHERE employee_id = ?1 AND substr(happened_at, 1, 10) BETWEEN ?2 AND ?3",
        params![employee_id, start.to_string(), end.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::store::employees::{self, EmployeeInput};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn test_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn insert_employee(conn: &Connection, name: &str) -> i64 {
        employees::insert(
            conn,
            &EmployeeInput {
                code: None,
                first_name: name.to_string(),
                last_name: "Test".to_string(),
                document_id: None,
                email: None,
                igss_number: None,
                position: None,
                birth_date: None,
                hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                base_salary: Decimal::new(500000, 2),
            },
        )
        .unwrap()
    }

    fn at(date: &str, hour: u32) -> DateTime<Utc> {
        let d: NaiveDate = date.parse().unwrap();
        Utc.from_utc_datetime(&d.and_hms_opt(hour, 0, 0).unwrap())
    }

    #[test]
    fn test_record_and_list_recent() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana");

        record(&conn, employee_id, at("2026-01-05", 8), PunchKind::ClockIn, None).unwrap();
        record(
            &conn,
            employee_id,
            at("2026-01-05", 17),
            PunchKind::ClockOut,
            Some("left early"),
        )
        .unwrap();

        let rows = recent_with_names(&conn, 100).unwrap();
        assert_eq!(rows.len(), 2);
        // Newest first.
        assert_eq!(rows[0].event.kind, PunchKind::ClockOut);
        assert_eq!(rows[0].employee_name, "Ana Test");
        assert_eq!(rows[0].event.note.as_deref(), Some("left early"));
    }

    #[test]
    fn test_worked_days_counts_distinct_clock_in_days() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana");

        // Two punches on the same day count once; clock-outs never count.
        record(&conn, employee_id, at("2026-01-05", 8), PunchKind::ClockIn, None).unwrap();
        record(&conn, employee_id, at("2026-01-05", 13), PunchKind::ClockIn, None).unwrap();
        record(&conn, employee_id, at("2026-01-06", 8), PunchKind::ClockIn, None).unwrap();
        record(&conn, employee_id, at("2026-01-07", 17), PunchKind::ClockOut, None).unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(worked_days(&conn, employee_id, start, end).unwrap(), 2);
    }

    #[test]
    fn test_worked_days_respects_range() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana");

        record(&conn, employee_id, at("2026-01-31", 8), PunchKind::ClockIn, None).unwrap();
        record(&conn, employee_id, at("2026-02-01", 8), PunchKind::ClockIn, None).unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(worked_days(&conn, employee_id, start, end).unwrap(), 1);
    }

    #[test]
    fn test_has_punches_sees_clock_outs() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana");
        let other_id = insert_employee(&conn, "Berta");

        record(&conn, employee_id, at("2026-01-10", 17), PunchKind::ClockOut, None).unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert!(has_punches(&conn, employee_id, start, end).unwrap());
        assert!(!has_punches(&conn, other_id, start, end).unwrap());
    }
}
