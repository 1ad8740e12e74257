//! Benefit/deduction catalog repository.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{CalcMethod, CatalogEntry, EmployeeAssignment, EntryKind};

use super::{decimal_col, enum_col, opt_decimal_col};

const COLUMNS: &str = "id, name, kind, method, value, active, description";

fn map_entry(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: enum_col(row, 2, EntryKind::parse)?,
        method: enum_col(row, 3, CalcMethod::parse)?,
        value: decimal_col(row, 4)?,
        active: row.get(5)?,
        description: row.get(6)?,
    })
}

fn map_assignment(row: &Row<'_>) -> rusqlite::Result<EmployeeAssignment> {
    let method_override: Option<String> = row.get(3)?;
    Ok(EmployeeAssignment {
        employee_id: row.get(0)?,
        entry_id: row.get(1)?,
        active: row.get(2)?,
        method_override: method_override.as_deref().and_then(CalcMethod::parse),
        value_override: opt_decimal_col(row, 4)?,
    })
}

/// Inserts a new catalog entry and returns its id.
pub fn insert(
    conn: &Connection,
    name: &str,
    kind: EntryKind,
    method: CalcMethod,
    value: Decimal,
    description: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO catalog_entries (name, kind, method, value, active, description) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        params![name, kind.as_str(), method.as_str(), value.to_string(), description],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches an entry by id.
pub fn get(conn: &Connection, id: i64) -> AppResult<CatalogEntry> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM catalog_entries WHERE id = ?1"),
        params![id],
        map_entry,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "catalog entry",
        id,
    })
}

/// Finds an entry by its unique name.
pub fn find_by_name(conn: &Connection, name: &str) -> AppResult<Option<CatalogEntry>> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM catalog_entries WHERE name = ?1"),
            params![name],
            map_entry,
        )
        .optional()?)
}

/// Lists all entries ordered by name.
pub fn list(conn: &Connection) -> AppResult<Vec<CatalogEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM catalog_entries ORDER BY name"
    ))?;
    let rows = stmt.query_map([], map_entry)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Lists active entries ordered by name.
pub fn list_active(conn: &Connection) -> AppResult<Vec<CatalogEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM catalog_entries WHERE active = 1 ORDER BY name"
    ))?;
    let rows = stmt.query_map([], map_entry)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Flips an entry's active flag.
pub fn toggle(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE catalog_entries SET active = CASE WHEN active = 1 THEN 0 ELSE 1 END \
         WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "catalog entry",
            id,
        });
    }
    Ok(())
}

/// Lists the per-employee assignment rows for one employee.
pub fn assignments_for_employee(
    conn: &Connection,
    employee_id: i64,
) -> AppResult<Vec<EmployeeAssignment>> {
    let mut stmt = conn.prepare(
        "SELECT employee_id, entry_id, active, method_override, value_override \
         FROM employee_assignments WHERE employee_id = ?1",
    )?;
    let rows = stmt.query_map(params![employee_id], map_assignment)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Inserts or replaces a per-employee assignment.
pub fn upsert_assignment(conn: &Connection, assignment: &EmployeeAssignment) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employee_assignments \
         (employee_id, entry_id, active, method_override, value_override) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT (employee_id, entry_id) DO UPDATE SET \
         active = excluded.active, method_override = excluded.method_override, \
         value_override = excluded.value_override",
        params![
            assignment.employee_id,
            assignment.entry_id,
            assignment.active,
            assignment.method_override.map(|m| m.as_str()),
            assignment.value_override.map(|v| v.to_string()),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::store::employees::{self, EmployeeInput};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn insert_employee(conn: &Connection) -> i64 {
        employees::insert(
            conn,
            &EmployeeInput {
                code: None,
                first_name: "Ana".to_string(),
                last_name: "Test".to_string(),
                document_id: None,
                email: None,
                igss_number: None,
                position: None,
                birth_date: None,
                hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                base_salary: dec("5000.00"),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_insert_and_find_by_name() {
        let db = test_db();
        let conn = db.conn().unwrap();
        insert(
            &conn,
            "IGSS",
            EntryKind::Deduction,
            CalcMethod::Percentage,
            dec("4.83"),
            Some("Social security"),
        )
        .unwrap();

        let entry = find_by_name(&conn, "IGSS").unwrap().unwrap();
        assert_eq!(entry.kind, EntryKind::Deduction);
        assert_eq!(entry.value, dec("4.83"));
        assert!(entry.active);
        assert!(find_by_name(&conn, "ISR").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let db = test_db();
        let conn = db.conn().unwrap();
        insert(&conn, "IGSS", EntryKind::Deduction, CalcMethod::Percentage, dec("4.83"), None)
            .unwrap();
        let result =
            insert(&conn, "IGSS", EntryKind::Deduction, CalcMethod::Percentage, dec("4.83"), None);
        assert!(matches!(result, Err(AppError::Database { .. })));
    }

    #[test]
    fn test_toggle_flips_active_flag() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let id = insert(&conn, "Bono", EntryKind::Benefit, CalcMethod::Fixed, dec("250"), None)
            .unwrap();

        toggle(&conn, id).unwrap();
        assert!(!get(&conn, id).unwrap().active);
        assert!(list_active(&conn).unwrap().is_empty());

        toggle(&conn, id).unwrap();
        assert!(get(&conn, id).unwrap().active);
    }

    #[test]
    fn test_upsert_assignment_inserts_then_updates() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn);
        let entry_id = insert(
            &conn,
            "IGSS",
            EntryKind::Deduction,
            CalcMethod::Percentage,
            dec("4.83"),
            None,
        )
        .unwrap();

        upsert_assignment(
            &conn,
            &EmployeeAssignment {
                employee_id,
                entry_id,
                active: true,
                method_override: None,
                value_override: Some(dec("2.00")),
            },
        )
        .unwrap();
        upsert_assignment(
            &conn,
            &EmployeeAssignment {
                employee_id,
                entry_id,
                active: false,
                method_override: Some(CalcMethod::Fixed),
                value_override: Some(dec("75.00")),
            },
        )
        .unwrap();

        let assignments = assignments_for_employee(&conn, employee_id).unwrap();
        assert_eq!(assignments.len(), 1);
        assert!(!assignments[0].active);
        assert_eq!(assignments[0].method_override, Some(CalcMethod::Fixed));
        assert_eq!(assignments[0].value_override, Some(dec("75.00")));
    }
}
