//! Employee repository.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::Employee;

use super::{date_col, decimal_col, opt_date_col};

/// Form-level employee fields, shared by create and edit.
#[derive(Debug, Clone)]
pub struct EmployeeInput {
    /// Optional employee code.
    pub code: Option<String>,
    /// Given names.
    pub first_name: String,
    /// Family names.
    pub last_name: String,
    /// Optional national identity document.
    pub document_id: Option<String>,
    /// Optional email.
    pub email: Option<String>,
    /// Optional IGSS affiliation number.
    pub igss_number: Option<String>,
    /// Optional job position.
    pub position: Option<String>,
    /// Optional date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Hire date.
    pub hire_date: NaiveDate,
    /// Monthly base salary.
    pub base_salary: Decimal,
}

const COLUMNS: &str = "id, code, first_name, last_name, document_id, email, igss_number, \
                       position, birth_date, hire_date, termination_date, base_salary, active";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        code: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        document_id: row.get(4)?,
        email: row.get(5)?,
        igss_number: row.get(6)?,
        position: row.get(7)?,
        birth_date: opt_date_col(row, 8)?,
        hire_date: date_col(row, 9)?,
        termination_date: opt_date_col(row, 10)?,
        base_salary: decimal_col(row, 11)?,
        active: row.get(12)?,
    })
}

/// Inserts a new employee and returns its id.
pub fn insert(conn: &Connection, input: &EmployeeInput) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO employees (code, first_name, last_name, document_id, email, igss_number, \
         position, birth_date, hire_date, base_salary, active) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1)",
        params![
            input.code,
            input.first_name,
            input.last_name,
            input.document_id,
            input.email,
            input.igss_number,
            input.position,
            input.birth_date.map(|d| d.to_string()),
            input.hire_date.to_string(),
            input.base_salary.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Updates an existing employee.
pub fn update(conn: &Connection, id: i64, input: &EmployeeInput) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE employees SET code = ?1, first_name = ?2, last_name = ?3, document_id = ?4, \
         email = ?5, igss_number = ?6, position = ?7, birth_date = ?8, hire_date = ?9, \
         base_salary = ?10 WHERE id = ?11",
        params![
            input.code,
            input.first_name,
            input.last_name,
            input.document_id,
            input.email,
            input.igss_number,
            input.position,
            input.birth_date.map(|d| d.to_string()),
            input.hire_date.to_string(),
            input.base_salary.to_string(),
            id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "employee",
            id,
        });
    }
    Ok(())
}

/// Deactivates an employee, optionally recording a termination date.
pub fn deactivate(
    conn: &Connection,
    id: i64,
    termination_date: Option<NaiveDate>,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE employees SET active = 0, termination_date = ?1 WHERE id = ?2",
        params![termination_date.map(|d| d.to_string()), id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "employee",
            id,
        });
    }
    Ok(())
}

/// Fetches an employee by id.
pub fn get(conn: &Connection, id: i64) -> AppResult<Employee> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM employees WHERE id = ?1"),
        params![id],
        map_row,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "employee",
        id,
    })
}

/// Returns true if the employee exists.
pub fn exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(1) FROM employees WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Lists all employees ordered by name.
pub fn list(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM employees ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Lists active employees ordered by name.
pub fn list_active(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM employees WHERE active = 1 ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
