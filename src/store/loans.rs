//! Loan repository.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::Loan;

use super::{date_col, decimal_col};

/// A loan joined with the employee's display name.
#[derive(Debug, Clone)]
pub struct LoanRow {
    /// The loan itself.
    pub loan: Loan,
    /// The employee's full name.
    pub employee_name: String,
}

const COLUMNS: &str = "id, employee_id, description, principal, installment, balance, \
                       granted_on, active";

fn map_loan(row: &Row<'_>) -> rusqlite::Result<Loan> {
    Ok(Loan {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        description: row.get(2)?,
        principal: decimal_col(row, 3)?,
        installment: decimal_col(row, 4)?,
        balance: decimal_col(row, 5)?,
        granted_on: date_col(row, 6)?,
        active: row.get(7)?,
    })
}

/// Inserts a new loan; the opening balance equals the principal.
pub fn insert(
    conn: &Connection,
    employee_id: i64,
    description: &str,
    principal: Decimal,
    installment: Decimal,
    granted_on: NaiveDate,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO loans (employee_id, description, principal, installment, balance, \
         granted_on, active) VALUES (?1, ?2, ?3, ?4, ?3, ?5, 1)",
        params![
            employee_id,
            description,
            principal.to_string(),
            installment.to_string(),
            granted_on.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches a loan by id.
pub fn get(conn: &Connection, id: i64) -> AppResult<Loan> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM loans WHERE id = ?1"),
        params![id],
        map_loan,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "loan",
        id,
    })
}

/// Lists all loans joined with employee names, newest first.
pub fn list_with_names(conn: &Connection) -> AppResult<Vec<LoanRow>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.employee_id, l.description, l.principal, l.installment, l.balance, \
                l.granted_on, l.active, e.first_name || ' ' || e.last_name \
         FROM loans l JOIN employees e ON e.id = l.employee_id \
         ORDER BY l.granted_on DESC, l.id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LoanRow {
            loan: map_loan(row)?,
            employee_name: row.get(8)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Lists the active loans of one employee with a balance still owed.
pub fn active_for_employee(conn: &Connection, employee_id: i64) -> AppResult<Vec<Loan>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM loans \
         WHERE employee_id = ?1 AND active = 1 AND CAST(balance AS REAL) > 0 \
         ORDER BY granted_on, id"
    ))?;
    let rows = stmt.query_map(params![employee_id], map_loan)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Deactivates a loan so it stops generating deductions.
pub fn deactivate(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute("UPDATE loans SET active = 0 WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "loan",
            id,
        });
    }
    Ok(())
}

/// Posts a payment against a loan: the balance drops by `amount` (never
/// below zero) and a fully repaid loan is deactivated.
pub fn apply_payment(conn: &Connection, id: i64, amount: Decimal) -> AppResult<()> {
    let loan = get(conn, id)?;
    let remaining = (loan.balance - amount).max(Decimal::ZERO);
    let still_active = loan.active && !remaining.is_zero();
    conn.execute(
        "UPDATE loans SET balance = ?1, active = ?2 WHERE id = ?3",
        params![remaining.to_string(), still_active, id],
    )?;
    Ok(())
}
