//! Payroll record and item repository.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{EntryKind, ItemSource, PayPeriod, PayrollItem, PayrollRecord};

use super::{decimal_col, enum_col, opt_decimal_col};

/// A payroll record joined with the employee's code and name, as shown on
/// the period register.
#[derive(Debug, Clone)]
pub struct RegisterRow {
    /// The payroll record.
    pub record: PayrollRecord,
    /// The employee's code, when set.
    pub employee_code: Option<String>,
    /// The employee's full name.
    pub employee_name: String,
}

/// Fields of a payroll item about to be inserted.
#[derive(Debug, Clone)]
pub struct NewItem {
    /// The record the item belongs to.
    pub record_id: i64,
    /// The catalog entry the item came from, when applicable.
    pub entry_id: Option<i64>,
    /// The loan the item repays, when applicable.
    pub loan_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Benefit or deduction.
    pub kind: EntryKind,
    /// Where the item came from.
    pub source: ItemSource,
    /// Percentage rate, for percentage items.
    pub rate: Option<Decimal>,
    /// Computed amount.
    pub amount: Decimal,
}

const RECORD_COLUMNS: &str = "id, employee_id, period_id, base_salary, payable_days, \
                              period_days, prorated_base, benefits_total, deductions_total, \
                              net_pay";

fn map_record(row: &Row<'_>) -> rusqlite::Result<PayrollRecord> {
    Ok(PayrollRecord {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        period_id: row.get(2)?,
        base_salary: decimal_col(row, 3)?,
        payable_days: row.get(4)?,
        period_days: row.get(5)?,
        prorated_base: decimal_col(row, 6)?,
        benefits_total: decimal_col(row, 7)?,
        deductions_total: decimal_col(row, 8)?,
        net_pay: decimal_col(row, 9)?,
    })
}

fn map_item(row: &Row<'_>) -> rusqlite::Result<PayrollItem> {
    Ok(PayrollItem {
        id: row.get(0)?,
        record_id: row.get(1)?,
        entry_id: row.get(2)?,
        name: row.get(3)?,
        kind: enum_col(row, 4, EntryKind::parse)?,
        source: enum_col(row, 5, ItemSource::parse)?,
        rate: opt_decimal_col(row, 6)?,
        amount: decimal_col(row, 7)?,
    })
}

/// Inserts payroll records for every active employee that has none in the
/// period yet. Salary is snapshotted from the employee; totals start at
/// zero with net equal to the base. Returns the number of records created.
pub fn insert_missing_records(conn: &Connection, period: &PayPeriod) -> AppResult<usize> {
    let inserted = conn.execute(
        "INSERT INTO payroll_records (employee_id, period_id, base_salary, payable_days, \
         period_days, prorated_base, benefits_total, deductions_total, net_pay) \
         SELECT e.id, ?1, e.base_salary, ?2, ?2, e.base_salary, '0', '0', e.base_salary \
         FROM employees e \
         WHERE e.active = 1 AND NOT EXISTS ( \
             SELECT 1 FROM payroll_records rn \
             WHERE rn.employee_id = e.id AND rn.period_id = ?1 \
         )",
        params![period.id, period.days()],
    )?;
    Ok(inserted)
}

/// Fetches one payroll record.
pub fn get_record(conn: &Connection, id: i64) -> AppResult<PayrollRecord> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM payroll_records WHERE id = ?1"),
        params![id],
        map_record,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "payroll record",
        id,
    })
}

/// Lists the records of one period.
pub fn records_for_period(conn: &Connection, period_id: i64) -> AppResult<Vec<PayrollRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM payroll_records WHERE period_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![period_id], map_record)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Lists the records of one period joined with employee names, ordered by
/// employee name for the register page and exports.
pub fn register_for_period(conn: &Connection, period_id: i64) -> AppResult<Vec<RegisterRow>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.employee_id, r.period_id, r.base_salary, r.payable_days, \
                r.period_days, r.prorated_base, r.benefits_total, r.deductions_total, \
                r.net_pay, e.code, e.first_name || ' ' || e.last_name \
         FROM payroll_records r \
         JOIN employees e ON e.id = r.employee_id \
         WHERE r.period_id = ?1 \
         ORDER BY e.last_name, e.first_name",
    )?;
    let rows = stmt.query_map(params![period_id], |row| {
        Ok(RegisterRow {
            record: map_record(row)?,
            employee_code: row.get(10)?,
            employee_name: row.get(11)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Deletes all items of a record ahead of a rebuild.
pub fn clear_items(conn: &Connection, record_id: i64) -> AppResult<()> {
    conn.execute(
        "DELETE FROM payroll_items WHERE record_id = ?1",
        params![record_id],
    )?;
    Ok(())
}

/// Inserts one payroll item.
pub fn insert_item(conn: &Connection, item: &NewItem) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO payroll_items (record_id, entry_id, loan_id, name, kind, source, rate, amount) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            item.record_id,
            item.entry_id,
            item.loan_id,
            item.name,
            item.kind.as_str(),
            item.source.as_str(),
            item.rate.map(|r| r.to_string()),
            item.amount.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists the items of a record in insertion order.
pub fn items_for_record(conn: &Connection, record_id: i64) -> AppResult<Vec<PayrollItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, record_id, entry_id, name, kind, source, rate, amount \
         FROM payroll_items WHERE record_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![record_id], map_item)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Writes the recalculated figures back to a record.
pub fn update_totals(
    conn: &Connection,
    record_id: i64,
    payable_days: i64,
    prorated_base: Decimal,
    benefits_total: Decimal,
    deductions_total: Decimal,
    net_pay: Decimal,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE payroll_records SET payable_days = ?1, prorated_base = ?2, \
         benefits_total = ?3, deductions_total = ?4, net_pay = ?5 WHERE id = ?6",
        params![
            payable_days,
            prorated_base.to_string(),
            benefits_total.to_string(),
            deductions_total.to_string(),
            net_pay.to_string(),
            record_id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "payroll record",
            id: record_id,
        });
    }
    Ok(())
}

/// Sums the loan deduction items of a period, grouped by loan. Used when
/// closing a period to post loan payments.
pub fn loan_totals_for_period(
    conn: &Connection,
    period_id: i64,
) -> AppResult<Vec<(i64, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT i.loan_id, i.amount FROM payroll_items i \
         JOIN payroll_records r ON r.id = i.record_id \
         WHERE r.period_id = ?1 AND i.source = 'loan' AND i.loan_id IS NOT NULL",
    )?;
    let rows = stmt.query_map(params![period_id], |row| {
        Ok((row.get::<_, i64>(0)?, decimal_col(row, 1)?))
    })?;

    let mut totals: Vec<(i64, Decimal)> = Vec::new();
    for row in rows {
        let (loan_id, amount) = row?;
        match totals.iter_mut().find(|(id, _)| *id == loan_id) {
            Some((_, total)) => *total += amount,
            None => totals.push((loan_id, amount)),
        }
    }
    Ok(totals)
}
