//! Expansion of catalog entries into payroll line items.

use rust_decimal::Decimal;
use rusqlite::Connection;

use crate::error::AppResult;
use crate::models::{CalcMethod, EntryKind, ItemSource, Loan};
use crate::store::catalog;

/// A computed line item, before being written to a payroll record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
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
    /// The percentage rate applied, for percentage items.
    pub rate: Option<Decimal>,
    /// The computed amount.
    pub amount: Decimal,
}

/// Computes an item amount from its method and value.
///
/// Percentage items apply to the prorated base and round to two decimal
/// places; fixed items are taken as-is.
pub fn item_amount(method: CalcMethod, value: Decimal, prorated_base: Decimal) -> Decimal {
    match method {
        CalcMethod::Percentage => (prorated_base * value / Decimal::ONE_HUNDRED).round_dp(2),
        CalcMethod::Fixed => value,
    }
}

/// Expands the active catalog against one employee's assignment rows.
///
/// Every active catalog entry applies unless the employee's assignment row
/// deactivates it; overrides replace the method and/or value. Entries whose
/// names appear in `statutory_names` are tagged with the statutory source.
pub fn expand_catalog(
    conn: &Connection,
    employee_id: i64,
    prorated_base: Decimal,
    statutory_names: &[String],
) -> AppResult<Vec<ResolvedItem>> {
    let entries = catalog::list_active(conn)?;
    let assignments = catalog::assignments_for_employee(conn, employee_id)?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
        let assignment = assignments.iter().find(|a| a.entry_id == entry.id);

        if assignment.is_some_and(|a| !a.active) {
            continue;
        }

        let (method, value, overridden) = match assignment {
            Some(a) => (
                a.effective_method(entry),
                a.effective_value(entry),
                a.method_override.is_some() || a.value_override.is_some(),
            ),
            None => (entry.method, entry.value, false),
        };

        let source = if overridden {
            ItemSource::EmployeeOverride
        } else if statutory_names.iter().any(|n| n == &entry.name) {
            ItemSource::Statutory
        } else {
            ItemSource::Catalog
        };

        items.push(ResolvedItem {
            entry_id: Some(entry.id),
            loan_id: None,
            name: entry.name.clone(),
            kind: entry.kind,
            source,
            rate: (method == CalcMethod::Percentage).then_some(value),
            amount: item_amount(method, value, prorated_base),
        });
    }
    Ok(items)
}

/// Builds the loan installment items for one employee.
pub fn loan_items(loans: &[Loan]) -> Vec<ResolvedItem> {
    loans
        .iter()
        .filter(|loan| !loan.next_installment().is_zero())
        .map(|loan| ResolvedItem {
            entry_id: None,
            loan_id: Some(loan.id),
            name: loan.description.clone(),
            kind: EntryKind::Deduction,
            source: ItemSource::Loan,
            rate: None,
            amount: loan.next_installment(),
        })
        .collect()
}
