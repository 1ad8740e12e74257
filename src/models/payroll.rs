//! Payroll record and line item models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntryKind;

/// Where a payroll line item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    /// Expanded from an active catalog entry.
    Catalog,
    /// Expanded from a catalog entry with a per-employee override applied.
    EmployeeOverride,
    /// A statutory deduction ensured by the generation step.
    Statutory,
    /// A loan installment.
    Loan,
}

impl ItemSource {
    /// Returns the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSource::Catalog => "catalog",
            ItemSource::EmployeeOverride => "employee_override",
            ItemSource::Statutory => "statutory",
            ItemSource::Loan => "loan",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "catalog" => Some(ItemSource::Catalog),
            "employee_override" => Some(ItemSource::EmployeeOverride),
            "statutory" => Some(ItemSource::Statutory),
            "loan" => Some(ItemSource::Loan),
            _ => None,
        }
    }
}

/// One employee's payroll for one period.
///
/// `base_salary` is a snapshot taken at generation time so later salary
/// edits do not silently change settled periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier.
    pub id: i64,
    /// The employee being paid.
    pub employee_id: i64,
    /// The period the record belongs to.
    pub period_id: i64,
    /// Monthly base salary at generation time.
    pub base_salary: Decimal,
    /// Days the employee is paid for within the period.
    pub payable_days: i64,
    /// Calendar days in the period.
    pub period_days: i64,
    /// Base salary prorated by payable days.
    pub prorated_base: Decimal,
    /// Sum of benefit items.
    pub benefits_total: Decimal,
    /// Sum of deduction items.
    pub deductions_total: Decimal,
    /// Prorated base plus benefits minus deductions.
    pub net_pay: Decimal,
}

impl PayrollRecord {
    /// Returns true when deductions exceed earnings.
    pub fn is_negative(&self) -> bool {
        self.net_pay.is_sign_negative() && !self.net_pay.is_zero()
    }
}

/// A single benefit or deduction line within a payroll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollItem {
    /// Unique identifier.
    pub id: i64,
    /// The payroll record the item belongs to.
    pub record_id: i64,
    /// The catalog entry the item came from, when applicable.
    pub entry_id: Option<i64>,
    /// Display name (catalog name or loan description).
    pub name: String,
    /// Benefit or deduction.
    pub kind: EntryKind,
    /// Where the item came from.
    pub source: ItemSource,
    /// The percentage rate used, for percentage items.
    pub rate: Option<Decimal>,
    /// The computed amount (always non-negative; `kind` carries the sign).
    pub amount: Decimal,
}
