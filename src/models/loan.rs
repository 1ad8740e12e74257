//! Employee loan model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loan granted to an employee, repaid through payroll deductions.
///
/// Each open period deducts one installment (capped at the remaining
/// balance). Balances move only when a period is closed, so recalculating
/// an open period never double-charges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier.
    pub id: i64,
    /// The employee who owes the loan.
    pub employee_id: i64,
    /// Free-form description ("Adelanto diciembre").
    pub description: String,
    /// The amount originally lent.
    pub principal: Decimal,
    /// The amount deducted per pay period.
    pub installment: Decimal,
    /// The amount still owed.
    pub balance: Decimal,
    /// The date the loan was granted.
    pub granted_on: NaiveDate,
    /// Whether the loan still participates in payroll deductions.
    pub active: bool,
}

impl Loan {
    /// Returns the deduction for the next period: the installment, capped
    /// at the outstanding balance.
    pub fn next_installment(&self) -> Decimal {
        self.installment.min(self.balance)
    }

    /// Returns true once the balance has been fully repaid.
    pub fn is_settled(&self) -> bool {
        self.balance.is_zero()
    }
}
