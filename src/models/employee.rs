//! Employee model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee on the payroll.
///
/// `code`, `document_id` and `email` are optional but unique among the
/// rows that carry them.
///
/// # Example
///
/// ```
/// use planilla::models::Employee;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: 1,
///     code: Some("EMP-001".to_string()),
///     first_name: "Ana".to_string(),
///     last_name: "López".to_string(),
///     document_id: None,
///     email: None,
///     igss_number: Some("2301-55".to_string()),
///     position: Some("Accountant".to_string()),
///     birth_date: None,
///     hire_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
///     termination_date: None,
///     base_salary: Decimal::new(600000, 2),
///     active: true,
/// };
/// assert_eq!(employee.full_name(), "Ana López");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier.
    pub id: i64,
    /// Optional employee code (unique among non-null values).
    pub code: Option<String>,
    /// Given names.
    pub first_name: String,
    /// Family names.
    pub last_name: String,
    /// Optional national identity document (unique among non-null values).
    pub document_id: Option<String>,
    /// Optional email (unique among non-null values).
    pub email: Option<String>,
    /// Optional IGSS affiliation number.
    pub igss_number: Option<String>,
    /// Optional job position.
    pub position: Option<String>,
    /// Optional date of birth.
    pub birth_date: Option<NaiveDate>,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// The date the employee left, if any.
    pub termination_date: Option<NaiveDate>,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Whether the employee is included in payroll generation.
    pub active: bool,
}

impl Employee {
    /// Returns the employee's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the employee had already left before the given date.
    pub fn terminated_before(&self, date: NaiveDate) -> bool {
        self.termination_date.is_some_and(|end| end < date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_employee() -> Employee {
        Employee {
            id: 1,
            code: Some("EMP-001".to_string()),
            first_name: "Ana".to_string(),
            last_name: "López".to_string(),
            document_id: Some("1234567890101".to_string()),
            email: Some("ana@example.com".to_string()),
            igss_number: None,
            position: None,
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 4),
            hire_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            termination_date: None,
            base_salary: Decimal::new(600000, 2),
            active: true,
        }
    }

    #[test]
    fn test_full_name_joins_names() {
        assert_eq!(sample_employee().full_name(), "Ana López");
    }

    #[test]
    fn test_terminated_before_without_termination() {
        let employee = sample_employee();
        assert!(!employee.terminated_before(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn test_terminated_before_with_termination() {
        let mut employee = sample_employee();
        employee.termination_date = NaiveDate::from_ymd_opt(2024, 6, 30);
        assert!(employee.terminated_before(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
        assert!(!employee.terminated_before(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
    }

    #[test]
    fn test_serialize_round_trip() {
        let employee = sample_employee();
        let json = serde_json::to_string(&employee).unwrap();
        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, back);
    }
}
