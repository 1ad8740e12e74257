//! Benefit/deduction catalog models.
//!
//! The catalog is the configurable list of pay additions and subtractions.
//! Active entries apply to every employee; an [`EmployeeAssignment`] row can
//! deactivate an entry for one employee or override its method and value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a catalog entry adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Added to pay (bonuses, allowances).
    Benefit,
    /// Subtracted from pay (IGSS, ISR, discounts).
    Deduction,
}

impl EntryKind {
    /// Returns the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Benefit => "benefit",
            EntryKind::Deduction => "deduction",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "benefit" => Some(EntryKind::Benefit),
            "deduction" => Some(EntryKind::Deduction),
            _ => None,
        }
    }
}

/// How a catalog entry's amount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcMethod {
    /// A percentage of the prorated base salary.
    Percentage,
    /// A fixed amount per period.
    Fixed,
}

impl CalcMethod {
    /// Returns the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalcMethod::Percentage => "percentage",
            CalcMethod::Fixed => "fixed",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(CalcMethod::Percentage),
            "fixed" => Some(CalcMethod::Fixed),
            _ => None,
        }
    }
}

/// A configurable benefit or deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identifier.
    pub id: i64,
    /// Unique display name (e.g. "IGSS", "Bono mensual").
    pub name: String,
    /// Benefit or deduction.
    pub kind: EntryKind,
    /// Percentage or fixed amount.
    pub method: CalcMethod,
    /// The percentage rate or fixed amount, depending on `method`.
    pub value: Decimal,
    /// Whether the entry participates in payroll generation.
    pub active: bool,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// A per-employee override of a catalog entry.
///
/// A `None` override falls through to the catalog value, matching the
/// nullable override columns of the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAssignment {
    /// The employee the override applies to.
    pub employee_id: i64,
    /// The catalog entry being overridden.
    pub entry_id: i64,
    /// When false, the entry is skipped for this employee.
    pub active: bool,
    /// Optional replacement calculation method.
    pub method_override: Option<CalcMethod>,
    /// Optional replacement value.
    pub value_override: Option<Decimal>,
}

impl EmployeeAssignment {
    /// Returns the calculation method in effect for this employee.
    pub fn effective_method(&self, entry: &CatalogEntry) -> CalcMethod {
        self.method_override.unwrap_or(entry.method)
    }

    /// Returns the value in effect for this employee.
    pub fn effective_value(&self, entry: &CatalogEntry) -> Decimal {
        self.value_override.unwrap_or(entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn igss_entry() -> CatalogEntry {
        CatalogEntry {
            id: 1,
            name: "IGSS".to_string(),
            kind: EntryKind::Deduction,
            method: CalcMethod::Percentage,
            value: dec("4.83"),
            active: true,
            description: None,
        }
    }

    #[test]
    fn test_assignment_without_overrides_uses_catalog() {
        let entry = igss_entry();
        let assignment = EmployeeAssignment {
            employee_id: 1,
            entry_id: 1,
            active: true,
            method_override: None,
            value_override: None,
        };
        assert_eq!(assignment.effective_method(&entry), CalcMethod::Percentage);
        assert_eq!(assignment.effective_value(&entry), dec("4.83"));
    }

    #[test]
    fn test_assignment_overrides_value_only() {
        let entry = igss_entry();
        let assignment = EmployeeAssignment {
            employee_id: 1,
            entry_id: 1,
            active: true,
            method_override: None,
            value_override: Some(dec("2.50")),
        };
        assert_eq!(assignment.effective_method(&entry), CalcMethod::Percentage);
        assert_eq!(assignment.effective_value(&entry), dec("2.50"));
    }

    #[test]
    fn test_assignment_overrides_method_and_value() {
        let entry = igss_entry();
        let assignment = EmployeeAssignment {
            employee_id: 1,
            entry_id: 1,
            active: true,
            method_override: Some(CalcMethod::Fixed),
            value_override: Some(dec("100.00")),
        };
        assert_eq!(assignment.effective_method(&entry), CalcMethod::Fixed);
        assert_eq!(assignment.effective_value(&entry), dec("100.00"));
    }

    #[test]
    fn test_entry_kind_round_trips_through_str() {
        for kind in [EntryKind::Benefit, EntryKind::Deduction] {
            assert_eq!(EntryKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntryKind::parse("bonus"), None);
    }

    #[test]
    fn test_calc_method_serialization() {
        assert_eq!(
            serde_json::to_string(&CalcMethod::Percentage).unwrap(),
            "\"percentage\""
        );
        assert_eq!(serde_json::to_string(&CalcMethod::Fixed).unwrap(), "\"fixed\"");
    }
}
