//! Pay period model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How often a pay period recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// One calendar month.
    Monthly,
    /// Half a month.
    Biweekly,
    /// One week.
    Weekly,
}

impl PeriodKind {
    /// Returns the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Monthly => "monthly",
            PeriodKind::Biweekly => "biweekly",
            PeriodKind::Weekly => "weekly",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(PeriodKind::Monthly),
            "biweekly" => Some(PeriodKind::Biweekly),
            "weekly" => Some(PeriodKind::Weekly),
            _ => None,
        }
    }
}

/// Whether a period still accepts payroll changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Payroll can be generated and recalculated.
    Open,
    /// The period is settled; loan payments have been posted.
    Closed,
}

impl PeriodStatus {
    /// Returns the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Open => "open",
            PeriodStatus::Closed => "closed",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(PeriodStatus::Open),
            "closed" => Some(PeriodStatus::Closed),
            _ => None,
        }
    }
}

/// Represents a pay period with its date range.
///
/// A pay period defines the window payroll records are generated for.
/// Both end dates are inclusive.
///
/// # Example
///
/// ```
/// use planilla::models::{PayPeriod, PeriodKind, PeriodStatus};
/// use chrono::{NaiveDate, Utc};
///
/// let period = PayPeriod {
///     id: 1,
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
///     kind: PeriodKind::Monthly,
///     status: PeriodStatus::Open,
///     created_at: Utc::now(),
/// };
///
/// assert_eq!(period.days(), 31);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Unique identifier.
    pub id: i64,
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
    /// The recurrence kind.
    pub kind: PeriodKind,
    /// Whether the period is open or closed.
    pub status: PeriodStatus,
    /// When the period was created.
    pub created_at: DateTime<Utc>,
}

impl PayPeriod {
    /// Returns the number of calendar days in the period (inclusive).
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Checks if a given date falls within this pay period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if payroll can still be generated for the period.
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january() -> PayPeriod {
        PayPeriod {
            id: 1,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            kind: PeriodKind::Monthly,
            status: PeriodStatus::Open,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_days_is_inclusive() {
        assert_eq!(january().days(), 31);
    }

    #[test]
    fn test_single_day_period_has_one_day() {
        let mut period = january();
        period.end_date = period.start_date;
        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_contains_date_boundaries() {
        let period = january();
        assert!(period.contains_date(period.start_date));
        assert!(period.contains_date(period.end_date));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[test]
    fn test_closed_period_is_not_open() {
        let mut period = january();
        period.status = PeriodStatus::Closed;
        assert!(!period.is_open());
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [PeriodKind::Monthly, PeriodKind::Biweekly, PeriodKind::Weekly] {
            assert_eq!(PeriodKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PeriodKind::parse("quarterly"), None);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [PeriodStatus::Open, PeriodStatus::Closed] {
            assert_eq!(PeriodStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&PeriodKind::Biweekly).unwrap(),
            "\"biweekly\""
        );
    }
}
