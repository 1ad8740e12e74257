//! Attendance punch model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The direction of an attendance punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    /// The employee arrived.
    ClockIn,
    /// The employee left.
    ClockOut,
}

impl PunchKind {
    /// Returns the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchKind::ClockIn => "clock_in",
            PunchKind::ClockOut => "clock_out",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clock_in" => Some(PunchKind::ClockIn),
            "clock_out" => Some(PunchKind::ClockOut),
            _ => None,
        }
    }
}

/// A single attendance punch for an employee.
///
/// Distinct clock-in days within a pay period drive salary proration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// Unique identifier.
    pub id: i64,
    /// The employee who punched.
    pub employee_id: i64,
    /// When the punch happened.
    pub happened_at: DateTime<Utc>,
    /// Clock-in or clock-out.
    pub kind: PunchKind,
    /// Optional free-form note.
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punch_kind_round_trips_through_str() {
        for kind in [PunchKind::ClockIn, PunchKind::ClockOut] {
            assert_eq!(PunchKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PunchKind::parse("break"), None);
    }

    #[test]
    fn test_punch_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&PunchKind::ClockIn).unwrap(),
            "\"clock_in\""
        );
    }
}
