//! Core data models for the payroll application.
//!
//! This module contains all the domain types used throughout the crate.

pub mod attendance;
pub mod audit;
pub mod catalog;
pub mod employee;
pub mod loan;
pub mod payroll;
pub mod period;
pub mod user;

pub use attendance::{AttendanceEvent, PunchKind};
pub use audit::AuditEntry;
pub use catalog::{CalcMethod, CatalogEntry, EmployeeAssignment, EntryKind};
pub use employee::Employee;
pub use loan::Loan;
pub use payroll::{ItemSource, PayrollItem, PayrollRecord};
pub use period::{PayPeriod, PeriodKind, PeriodStatus};
pub use user::{Role, User};
