//! Users, roles and permissions.

use serde::{Deserialize, Serialize};

/// Permission codes checked by the web handlers.
pub mod perms {
    /// View employee records.
    pub const EMPLOYEES_VIEW: &str = "employees.view";
    /// Create, edit and deactivate employees.
    pub const EMPLOYEES_MANAGE: &str = "employees.manage";
    /// Create and close pay periods.
    pub const PERIODS_MANAGE: &str = "periods.manage";
    /// View payroll registers and payslips.
    pub const PAYROLL_VIEW: &str = "payroll.view";
    /// Generate and recalculate payroll.
    pub const PAYROLL_GENERATE: &str = "payroll.generate";
    /// Manage the benefit/deduction catalog and per-employee overrides.
    pub const CATALOG_MANAGE: &str = "catalog.manage";
    /// View attendance listings.
    pub const ATTENDANCE_VIEW: &str = "attendance.view";
    /// Record attendance punches.
    pub const ATTENDANCE_RECORD: &str = "attendance.record";
    /// Manage employee loans.
    pub const LOANS_MANAGE: &str = "loans.manage";
    /// Manage users and roles.
    pub const USERS_MANAGE: &str = "users.manage";
    /// View the audit log.
    pub const AUDIT_VIEW: &str = "audit.view";
    /// Export CSV/XLSX/PDF reports.
    pub const REPORTS_EXPORT: &str = "reports.export";

    /// Every permission, paired with its description. Seeded at startup.
    pub const ALL: &[(&str, &str)] = &[
        (EMPLOYEES_VIEW, "View employee records"),
        (EMPLOYEES_MANAGE, "Create, edit and deactivate employees"),
        (PERIODS_MANAGE, "Create and close pay periods"),
        (PAYROLL_VIEW, "View payroll registers and payslips"),
        (PAYROLL_GENERATE, "Generate and recalculate payroll"),
        (CATALOG_MANAGE, "Manage the benefit/deduction catalog"),
        (ATTENDANCE_VIEW, "View attendance listings"),
        (ATTENDANCE_RECORD, "Record attendance punches"),
        (LOANS_MANAGE, "Manage employee loans"),
        (USERS_MANAGE, "Manage users and roles"),
        (AUDIT_VIEW, "View the audit log"),
        (REPORTS_EXPORT, "Export CSV/XLSX/PDF reports"),
    ];
}

/// A role grouping a set of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier.
    pub id: i64,
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// An application user.
///
/// Login accepts either the username or the email. Passwords are stored as
/// bcrypt hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Bcrypt password hash. Never serialized to pages.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The role granting this user's permissions.
    pub role_id: i64,
    /// Inactive users cannot log in.
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_codes_are_unique() {
        let mut codes: Vec<&str> = perms::ALL.iter().map(|(code, _)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), perms::ALL.len());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role_id: 1,
            active: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"username\":\"admin\""));
    }
}
