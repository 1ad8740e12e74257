//! Error types for the payroll application.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while serving requests.

use thiserror::Error;

/// The main error type for the payroll application.
///
/// All fallible operations in the crate return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use planilla::error::AppError;
///
/// let error = AppError::NotFound {
///     entity: "employee",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "employee 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// A database operation failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying SQLite error.
        #[from]
        source: rusqlite::Error,
    },

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: i64,
    },

    /// Submitted form data failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The field that was invalid.
        field: &'static str,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The request has no authenticated session.
    #[error("authentication required")]
    Unauthenticated,

    /// The authenticated user lacks a required permission.
    #[error("permission '{permission}' required")]
    Forbidden {
        /// The permission code that was missing.
        permission: &'static str,
    },

    /// A payroll operation was attempted against a closed period.
    #[error("pay period {period_id} is closed")]
    PeriodClosed {
        /// The identifier of the closed period.
        period_id: i64,
    },

    /// Configuration file was not found at the specified path.
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Password hashing or verification failed.
    #[error("password hashing error: {message}")]
    PasswordHash {
        /// A description of the failure.
        message: String,
    },

    /// Report generation (CSV/XLSX/PDF) failed.
    #[error("report generation error: {message}")]
    Report {
        /// A description of the failure.
        message: String,
    },

    /// Session storage failed.
    #[error("session error: {message}")]
    Session {
        /// A description of the failure.
        message: String,
    },

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::PasswordHash {
            message: err.to_string(),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Session {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = AppError::NotFound {
            entity: "employee",
            id: 7,
        };
        assert_eq!(error.to_string(), "employee 7 not found");
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = AppError::Validation {
            field: "base_salary",
            message: "cannot be negative".to_string(),
        };
        assert_eq!(error.to_string(), "invalid base_salary: cannot be negative");
    }

    #[test]
    fn test_forbidden_displays_permission() {
        let error = AppError::Forbidden {
            permission: "payroll.generate",
        };
        assert_eq!(error.to_string(), "permission 'payroll.generate' required");
    }

    #[test]
    fn test_period_closed_displays_id() {
        let error = AppError::PeriodClosed { period_id: 3 };
        assert_eq!(error.to_string(), "pay period 3 is closed");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = AppError::ConfigNotFound {
            path: "/missing/statutory.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "configuration file not found: /missing/statutory.yaml"
        );
    }

    #[test]
    fn test_database_error_from_rusqlite() {
        let error: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(error, AppError::Database { .. }));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<AppError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> AppResult<()> {
            Err(AppError::NotFound {
                entity: "loan",
                id: 1,
            })
        }

        fn propagates_error() -> AppResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
