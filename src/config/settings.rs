//! Environment-driven runtime settings.

use std::env;

/// Runtime settings for the application.
///
/// All values have development-friendly defaults so the server can start
/// with an empty environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Session inactivity expiry, in minutes.
    pub session_minutes: i64,
    /// Username of the seeded administrator account.
    pub admin_username: String,
    /// Email of the seeded administrator account.
    pub admin_email: String,
    /// Initial password of the seeded administrator account.
    pub admin_password: String,
    /// Bcrypt cost factor for password hashing.
    pub bcrypt_cost: u32,
    /// Optional path to the statutory rates YAML file.
    pub statutory_path: Option<String>,
}

impl Settings {
    /// Builds settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("PLANILLA_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_path: env::var("PLANILLA_DB").unwrap_or_else(|_| "planilla.db".to_string()),
            session_minutes: env::var("PLANILLA_SESSION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            admin_username: env::var("SEED_ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
            admin_email: env::var("SEED_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password: env::var("SEED_ADMIN_PASS").unwrap_or_else(|_| "admin".to_string()),
            bcrypt_cost: env::var("PLANILLA_BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            statutory_path: env::var("PLANILLA_STATUTORY_CONFIG").ok(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path: "planilla.db".to_string(),
            session_minutes: 30,
            admin_username: "admin".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin".to_string(),
            // Low cost keeps seeding fast in tests; from_env uses the
            // bcrypt default.
            bcrypt_cost: 4,
            statutory_path: None,
        }
    }
}
