//! Database access.
//!
//! The application shares a single SQLite connection behind a mutex. Every
//! repository function in [`crate::store`] borrows the connection through
//! the [`Db`] handle.

mod schema;

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params};
use tracing::info;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::models::user::perms;

/// Shared database handle.
///
/// Cloning is cheap; all clones refer to the same connection.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

/// The built-in roles seeded at startup, with the permissions each grants.
fn role_definitions() -> Vec<(&'static str, &'static str, Vec<&'static str>)> {
    let all: Vec<&'static str> = perms::ALL.iter().map(|(code, _)| *code).collect();
    let manager: Vec<&'static str> = all
        .iter()
        .copied()
        .filter(|code| *code != perms::USERS_MANAGE)
        .collect();
    vec![
        ("admin", "Full access", all),
        ("manager", "Payroll operations without user management", manager),
        (
            "clerk",
            "Attendance capture and employee lookup",
            vec![
                perms::EMPLOYEES_VIEW,
                perms::ATTENDANCE_VIEW,
                perms::ATTENDANCE_RECORD,
            ],
        ),
    ]
}

impl Db {
    /// Opens (or creates) the database file at the given path.
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory database. Used by tests.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Locks and returns the underlying connection.
    pub fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| AppError::Internal {
            message: "database lock poisoned".to_string(),
        })
    }

    /// Applies the schema. Safe to call on every startup.
    pub fn migrate(&self) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    /// Seeds permissions, the built-in roles, and the administrator account.
    ///
    /// Existing rows are left untouched, so seeding is idempotent.
    pub fn seed(&self, settings: &Settings) -> AppResult<()> {
        let conn = self.conn()?;

        for (code, description) in perms::ALL {
            conn.execute(
                "INSERT OR IGNORE INTO permissions (code, description) VALUES (?1, ?2)",
                params![code, description],
            )?;
        }

        for (name, description, granted) in role_definitions() {
            conn.execute(
                "INSERT OR IGNORE INTO roles (name, description) VALUES (?1, ?2)",
                params![name, description],
            )?;
            let role_id: i64 = conn.query_row(
                "SELECT id FROM roles WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )?;
            for code in granted {
                conn.execute(
                    "INSERT OR IGNORE INTO role_permissions (role_id, permission_code) \
                     VALUES (?1, ?2)",
                    params![role_id, code],
                )?;
            }
        }

        // Mirror of the admin bootstrap: skip when a user already exists
        // under either the seeded username or email.
        let existing: i64 = conn.query_row(
            "SELECT COUNT(1) FROM users WHERE username = ?1 OR email = ?2",
            params![settings.admin_username, settings.admin_email],
            |row| row.get(0),
        )?;
        if existing == 0 {
            let hash = bcrypt::hash(&settings.admin_password, settings.bcrypt_cost)?;
            let admin_role: i64 =
                conn.query_row("SELECT id FROM roles WHERE name = 'admin'", [], |row| {
                    row.get(0)
                })?;
            conn.execute(
                "INSERT INTO users (username, email, password_hash, role_id, active) \
                 VALUES (?1, ?2, ?3, ?4, 1)",
                params![
                    settings.admin_username,
                    settings.admin_email,
                    hash,
                    admin_role
                ],
            )?;
            info!(username = %settings.admin_username, "seeded administrator account");
        }

        Ok(())
    }
}
