//! User, role and permission repository.

use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{AppError, AppResult};
use crate::models::{Role, User};

/// A user joined with their role name, for the users page.
#[derive(Debug, Clone)]
pub struct UserRow {
    /// The user.
    pub user: User,
    /// The name of the user's role.
    pub role_name: String,
}

const COLUMNS: &str = "id, username, email, password_hash, role_id, active";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role_id: row.get(4)?,
        active: row.get(5)?,
    })
}

/// Looks up a user by username or email, the way the login form accepts
/// either.
pub fn find_for_login(conn: &Connection, username_or_email: &str) -> AppResult<Option<User>> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE username = ?1 OR email = ?1"),
            params![username_or_email],
            map_user,
        )
        .optional()?)
}

/// Fetches a user by id.
pub fn get(conn: &Connection, id: i64) -> AppResult<User> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        map_user,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "user",
        id,
    })
}

/// Returns the permission codes granted through the user's role.
pub fn permissions_for_user(conn: &Connection, user_id: i64) -> AppResult<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT rp.permission_code FROM role_permissions rp \
         JOIN users u ON u.role_id = rp.role_id WHERE u.id = ?1",
    )?;
    let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<rusqlite::Result<HashSet<_>>>()?)
}

/// Inserts a new active user and returns its id.
pub fn insert(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    role_id: i64,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, role_id, active) \
         VALUES (?1, ?2, ?3, ?4, 1)",
        params![username, email, password_hash, role_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Flips a user's active flag.
pub fn toggle_active(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE users SET active = CASE WHEN active = 1 THEN 0 ELSE 1 END WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "user",
            id,
        });
    }
    Ok(())
}

/// Lists all users joined with their role names.
pub fn list_with_roles(conn: &Connection) -> AppResult<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.email, u.password_hash, u.role_id, u.active, r.name \
         FROM users u JOIN roles r ON r.id = u.role_id ORDER BY u.username",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(UserRow {
            user: map_user(row)?,
            role_name: row.get(6)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Lists all roles ordered by name.
pub fn roles(conn: &Connection) -> AppResult<Vec<Role>> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM roles ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Role {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::db::Db;
    use crate::models::user::perms;

    fn seeded_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.seed(&Settings::default()).unwrap();
        db
    }

    #[test]
    fn test_find_for_login_by_username_and_email() {
        let db = seeded_db();
        let conn = db.conn().unwrap();

        let by_name = find_for_login(&conn, "admin").unwrap().unwrap();
        let by_email = find_for_login(&conn, "admin@example.com").unwrap().unwrap();
        assert_eq!(by_name.id, by_email.id);

        assert!(find_for_login(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn test_admin_has_users_manage_permission() {
        let db = seeded_db();
        let conn = db.conn().unwrap();
        let admin = find_for_login(&conn, "admin").unwrap().unwrap();

        let granted = permissions_for_user(&conn, admin.id).unwrap();
        assert!(granted.contains(perms::USERS_MANAGE));
        assert_eq!(granted.len(), perms::ALL.len());
    }

    #[test]
    fn test_clerk_user_has_limited_permissions() {
        let db = seeded_db();
        let conn = db.conn().unwrap();
        let clerk_role = roles(&conn)
            .unwrap()
            .into_iter()
            .find(|r| r.name == "clerk")
            .unwrap();
        let id = insert(&conn, "clerk1", "clerk1@example.com", "$2b$04$hash", clerk_role.id)
            .unwrap();

        let granted = permissions_for_user(&conn, id).unwrap();
        assert!(granted.contains(perms::ATTENDANCE_RECORD));
        assert!(!granted.contains(perms::PAYROLL_GENERATE));
    }

    #[test]
    fn test_toggle_active_flips_flag() {
        let db = seeded_db();
        let conn = db.conn().unwrap();
        let admin = find_for_login(&conn, "admin").unwrap().unwrap();

        toggle_active(&conn, admin.id).unwrap();
        assert!(!get(&conn, admin.id).unwrap().active);
        toggle_active(&conn, admin.id).unwrap();
        assert!(get(&conn, admin.id).unwrap().active);
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let db = seeded_db();
        let conn = db.conn().unwrap();
        let role_id = roles(&conn).unwrap()[0].id;
        let result = insert(&conn, "admin", "other@example.com", "$2b$04$hash", role_id);
        assert!(matches!(result, Err(AppError::Database { .. })));
    }
}
