//! Audit log repository.

use chrono::Utc;
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::AuditEntry;

use super::{bad_column, datetime_col};

/// Appends one entry to the audit trail.
pub fn record(
    conn: &Connection,
    user_id: Option<i64>,
    action: &str,
    entity: &str,
    entity_id: Option<i64>,
    details: Option<serde_json::Value>,
    correlation_id: Uuid,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO audit_log (user_id, action, entity, entity_id, details, correlation_id, \
         created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            action,
            entity,
            entity_id,
            details.map(|d| d.to_string()),
            correlation_id.to_string(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists the most recent audit entries.
pub fn recent(conn: &Connection, limit: i64) -> AppResult<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, action, entity, entity_id, details, correlation_id, created_at \
         FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        let details: Option<String> = row.get(5)?;
        let correlation: String = row.get(6)?;
        Ok(AuditEntry {
            id: row.get(0)?,
            user_id: row.get(1)?,
            action: row.get(2)?,
            entity: row.get(3)?,
            entity_id: row.get(4)?,
            details: match details {
                Some(text) => {
                    Some(serde_json::from_str(&text).map_err(|_| bad_column(5, text))?)
                }
                None => None,
            },
            correlation_id: Uuid::parse_str(&correlation)
                .map_err(|_| bad_column(6, correlation))?,
            created_at: datetime_col(row, 7)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
