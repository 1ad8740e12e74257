//! Audit log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded action in the audit trail.
///
/// Every mutating operation writes one entry. The correlation id groups
/// entries produced by the same request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier.
    pub id: i64,
    /// The user who performed the action, if authenticated.
    pub user_id: Option<i64>,
    /// The action performed (e.g. "create", "generate", "login_failed").
    pub action: String,
    /// The entity type acted on (e.g. "employee", "pay_period").
    pub entity: String,
    /// The identifier of the entity, when one exists.
    pub entity_id: Option<i64>,
    /// Structured details about the action.
    pub details: Option<serde_json::Value>,
    /// Groups entries produced by the same request.
    pub correlation_id: Uuid,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
