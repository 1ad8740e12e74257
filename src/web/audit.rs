//! Audit log page.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

use crate::error::AppResult;
use crate::models::user::perms;
use crate::store::audit;

use super::auth::CurrentUser;
use super::flash;
use super::render::{escape, page};
use super::state::AppState;

/// GET /audit - the latest audit entries.
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::AUDIT_VIEW)?;
    let flashes = flash::take(&session).await?;

    let entries = {
        let conn = state.db().conn()?;
        audit::recent(&conn, 200)?
    };

    let mut rows = String::new();
    for entry in &entries {
        let details = entry
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        let entity = match entry.entity_id {
            Some(id) => format!("{} #{id}", entry.entity),
            None => entry.entity.clone(),
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            escape(&entry.action),
            escape(&entity),
            escape(&details),
        ));
    }

    let body = format!(
        "<table><tr><th>When</th><th>User</th><th>Action</th><th>Entity</th>\
         <th>Details</th></tr>{rows}</table>"
    );
    Ok(page("Audit log", Some(&user), &flashes, &body).into_response())
}
