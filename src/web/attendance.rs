//! Attendance pages.

use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::PunchKind;
use crate::models::user::perms;
use crate::store::{attendance, audit, employees};

use super::auth::CurrentUser;
use super::flash::{self, FlashLevel};
use super::forms;
use super::render::{escape, page};
use super::state::AppState;

/// GET /attendance - the latest punches.
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::ATTENDANCE_VIEW)?;
    let flashes = flash::take(&session).await?;

    let rows = {
        let conn = state.db().conn()?;
        attendance::recent_with_names(&conn, 100)?
    };

    let mut table = String::new();
    for row in &rows {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.event.happened_at.format("%Y-%m-%d %H:%M"),
            escape(&row.employee_name),
            row.event.kind.as_str(),
            escape(row.event.note.as_deref().unwrap_or("")),
        ));
    }

    let new_link = if user.can(perms::ATTENDANCE_RECORD) {
        "<p><a href=\"/attendance/new\">Record punch</a></p>"
    } else {
        ""
    };
    let body = format!(
        "{new_link}<table><tr><th>When</th><th>Employee</th><th>Kind</th>\
         <th>Note</th></tr>{table}</table>"
    );
    Ok(page("Attendance", Some(&user), &flashes, &body).into_response())
}

/// GET /attendance/new
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::ATTENDANCE_RECORD)?;
    let flashes = flash::take(&session).await?;

    let employees = {
        let conn = state.db().conn()?;
        employees::list_active(&conn)?
    };

    let options: String = employees
        .iter()
        .map(|e| format!("<option value=\"{}\">{}</option>", e.id, escape(&e.full_name())))
        .collect();
    let body = format!(
        "<form method=\"post\" action=\"/attendance/new\">\
         <label>Employee <select name=\"employee_id\">{options}</select></label>\
         <label>Kind <select name=\"kind\">\
         <option value=\"clock_in\">Clock in</option>\
         <option value=\"clock_out\">Clock out</option></select></label>\
         <label>Note <input name=\"note\"></label>\
         <button type=\"submit\">Record</button></form>"
    );
    Ok(page("Record punch", Some(&user), &flashes, &body).into_response())
}

/// The punch form fields.
#[derive(Debug, Deserialize)]
pub struct PunchForm {
    employee_id: Option<i64>,
    kind: Option<String>,
    note: Option<String>,
}

/// POST /attendance/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Form(form): Form<PunchForm>,
) -> AppResult<Response> {
    user.require(perms::ATTENDANCE_RECORD)?;
    let correlation_id = Uuid::new_v4();

    let (Some(employee_id), Some(kind)) = (
        form.employee_id,
        form.kind.as_deref().and_then(PunchKind::parse),
    ) else {
        flash::push(&session, FlashLevel::Warning, "Employee and kind are required.").await?;
        return Ok(Redirect::to("/attendance/new").into_response());
    };
    let note = forms::non_empty(form.note);

    let exists = {
        let conn = state.db().conn()?;
        employees::exists(&conn, employee_id)?
    };
    if !exists {
        flash::push(&session, FlashLevel::Warning, "Employee does not exist.").await?;
        return Ok(Redirect::to("/attendance/new").into_response());
    }

    let result = {
        let conn = state.db().conn()?;
        attendance::record(&conn, employee_id, Utc::now(), kind, note.as_deref()).and_then(|id| {
            audit::record(
                &conn,
                Some(user.id),
                "record",
                "attendance_event",
                Some(id),
                Some(serde_json::json!({ "employee_id": employee_id, "kind": kind.as_str() })),
                correlation_id,
            )?;
            Ok(id)
        })
    };

    match result {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "Punch recorded.").await?;
            Ok(Redirect::to("/attendance").into_response())
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error recording punch: {err}"))
                .await?;
            Ok(Redirect::to("/attendance/new").into_response())
        }
    }
}
