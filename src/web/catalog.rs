//! Benefit/deduction catalog pages and per-employee overrides.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CalcMethod, EmployeeAssignment, EntryKind};
use crate::models::user::perms;
use crate::store::{audit, catalog, employees};

use super::auth::CurrentUser;
use super::flash::{self, FlashLevel};
use super::forms;
use super::render::{escape, page};
use super::state::AppState;

/// GET /catalog
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::CATALOG_MANAGE)?;
    let flashes = flash::take(&session).await?;

    let entries = {
        let conn = state.db().conn()?;
        catalog::list(&conn)?
    };

    let mut rows = String::new();
    for entry in &entries {
        let value = match entry.method {
            CalcMethod::Percentage => format!("{}%", entry.value),
            CalcMethod::Fixed => format!("{:.2}", entry.value),
        };
        let status = if entry.active { "active" } else { "inactive" };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><form class=\"inline\" method=\"post\" action=\"/catalog/{}/toggle\">\
             <button type=\"submit\">Toggle</button></form></td></tr>",
            escape(&entry.name),
            entry.kind.as_str(),
            entry.method.as_str(),
            value,
            status,
            entry.id,
        ));
    }

    let body = format!(
        "<p><a href=\"/catalog/new\">New entry</a></p>\
         <table><tr><th>Name</th><th>Kind</th><th>Method</th><th>Value</th>\
         <th>Status</th><th></th></tr>{rows}</table>"
    );
    Ok(page("Benefits and deductions", Some(&user), &flashes, &body).into_response())
}

/// GET /catalog/new
pub async fn new_form(session: Session, user: CurrentUser) -> AppResult<Response> {
    user.require(perms::CATALOG_MANAGE)?;
    let flashes = flash::take(&session).await?;
    let body = r#"<form method="post" action="/catalog/new">
<label>Name <input name="name" required></label>
<label>Kind <select name="kind">
<option value="deduction">Deduction</option>
<option value="benefit">Benefit</option>
</select></label>
<label>Method <select name="method">
<option value="percentage">Percentage of prorated base</option>
<option value="fixed">Fixed amount</option>
</select></label>
<label>Value <input name="value" required></label>
<label>Description <textarea name="description"></textarea></label>
<button type="submit">Create</button></form>"#;
    Ok(page("New catalog entry", Some(&user), &flashes, body).into_response())
}

/// The catalog entry form fields.
#[derive(Debug, Deserialize)]
pub struct EntryForm {
    name: Option<String>,
    kind: Option<String>,
    method: Option<String>,
    value: Option<String>,
    description: Option<String>,
}

/// POST /catalog/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Form(form): Form<EntryForm>,
) -> AppResult<Response> {
    user.require(perms::CATALOG_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let parsed = (|| {
        let name = forms::required("name", form.name)?;
        let kind = forms::required("kind", form.kind)?;
        let method = forms::required("method", form.method)?;
        let value = forms::parse_non_negative("value", &forms::required("value", form.value)?)?;
        Ok::<_, crate::error::AppError>((name, kind, method, value))
    })();

    let (name, kind, method, value) = match parsed {
        Ok(values) => values,
        Err(err) => {
            flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
            return Ok(Redirect::to("/catalog/new").into_response());
        }
    };
    let (Some(kind), Some(method)) = (EntryKind::parse(&kind), CalcMethod::parse(&method)) else {
        flash::push(&session, FlashLevel::Warning, "Unknown kind or method.").await?;
        return Ok(Redirect::to("/catalog/new").into_response());
    };
    let description = forms::non_empty(form.description);

    let result = {
        let conn = state.db().conn()?;
        catalog::insert(&conn, &name, kind, method, value, description.as_deref()).and_then(|id| {
            audit::record(
                &conn,
                Some(user.id),
                "create",
                "catalog_entry",
                Some(id),
                Some(serde_json::json!({ "name": name })),
                correlation_id,
            )?;
            Ok(id)
        })
    };

    match result {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "Catalog entry created.").await?;
            Ok(Redirect::to("/catalog").into_response())
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error creating entry: {err}"))
                .await?;
            Ok(Redirect::to("/catalog/new").into_response())
        }
    }
}

/// POST /catalog/:id/toggle
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::CATALOG_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let result = {
        let conn = state.db().conn()?;
        catalog::toggle(&conn, id).and_then(|_| {
            audit::record(
                &conn,
                Some(user.id),
                "toggle",
                "catalog_entry",
                Some(id),
                None,
                correlation_id,
            )?;
            Ok(())
        })
    };

    match result {
        Ok(()) => flash::push(&session, FlashLevel::Success, "Status updated.").await?,
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error updating status: {err}"))
                .await?
        }
    }
    Ok(Redirect::to("/catalog").into_response())
}

/// GET /employees/:id/benefits - the per-employee override page.
pub async fn employee_benefits_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::CATALOG_MANAGE)?;
    let flashes = flash::take(&session).await?;

    let (employee, entries, assignments) = {
        let conn = state.db().conn()?;
        let employee = employees::get(&conn, id)?;
        let entries = catalog::list(&conn)?;
        let assignments = catalog::assignments_for_employee(&conn, id)?;
        (employee, entries, assignments)
    };

    let mut rows = String::new();
    for entry in &entries {
        let assignment = assignments.iter().find(|a| a.entry_id == entry.id);
        let effective = match assignment {
            Some(a) if !a.active => "excluded".to_string(),
            Some(a) => format!(
                "{} {}",
                a.effective_method(entry).as_str(),
                a.effective_value(entry)
            ),
            None => format!("{} {}", entry.method.as_str(), entry.value),
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td>\
             <td><form class=\"inline\" method=\"post\" action=\"/employees/{}/benefits\">\
             <input type=\"hidden\" name=\"entry_id\" value=\"{}\">\
             <select name=\"active\"><option value=\"true\">apply</option>\
             <option value=\"false\">exclude</option></select>\
             <input name=\"value_override\" placeholder=\"override value\">\
             <button type=\"submit\">Save</button></form></td></tr>",
            escape(&entry.name),
            entry.kind.as_str(),
            effective,
            id,
            entry.id,
        ));
    }

    let title = format!("Benefits for {}", employee.full_name());
    let body = format!(
        "<table><tr><th>Entry</th><th>Kind</th><th>In effect</th><th>Override</th></tr>{rows}</table>"
    );
    Ok(page(&title, Some(&user), &flashes, &body).into_response())
}

/// The override form fields.
#[derive(Debug, Deserialize)]
pub struct OverrideForm {
    entry_id: Option<i64>,
    active: Option<String>,
    method_override: Option<String>,
    value_override: Option<String>,
}

/// POST /employees/:id/benefits
pub async fn employee_benefits_submit(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<OverrideForm>,
) -> AppResult<Response> {
    user.require(perms::CATALOG_MANAGE)?;
    let correlation_id = Uuid::new_v4();
    let back = format!("/employees/{id}/benefits");

    let Some(entry_id) = form.entry_id else {
        flash::push(&session, FlashLevel::Warning, "Missing catalog entry.").await?;
        return Ok(Redirect::to(&back).into_response());
    };
    let active = form.active.as_deref() != Some("false");
    let method_override = forms::non_empty(form.method_override)
        .as_deref()
        .and_then(CalcMethod::parse);
    let value_override = match forms::non_empty(form.value_override) {
        Some(text) => match forms::parse_non_negative("value_override", &text) {
            Ok(value) => Some(value),
            Err(err) => {
                flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
                return Ok(Redirect::to(&back).into_response());
            }
        },
        None => None,
    };

    let result = {
        let conn = state.db().conn()?;
        // The entry must exist before writing the override row.
        catalog::get(&conn, entry_id).and_then(|_| {
            catalog::upsert_assignment(
                &conn,
                &EmployeeAssignment {
                    employee_id: id,
                    entry_id,
                    active,
                    method_override,
                    value_override,
                },
            )?;
            audit::record(
                &conn,
                Some(user.id),
                "override",
                "employee_assignment",
                Some(entry_id),
                Some(serde_json::json!({ "employee_id": id, "active": active })),
                correlation_id,
            )?;
            Ok(())
        })
    };

    match result {
        Ok(()) => flash::push(&session, FlashLevel::Success, "Override saved.").await?,
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error saving override: {err}"))
                .await?
        }
    }
    Ok(Redirect::to(&back).into_response())
}
