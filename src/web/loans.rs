//! Loan pages.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::perms;
use crate::store::{audit, employees, loans};

use super::auth::CurrentUser;
use super::flash::{self, FlashLevel};
use super::forms;
use super::render::{escape, page};
use super::state::AppState;

/// GET /loans
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::LOANS_MANAGE)?;
    let flashes = flash::take(&session).await?;

    let rows = {
        let conn = state.db().conn()?;
        loans::list_with_names(&conn)?
    };

    let mut table = String::new();
    for row in &rows {
        let loan = &row.loan;
        let status = if !loan.active {
            "inactive"
        } else if loan.is_settled() {
            "settled"
        } else {
            "active"
        };
        let actions = if loan.active {
            format!(
                "<form class=\"inline\" method=\"post\" action=\"/loans/{}/deactivate\">\
                 <button type=\"submit\">Deactivate</button></form>",
                loan.id
            )
        } else {
            String::new()
        };
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td>\
             <td>{:.2}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.employee_name),
            escape(&loan.description),
            loan.granted_on,
            loan.principal,
            loan.installment,
            loan.balance,
            status,
            actions,
        ));
    }

    let body = format!(
        "<p><a href=\"/loans/new\">New loan</a></p>\
         <table><tr><th>Employee</th><th>Description</th><th>Granted</th>\
         <th>Principal</th><th>Installment</th><th>Balance</th><th>Status</th><th></th></tr>\
         {table}</table>"
    );
    Ok(page("Loans", Some(&user), &flashes, &body).into_response())
}

/// GET /loans/new
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::LOANS_MANAGE)?;
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
        "<form method=\"post\" action=\"/loans/new\">\
         <label>Employee <select name=\"employee_id\">{options}</select></label>\
         <label>Description <input name=\"description\" required></label>\
         <label>Principal <input name=\"principal\" required></label>\
         <label>Installment per period <input name=\"installment\" required></label>\
         <label>Granted on <input type=\"date\" name=\"granted_on\" required></label>\
         <button type=\"submit\">Create</button></form>"
    );
    Ok(page("New loan", Some(&user), &flashes, &body).into_response())
}

/// The loan form fields.
#[derive(Debug, Deserialize)]
pub struct LoanForm {
    employee_id: Option<i64>,
    description: Option<String>,
    principal: Option<String>,
    installment: Option<String>,
    granted_on: Option<String>,
}

/// POST /loans/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Form(form): Form<LoanForm>,
) -> AppResult<Response> {
    user.require(perms::LOANS_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let parsed = (|| {
        let employee_id = form.employee_id.ok_or(AppError::Validation {
            field: "employee_id",
            message: "is required".to_string(),
        })?;
        let description = forms::required("description", form.description)?;
        let principal =
            forms::parse_non_negative("principal", &forms::required("principal", form.principal)?)?;
        let installment = forms::parse_non_negative(
            "installment",
            &forms::required("installment", form.installment)?,
        )?;
        let granted_on =
            forms::parse_date("granted_on", &forms::required("granted_on", form.granted_on)?)?;
        if installment > principal {
            return Err(AppError::Validation {
                field: "installment",
                message: "cannot exceed the principal".to_string(),
            });
        }
        Ok::<_, AppError>((employee_id, description, principal, installment, granted_on))
    })();

    let (employee_id, description, principal, installment, granted_on) = match parsed {
        Ok(values) => values,
        Err(err) => {
            flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
            return Ok(Redirect::to("/loans/new").into_response());
        }
    };

    let result = {
        let conn = state.db().conn()?;
        employees::get(&conn, employee_id).and_then(|_| {
            let id = loans::insert(&conn, employee_id, &description, principal, installment, granted_on)?;
            audit::record(
                &conn,
                Some(user.id),
                "create",
                "loan",
                Some(id),
                Some(serde_json::json!({
                    "employee_id": employee_id,
                    "principal": principal.to_string(),
                })),
                correlation_id,
            )?;
            Ok(id)
        })
    };

    match result {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "Loan created.").await?;
            Ok(Redirect::to("/loans").into_response())
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error creating loan: {err}"))
                .await?;
            Ok(Redirect::to("/loans/new").into_response())
        }
    }
}

/// POST /loans/:id/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::LOANS_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let result = {
        let conn = state.db().conn()?;
        loans::deactivate(&conn, id).and_then(|_| {
            audit::record(
                &conn,
                Some(user.id),
                "deactivate",
                "loan",
                Some(id),
                None,
                correlation_id,
            )?;
            Ok(())
        })
    };

    match result {
        Ok(()) => flash::push(&session, FlashLevel::Success, "Loan deactivated.").await?,
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error deactivating loan: {err}"))
                .await?
        }
    }
    Ok(Redirect::to("/loans").into_response())
}
