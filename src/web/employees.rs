//! Employee pages.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::user::perms;
use crate::store::audit;
use crate::store::employees::{self, EmployeeInput};

use super::auth::CurrentUser;
use super::flash::{self, FlashLevel};
use super::forms;
use super::render::{escape, page};
use super::state::AppState;

/// The employee create/edit form fields.
#[derive(Debug, Deserialize)]
pub struct EmployeeForm {
    code: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    document_id: Option<String>,
    email: Option<String>,
    igss_number: Option<String>,
    position: Option<String>,
    birth_date: Option<String>,
    hire_date: Option<String>,
    base_salary: Option<String>,
}

fn build_input(form: EmployeeForm) -> AppResult<EmployeeInput> {
    let hire_date = forms::required("hire_date", form.hire_date)?;
    let base_salary = forms::required("base_salary", form.base_salary)?;
    Ok(EmployeeInput {
        code: forms::non_empty(form.code),
        first_name: forms::required("first_name", form.first_name)?,
        last_name: forms::required("last_name", form.last_name)?,
        document_id: forms::non_empty(form.document_id),
        email: forms::non_empty(form.email),
        igss_number: forms::non_empty(form.igss_number),
        position: forms::non_empty(form.position),
        birth_date: forms::parse_opt_date("birth_date", form.birth_date)?,
        hire_date: forms::parse_date("hire_date", &hire_date)?,
        base_salary: forms::parse_non_negative("base_salary", &base_salary)?,
    })
}

fn form_body(action: &str, input: Option<&EmployeeInput>) -> String {
    let text = |value: Option<&String>| value.map(|v| escape(v)).unwrap_or_default();
    let code = input.and_then(|i| i.code.as_ref());
    let first = input.map(|i| i.first_name.clone());
    let last = input.map(|i| i.last_name.clone());
    let document = input.and_then(|i| i.document_id.as_ref());
    let email = input.and_then(|i| i.email.as_ref());
    let igss = input.and_then(|i| i.igss_number.as_ref());
    let position = input.and_then(|i| i.position.as_ref());
    let birth = input.and_then(|i| i.birth_date).map(|d| d.to_string());
    let hire = input.map(|i| i.hire_date.to_string()).unwrap_or_default();
    let salary = input.map(|i| i.base_salary.to_string()).unwrap_or_default();

    format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Code <input name=\"code\" value=\"{}\"></label>\
         <label>First name <input name=\"first_name\" value=\"{}\" required></label>\
         <label>Last name <input name=\"last_name\" value=\"{}\" required></label>\
         <label>Document <input name=\"document_id\" value=\"{}\"></label>\
         <label>Email <input name=\"email\" value=\"{}\"></label>\
         <label>IGSS number <input name=\"igss_number\" value=\"{}\"></label>\
         <label>Position <input name=\"position\" value=\"{}\"></label>\
         <label>Birth date <input type=\"date\" name=\"birth_date\" value=\"{}\"></label>\
         <label>Hire date <input type=\"date\" name=\"hire_date\" value=\"{}\" required></label>\
         <label>Base salary <input name=\"base_salary\" value=\"{}\" required></label>\
         <button type=\"submit\">Save</button></form>",
        text(code),
        text(first.as_ref()),
        text(last.as_ref()),
        text(document),
        text(email),
        text(igss),
        text(position),
        text(birth.as_ref()),
        escape(&hire),
        escape(&salary),
    )
}

/// GET /employees
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::EMPLOYEES_VIEW)?;
    let flashes = flash::take(&session).await?;

    let employees = {
        let conn = state.db().conn()?;
        employees::list(&conn)?
    };

    let can_manage = user.can(perms::EMPLOYEES_MANAGE);
    let mut rows = String::new();
    for e in &employees {
        let status = if e.active { "active" } else { "inactive" };
        let actions = if can_manage {
            format!(
                "<a href=\"/employees/{id}/edit\">Edit</a> \
                 <a href=\"/employees/{id}/benefits\">Benefits</a> \
                 <form class=\"inline\" method=\"post\" action=\"/employees/{id}/deactivate\">\
                 <button type=\"submit\">Deactivate</button></form>",
                id = e.id
            )
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td></tr>",
            escape(e.code.as_deref().unwrap_or("-")),
            escape(&e.full_name()),
            e.hire_date,
            e.base_salary,
            status,
            actions,
        ));
    }

    let new_link = if can_manage {
        "<p><a href=\"/employees/new\">New employee</a></p>"
    } else {
        ""
    };
    let body = format!(
        "{new_link}<table><tr><th>Code</th><th>Name</th><th>Hired</th>\
         <th>Base salary</th><th>Status</th><th></th></tr>{rows}</table>"
    );
    Ok(page("Employees", Some(&user), &flashes, &body).into_response())
}

/// GET /employees/new
pub async fn new_form(session: Session, user: CurrentUser) -> AppResult<Response> {
    user.require(perms::EMPLOYEES_MANAGE)?;
    let flashes = flash::take(&session).await?;
    let body = form_body("/employees/new", None);
    Ok(page("New employee", Some(&user), &flashes, &body).into_response())
}

/// POST /employees/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Form(form): Form<EmployeeForm>,
) -> AppResult<Response> {
    user.require(perms::EMPLOYEES_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let input = match build_input(form) {
        Ok(input) => input,
        Err(err) => {
            flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
            return Ok(Redirect::to("/employees/new").into_response());
        }
    };

    let result = {
        let conn = state.db().conn()?;
        employees::insert(&conn, &input).and_then(|id| {
            audit::record(
                &conn,
                Some(user.id),
                "create",
                "employee",
                Some(id),
                Some(serde_json::json!({ "name": input.first_name.clone() + " " + &input.last_name })),
                correlation_id,
            )?;
            Ok(id)
        })
    };

    match result {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "Employee created.").await?;
            Ok(Redirect::to("/employees").into_response())
        }
        Err(err) => {
            flash::push(
                &session,
                FlashLevel::Danger,
                format!("Error creating employee: {err}"),
            )
            .await?;
            Ok(Redirect::to("/employees/new").into_response())
        }
    }
}

/// GET /employees/:id/edit
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::EMPLOYEES_MANAGE)?;
    let flashes = flash::take(&session).await?;

    let employee = {
        let conn = state.db().conn()?;
        employees::get(&conn, id)?
    };
    let input = EmployeeInput {
        code: employee.code,
        first_name: employee.first_name,
        last_name: employee.last_name,
        document_id: employee.document_id,
        email: employee.email,
        igss_number: employee.igss_number,
        position: employee.position,
        birth_date: employee.birth_date,
        hire_date: employee.hire_date,
        base_salary: employee.base_salary,
    };

    let body = form_body(&format!("/employees/{id}/edit"), Some(&input));
    Ok(page("Edit employee", Some(&user), &flashes, &body).into_response())
}

/// POST /employees/:id/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<EmployeeForm>,
) -> AppResult<Response> {
    user.require(perms::EMPLOYEES_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let input = match build_input(form) {
        Ok(input) => input,
        Err(err) => {
            flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
            return Ok(Redirect::to(&format!("/employees/{id}/edit")).into_response());
        }
    };

    let result = {
        let conn = state.db().conn()?;
        employees::update(&conn, id, &input).and_then(|_| {
            audit::record(
                &conn,
                Some(user.id),
                "update",
                "employee",
                Some(id),
                None,
                correlation_id,
            )?;
            Ok(())
        })
    };

    match result {
        Ok(()) => {
            flash::push(&session, FlashLevel::Success, "Employee updated.").await?;
            Ok(Redirect::to("/employees").into_response())
        }
        Err(err) => {
            flash::push(
                &session,
                FlashLevel::Danger,
                format!("Error updating employee: {err}"),
            )
            .await?;
            Ok(Redirect::to(&format!("/employees/{id}/edit")).into_response())
        }
    }
}

/// The optional termination date on deactivation.
#[derive(Debug, Deserialize)]
pub struct DeactivateForm {
    termination_date: Option<String>,
}

/// POST /employees/:id/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<DeactivateForm>,
) -> AppResult<Response> {
    user.require(perms::EMPLOYEES_MANAGE)?;
    let correlation_id = Uuid::new_v4();
    let termination = forms::parse_opt_date("termination_date", form.termination_date)?;

    let hire_date = {
        let conn = state.db().conn()?;
        employees::get(&conn, id)?.hire_date
    };
    if termination.is_some_and(|end| end < hire_date) {
        flash::push(
            &session,
            FlashLevel::Warning,
            "Termination date cannot be before the hire date.",
        )
        .await?;
        return Ok(Redirect::to("/employees").into_response());
    }

    let result = {
        let conn = state.db().conn()?;
        employees::deactivate(&conn, id, termination).and_then(|_| {
            audit::record(
                &conn,
                Some(user.id),
                "deactivate",
                "employee",
                Some(id),
                None,
                correlation_id,
            )?;
            Ok(())
        })
    };

    match result {
        Ok(()) => flash::push(&session, FlashLevel::Success, "Employee deactivated.").await?,
        Err(err) => {
            flash::push(
                &session,
                FlashLevel::Danger,
                format!("Error deactivating employee: {err}"),
            )
            .await?
        }
    }
    Ok(Redirect::to("/employees").into_response())
}
