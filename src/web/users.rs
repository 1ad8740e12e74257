//! User management pages.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::perms;
use crate::store::{audit, users};

use super::auth::CurrentUser;
use super::flash::{self, FlashLevel};
use super::forms;
use super::render::{escape, page};
use super::state::AppState;

/// GET /users
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::USERS_MANAGE)?;
    let flashes = flash::take(&session).await?;

    let rows = {
        let conn = state.db().conn()?;
        users::list_with_roles(&conn)?
    };

    let mut table = String::new();
    for row in &rows {
        let status = if row.user.active { "active" } else { "inactive" };
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><form class=\"inline\" method=\"post\" action=\"/users/{}/toggle\">\
             <button type=\"submit\">Toggle</button></form></td></tr>",
            escape(&row.user.username),
            escape(&row.user.email),
            escape(&row.role_name),
            status,
            row.user.id,
        ));
    }

    let body = format!(
        "<p><a href=\"/users/new\">New user</a></p>\
         <table><tr><th>Username</th><th>Email</th><th>Role</th><th>Status</th><th></th></tr>\
         {table}</table>"
    );
    Ok(page("Users", Some(&user), &flashes, &body).into_response())
}

/// GET /users/new
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::USERS_MANAGE)?;
    let flashes = flash::take(&session).await?;

    let roles = {
        let conn = state.db().conn()?;
        users::roles(&conn)?
    };
    let options: String = roles
        .iter()
        .map(|r| format!("<option value=\"{}\">{}</option>", r.id, escape(&r.name)))
        .collect();

    let body = format!(
        "<form method=\"post\" action=\"/users/new\">\
         <label>Username <input name=\"username\" required></label>\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <label>Role <select name=\"role_id\">{options}</select></label>\
         <button type=\"submit\">Create</button></form>"
    );
    Ok(page("New user", Some(&user), &flashes, &body).into_response())
}

/// The new-user form fields.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role_id: Option<i64>,
}

/// POST /users/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    user.require(perms::USERS_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let parsed = (|| {
        let username = forms::required("username", form.username)?;
        let email = forms::required("email", form.email)?;
        let password = forms::required("password", form.password)?;
        let role_id = form.role_id.ok_or(AppError::Validation {
            field: "role_id",
            message: "is required".to_string(),
        })?;
        Ok::<_, AppError>((username, email, password, role_id))
    })();

    let (username, email, password, role_id) = match parsed {
        Ok(values) => values,
        Err(err) => {
            flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
            return Ok(Redirect::to("/users/new").into_response());
        }
    };

    let hash = bcrypt::hash(&password, state.settings().bcrypt_cost)?;
    let result = {
        let conn = state.db().conn()?;
        users::insert(&conn, &username, &email, &hash, role_id).and_then(|id| {
            audit::record(
                &conn,
                Some(user.id),
                "create",
                "user",
                Some(id),
                Some(serde_json::json!({ "username": username })),
                correlation_id,
            )?;
            Ok(id)
        })
    };

    match result {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "User created.").await?;
            Ok(Redirect::to("/users").into_response())
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error creating user: {err}"))
                .await?;
            Ok(Redirect::to("/users/new").into_response())
        }
    }
}

/// POST /users/:id/toggle
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::USERS_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    if id == user.id {
        flash::push(&session, FlashLevel::Warning, "You cannot deactivate yourself.").await?;
        return Ok(Redirect::to("/users").into_response());
    }

    let result = {
        let conn = state.db().conn()?;
        users::toggle_active(&conn, id).and_then(|_| {
            audit::record(
                &conn,
                Some(user.id),
                "toggle",
                "user",
                Some(id),
                None,
                correlation_id,
            )?;
            Ok(())
        })
    };

    match result {
        Ok(()) => flash::push(&session, FlashLevel::Success, "User status updated.").await?,
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error updating user: {err}"))
                .await?
        }
    }
    Ok(Redirect::to("/users").into_response())
}
