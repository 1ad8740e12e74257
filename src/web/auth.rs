//! Session authentication and the permission guard.

use std::collections::HashSet;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{audit, users};

use super::flash::{self, FlashLevel};
use super::render;
use super::state::AppState;

const SESSION_USER_KEY: &str = "user_id";

/// The authenticated user attached to a request.
///
/// Extracting this type redirects to the login page when the session has
/// no (or an inactive) user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's id.
    pub id: i64,
    /// The user's login name, shown in the navigation bar.
    pub username: String,
    /// Permission codes granted through the user's role.
    pub permissions: HashSet<String>,
}

impl CurrentUser {
    /// Returns true if the user holds the permission.
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Fails with `Forbidden` unless the user holds the permission.
    pub fn require(&self, permission: &'static str) -> AppResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden { permission })
        }
    }
}

/// Rejection that sends the browser to the login page.
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRedirect)?;
        let user_id: Option<i64> = session.get(SESSION_USER_KEY).await.map_err(|_| AuthRedirect)?;
        let Some(user_id) = user_id else {
            return Err(AuthRedirect);
        };

        let conn = state.db().conn().map_err(|_| AuthRedirect)?;
        let user = users::get(&conn, user_id).map_err(|_| AuthRedirect)?;
        if !user.active {
            return Err(AuthRedirect);
        }
        let permissions = users::permissions_for_user(&conn, user_id).map_err(|_| AuthRedirect)?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            permissions,
        })
    }
}

/// GET / - sends the browser to the dashboard or the login page.
pub async fn index(session: Session) -> AppResult<Redirect> {
    let user_id: Option<i64> = session.get(SESSION_USER_KEY).await?;
    if user_id.is_some() {
        Ok(Redirect::to("/dashboard"))
    } else {
        Ok(Redirect::to("/login"))
    }
}

/// GET /login
pub async fn login_form(session: Session) -> AppResult<Response> {
    let flashes = flash::take(&session).await?;
    let body = r#"<form method="post" action="/login">
<label>Username or email <input type="text" name="username"></label>
<label>Password <input type="password" name="password"></label>
<button type="submit">Sign in</button>
</form>"#;
    Ok(render::page("Sign in", None, &flashes, body).into_response())
}

/// The login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username or email.
    pub username: String,
    /// Plain password, verified against the stored bcrypt hash.
    pub password: String,
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let correlation_id = Uuid::new_v4();
    let username = form.username.trim().to_string();

    if username.is_empty() || form.password.is_empty() {
        flash::push(&session, FlashLevel::Warning, "Please complete all fields.").await?;
        return Ok(Redirect::to("/login").into_response());
    }

    enum Outcome {
        Success(i64, String),
        Inactive,
        BadCredentials,
    }

    let outcome = {
        let conn = state.db().conn()?;
        match users::find_for_login(&conn, &username)? {
            Some(user) => {
                if bcrypt::verify(&form.password, &user.password_hash)? {
                    if user.active {
                        audit::record(
                            &conn,
                            Some(user.id),
                            "login",
                            "user",
                            Some(user.id),
                            None,
                            correlation_id,
                        )?;
                        Outcome::Success(user.id, user.username)
                    } else {
                        Outcome::Inactive
                    }
                } else {
                    audit::record(
                        &conn,
                        Some(user.id),
                        "login_failed",
                        "user",
                        Some(user.id),
                        None,
                        correlation_id,
                    )?;
                    Outcome::BadCredentials
                }
            }
            None => {
                audit::record(
                    &conn,
                    None,
                    "login_failed",
                    "user",
                    None,
                    Some(serde_json::json!({ "username": username })),
                    correlation_id,
                )?;
                Outcome::BadCredentials
            }
        }
    };

    match outcome {
        Outcome::Success(user_id, username) => {
            // Fresh session id on privilege change.
            session.cycle_id().await?;
            session.insert(SESSION_USER_KEY, user_id).await?;
            flash::push(&session, FlashLevel::Success, "Welcome!").await?;
            info!(correlation_id = %correlation_id, user_id, %username, "user logged in");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Outcome::Inactive => {
            flash::push(
                &session,
                FlashLevel::Danger,
                "Your account is inactive. Contact the administrator.",
            )
            .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Outcome::BadCredentials => {
            warn!(correlation_id = %correlation_id, %username, "failed login attempt");
            flash::push(&session, FlashLevel::Danger, "Invalid username or password.").await?;
            Ok(Redirect::to("/login").into_response())
        }
    }
}

/// GET /logout
pub async fn logout(session: Session) -> AppResult<Response> {
    session.flush().await?;
    flash::push(&session, FlashLevel::Info, "Session closed.").await?;
    Ok(Redirect::to("/login").into_response())
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    let flashes = flash::take(&session).await?;

    let (employees, open_periods) = {
        let conn = state.db().conn()?;
        let employees: i64 = conn.query_row(
            "SELECT COUNT(1) FROM employees WHERE active = 1",
            [],
            |row| row.get(0),
        )?;
        let open_periods: i64 = conn.query_row(
            "SELECT COUNT(1) FROM pay_periods WHERE status = 'open'",
            [],
            |row| row.get(0),
        )?;
        (employees, open_periods)
    };

    let body = format!(
        "<p>Signed in as <strong>{}</strong>.</p>\
         <p>{employees} active employees, {open_periods} open pay periods.</p>",
        render::escape(&user.username),
    );
    Ok(render::page("Dashboard", Some(&user), &flashes, &body).into_response())
}
