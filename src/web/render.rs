//! HTML page rendering.
//!
//! Pages are plain Rust functions producing HTML strings wrapped in
//! [`Html`]. The shared layout carries the navigation bar (filtered by the
//! user's permissions) and the flash banner.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::error;

use crate::error::AppError;

use super::auth::CurrentUser;
use super::flash::Flash;
use crate::models::user::perms;

/// Escapes text for safe interpolation into HTML.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; background: #f5f6f8; color: #222; }
nav { background: #2c3e50; padding: 0.6rem 1rem; }
nav a { color: #ecf0f1; margin-right: 1rem; text-decoration: none; }
nav a:hover { text-decoration: underline; }
main { max-width: 960px; margin: 1rem auto; padding: 0 1rem; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; }
th { background: #eef1f4; }
form.inline { display: inline; }
label { display: block; margin-top: 0.6rem; }
input, select, textarea { padding: 0.3rem; min-width: 16rem; }
button { margin-top: 0.8rem; padding: 0.4rem 1rem; cursor: pointer; }
.flash { padding: 0.6rem 1rem; margin: 0.6rem 0; border-radius: 4px; }
.flash-success { background: #d4edda; color: #155724; }
.flash-info { background: #d1ecf1; color: #0c5460; }
.flash-warning { background: #fff3cd; color: #856404; }
.flash-danger { background: #f8d7da; color: #721c24; }
.negative { color: #c0392b; font-weight: bold; }
.muted { color: #777; }
"#;

/// Navigation entries with the permission each requires, if any.
const NAV: &[(&str, &str, Option<&str>)] = &[
    ("/dashboard", "Dashboard", None),
    ("/employees", "Employees", Some(perms::EMPLOYEES_VIEW)),
    ("/periods", "Periods", Some(perms::PAYROLL_VIEW)),
    ("/catalog", "Catalog", Some(perms::CATALOG_MANAGE)),
    ("/attendance", "Attendance", Some(perms::ATTENDANCE_VIEW)),
    ("/loans", "Loans", Some(perms::LOANS_MANAGE)),
    ("/users", "Users", Some(perms::USERS_MANAGE)),
    ("/audit", "Audit", Some(perms::AUDIT_VIEW)),
];

fn nav_bar(user: Option<&CurrentUser>) -> String {
    let Some(user) = user else {
        return String::new();
    };
    let mut links = String::new();
    for (href, label, required) in NAV {
        if required.map_or(true, |p| user.can(p)) {
            links.push_str(&format!("<a href=\"{href}\">{label}</a>"));
        }
    }
    links.push_str(&format!(
        "<a href=\"/logout\">Logout ({})</a>",
        escape(&user.username)
    ));
    format!("<nav>{links}</nav>")
}

fn flash_banner(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| {
            format!(
                "<div class=\"flash flash-{}\">{}</div>",
                f.level.css_class(),
                escape(&f.message)
            )
        })
        .collect()
}

/// Wraps a body fragment in the shared page layout.
pub fn page(
    title: &str,
    user: Option<&CurrentUser>,
    flashes: &[Flash],
    body: &str,
) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{} - Planilla</title><style>{STYLE}</style></head><body>\
         {}<main>{}<h1>{}</h1>{}</main></body></html>",
        escape(title),
        nav_bar(user),
        flash_banner(flashes),
        escape(title),
        body,
    ))
}

fn error_page(status: StatusCode, title: &str, detail: &str) -> Response {
    let body = format!("<p>{}</p><p><a href=\"/dashboard\">Back</a></p>", escape(detail));
    (status, page(title, None, &[], &body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unauthenticated => Redirect::to("/login").into_response(),
            AppError::Forbidden { .. } => {
                error_page(StatusCode::FORBIDDEN, "Forbidden", &self.to_string())
            }
            AppError::NotFound { .. } => {
                error_page(StatusCode::NOT_FOUND, "Not found", &self.to_string())
            }
            AppError::Validation { .. } | AppError::PeriodClosed { .. } => {
                error_page(StatusCode::BAD_REQUEST, "Invalid request", &self.to_string())
            }
            _ => {
                error!(error = %self, "request failed");
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "Something went wrong. The error has been logged.",
                )
            }
        }
    }
}
