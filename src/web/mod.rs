//! The web surface: router assembly, authentication, pages and exports.

mod attendance;
mod audit;
mod auth;
mod catalog;
mod employees;
mod flash;
mod forms;
mod loans;
mod payroll;
mod periods;
mod render;
mod reports;
mod state;
mod users;

pub use auth::CurrentUser;
pub use flash::{Flash, FlashLevel};
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Builds the application router with all pages, the session layer and
/// request tracing.
pub fn router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            state.settings().session_minutes,
        )));

    Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(auth::dashboard))
        .route("/employees", get(employees::list_page))
        .route("/employees/new", get(employees::new_form).post(employees::create))
        .route("/employees/:id/edit", get(employees::edit_form).post(employees::update))
        .route("/employees/:id/deactivate", post(employees::deactivate))
        .route(
            "/employees/:id/benefits",
            get(catalog::employee_benefits_page).post(catalog::employee_benefits_submit),
        )
        .route("/periods", get(periods::list_page))
        .route("/periods/new", get(periods::new_form).post(periods::create))
        .route("/periods/:id", get(payroll::register_page))
        .route("/periods/:id/generate", post(periods::generate))
        .route("/periods/:id/recalculate", post(periods::recalculate))
        .route("/periods/:id/close", post(periods::close))
        .route("/periods/:id/export.csv", get(reports::register_csv))
        .route("/periods/:id/export.xlsx", get(reports::register_xlsx))
        .route("/payroll/:id", get(payroll::payslip_page))
        .route("/payroll/:id/payslip.pdf", get(reports::payslip))
        .route("/catalog", get(catalog::list_page))
        .route("/catalog/new", get(catalog::new_form).post(catalog::create))
        .route("/catalog/:id/toggle", post(catalog::toggle))
        .route("/attendance", get(attendance::list_page))
        .route("/attendance/new", get(attendance::new_form).post(attendance::create))
        .route("/loans", get(loans::list_page))
        .route("/loans/new", get(loans::new_form).post(loans::create))
        .route("/loans/:id/deactivate", post(loans::deactivate))
        .route("/users", get(users::list_page))
        .route("/users/new", get(users::new_form).post(users::create))
        .route("/users/:id/toggle", post(users::toggle))
        .route("/audit", get(audit::list_page))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state)
}
