//! Report download endpoints.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::user::perms;
use crate::reports;
use crate::store::{audit, employees, payroll, periods};

use super::auth::CurrentUser;
use super::state::AppState;

fn download(content_type: &'static str, filename: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// GET /periods/:id/export.csv
pub async fn register_csv(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::REPORTS_EXPORT)?;
    let correlation_id = Uuid::new_v4();

    let (period, rows) = {
        let conn = state.db().conn()?;
        let period = periods::get(&conn, id)?;
        let rows = payroll::register_for_period(&conn, id)?;
        audit::record(
            &conn,
            Some(user.id),
            "export_csv",
            "pay_period",
            Some(id),
            None,
            correlation_id,
        )?;
        (period, rows)
    };

    let bytes = reports::period_register_csv(&period, &rows)?;
    let filename = format!("payroll-{}-{}.csv", period.start_date, period.end_date);
    Ok(download("text/csv", filename, bytes))
}

/// GET /periods/:id/export.xlsx
pub async fn register_xlsx(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::REPORTS_EXPORT)?;
    let correlation_id = Uuid::new_v4();

    let (period, rows) = {
        let conn = state.db().conn()?;
        let period = periods::get(&conn, id)?;
        let rows = payroll::register_for_period(&conn, id)?;
        audit::record(
            &conn,
            Some(user.id),
            "export_xlsx",
            "pay_period",
            Some(id),
            None,
            correlation_id,
        )?;
        (period, rows)
    };

    let bytes = reports::period_register_xlsx(&period, &rows)?;
    let filename = format!("payroll-{}-{}.xlsx", period.start_date, period.end_date);
    Ok(download(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        filename,
        bytes,
    ))
}

/// GET /payroll/:id/payslip.pdf
pub async fn payslip(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::REPORTS_EXPORT)?;
    let correlation_id = Uuid::new_v4();

    let (record, items, employee, period) = {
        let conn = state.db().conn()?;
        let record = payroll::get_record(&conn, id)?;
        let items = payroll::items_for_record(&conn, id)?;
        let employee = employees::get(&conn, record.employee_id)?;
        let period = periods::get(&conn, record.period_id)?;
        audit::record(
            &conn,
            Some(user.id),
            "export_pdf",
            "payroll_record",
            Some(id),
            None,
            correlation_id,
        )?;
        (record, items, employee, period)
    };

    let bytes = reports::payslip_pdf(&employee, &period, &record, &items)?;
    let filename = format!(
        "payslip-{}-{}.pdf",
        employee.code.as_deref().unwrap_or("employee"),
        period.start_date
    );
    Ok(download("application/pdf", filename, bytes))
}
