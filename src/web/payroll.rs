//! Payroll register and payslip pages.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

use crate::error::AppResult;
use crate::models::EntryKind;
use crate::models::user::perms;
use crate::store::{employees, payroll, periods};

use super::auth::CurrentUser;
use super::flash;
use super::render::{escape, page};
use super::state::AppState;

/// GET /periods/:id - the payroll register of one period.
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::PAYROLL_VIEW)?;
    let flashes = flash::take(&session).await?;

    let (period, rows) = {
        let conn = state.db().conn()?;
        let period = periods::get(&conn, id)?;
        let rows = payroll::register_for_period(&conn, id)?;
        (period, rows)
    };

    let mut table = String::new();
    for row in &rows {
        let record = &row.record;
        let net_class = if record.is_negative() { " class=\"negative\"" } else { "" };
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}/{}</td><td>{:.2}</td>\
             <td>{:.2}</td><td>{:.2}</td><td{}>{:.2}</td>\
             <td><a href=\"/payroll/{}\">Payslip</a></td></tr>",
            escape(row.employee_code.as_deref().unwrap_or("-")),
            escape(&row.employee_name),
            record.base_salary,
            record.payable_days,
            record.period_days,
            record.prorated_base,
            record.benefits_total,
            record.deductions_total,
            net_class,
            record.net_pay,
            record.id,
        ));
    }

    let exports = if user.can(perms::REPORTS_EXPORT) {
        format!(
            "<p><a href=\"/periods/{id}/export.csv\">Export CSV</a> \
             <a href=\"/periods/{id}/export.xlsx\">Export XLSX</a></p>"
        )
    } else {
        String::new()
    };

    let title = format!("Register {} to {}", period.start_date, period.end_date);
    let body = format!(
        "{exports}<table><tr><th>Code</th><th>Employee</th><th>Base</th>\
         <th>Days</th><th>Prorated</th><th>Benefits</th><th>Deductions</th>\
         <th>Net</th><th></th></tr>{table}</table>\
         <p class=\"muted\">Status: {}</p>",
        period.status.as_str(),
    );
    Ok(page(&title, Some(&user), &flashes, &body).into_response())
}

/// GET /payroll/:id - one employee's payslip.
pub async fn payslip_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::PAYROLL_VIEW)?;
    let flashes = flash::take(&session).await?;

    let (record, items, employee, period) = {
        let conn = state.db().conn()?;
        let record = payroll::get_record(&conn, id)?;
        let items = payroll::items_for_record(&conn, id)?;
        let employee = employees::get(&conn, record.employee_id)?;
        let period = periods::get(&conn, record.period_id)?;
        (record, items, employee, period)
    };

    let mut item_rows = String::new();
    for item in &items {
        let sign = match item.kind {
            EntryKind::Benefit => "+",
            EntryKind::Deduction => "-",
        };
        let rate = item
            .rate
            .map(|r| format!("{r}%"))
            .unwrap_or_else(|| "-".to_string());
        item_rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{sign}{:.2}</td></tr>",
            escape(&item.name),
            item.source.as_str(),
            rate,
            item.amount,
        ));
    }

    let pdf_link = if user.can(perms::REPORTS_EXPORT) {
        format!("<p><a href=\"/payroll/{id}/payslip.pdf\">Download PDF</a></p>")
    } else {
        String::new()
    };

    let net_class = if record.is_negative() { " class=\"negative\"" } else { "" };
    let body = format!(
        "<p>{} — period {} to {}</p>\
         <p>Base {:.2}, prorated {:.2} ({} of {} days)</p>\
         {pdf_link}\
         <table><tr><th>Concept</th><th>Source</th><th>Rate</th><th>Amount</th></tr>{item_rows}</table>\
         <p>Benefits: {:.2} — Deductions: {:.2} — <strong{net_class}>Net: {:.2}</strong></p>",
        escape(&employee.full_name()),
        period.start_date,
        period.end_date,
        record.base_salary,
        record.prorated_base,
        record.payable_days,
        record.period_days,
        record.benefits_total,
        record.deductions_total,
        record.net_pay,
    );
    Ok(page("Payslip", Some(&user), &flashes, &body).into_response())
}
