//! Pay period pages and payroll operations.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{PeriodKind, PeriodStatus};
use crate::models::user::perms;
use crate::payroll as engine;
use crate::store::{audit, periods};

use super::auth::CurrentUser;
use super::flash::{self, FlashLevel};
use super::forms;
use super::render::page;
use super::state::AppState;

/// GET /periods
pub async fn list_page(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
) -> AppResult<Response> {
    user.require(perms::PAYROLL_VIEW)?;
    let flashes = flash::take(&session).await?;

    let periods = {
        let conn = state.db().conn()?;
        periods::list(&conn)?
    };

    let can_manage = user.can(perms::PERIODS_MANAGE);
    let can_generate = user.can(perms::PAYROLL_GENERATE);
    let mut rows = String::new();
    for p in &periods {
        let mut actions = format!("<a href=\"/periods/{}\">Register</a> ", p.id);
        if p.status == PeriodStatus::Open {
            if can_generate {
                actions.push_str(&format!(
                    "<form class=\"inline\" method=\"post\" action=\"/periods/{id}/generate\">\
                     <button type=\"submit\">Generate</button></form> \
                     <form class=\"inline\" method=\"post\" action=\"/periods/{id}/recalculate\">\
                     <button type=\"submit\">Recalculate</button></form> ",
                    id = p.id
                ));
            }
            if can_manage {
                actions.push_str(&format!(
                    "<form class=\"inline\" method=\"post\" action=\"/periods/{}/close\">\
                     <button type=\"submit\">Close</button></form>",
                    p.id
                ));
            }
        }
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            p.id,
            p.start_date,
            p.end_date,
            p.kind.as_str(),
            p.status.as_str(),
            actions,
        ));
    }

    let new_link = if can_manage {
        "<p><a href=\"/periods/new\">New period</a></p>"
    } else {
        ""
    };
    let body = format!(
        "{new_link}<table><tr><th>#</th><th>Start</th><th>End</th><th>Kind</th>\
         <th>Status</th><th></th></tr>{rows}</table>"
    );
    Ok(page("Pay periods", Some(&user), &flashes, &body).into_response())
}

/// GET /periods/new
pub async fn new_form(session: Session, user: CurrentUser) -> AppResult<Response> {
    user.require(perms::PERIODS_MANAGE)?;
    let flashes = flash::take(&session).await?;
    let body = r#"<form method="post" action="/periods/new">
<label>Start date <input type="date" name="start_date" required></label>
<label>End date <input type="date" name="end_date" required></label>
<label>Kind <select name="kind">
<option value="monthly">Monthly</option>
<option value="biweekly">Biweekly</option>
<option value="weekly">Weekly</option>
</select></label>
<button type="submit">Create</button></form>"#;
    Ok(page("New pay period", Some(&user), &flashes, body).into_response())
}

/// The new-period form fields.
#[derive(Debug, Deserialize)]
pub struct PeriodForm {
    start_date: Option<String>,
    end_date: Option<String>,
    kind: Option<String>,
}

/// POST /periods/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Form(form): Form<PeriodForm>,
) -> AppResult<Response> {
    user.require(perms::PERIODS_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let parsed = (|| {
        let start_date = forms::parse_date("start_date", &forms::required("start_date", form.start_date)?)?;
        let end_date = forms::parse_date("end_date", &forms::required("end_date", form.end_date)?)?;
        let kind = forms::required("kind", form.kind)?;
        Ok::<_, crate::error::AppError>((start_date, end_date, kind))
    })();

    let (start_date, end_date, kind) = match parsed {
        Ok(values) => values,
        Err(err) => {
            flash::push(&session, FlashLevel::Warning, err.to_string()).await?;
            return Ok(Redirect::to("/periods/new").into_response());
        }
    };

    if end_date < start_date {
        flash::push(
            &session,
            FlashLevel::Warning,
            "The end date cannot be before the start date.",
        )
        .await?;
        return Ok(Redirect::to("/periods/new").into_response());
    }
    let Some(kind) = PeriodKind::parse(&kind) else {
        flash::push(&session, FlashLevel::Warning, "Unknown period kind.").await?;
        return Ok(Redirect::to("/periods/new").into_response());
    };

    let result = {
        let conn = state.db().conn()?;
        periods::insert(&conn, start_date, end_date, kind).and_then(|id| {
            audit::record(
                &conn,
                Some(user.id),
                "create",
                "pay_period",
                Some(id),
                Some(serde_json::json!({
                    "start": start_date.to_string(),
                    "end": end_date.to_string(),
                })),
                correlation_id,
            )?;
            Ok(id)
        })
    };

    match result {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "Period created.").await?;
            Ok(Redirect::to("/periods").into_response())
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error creating period: {err}"))
                .await?;
            Ok(Redirect::to("/periods/new").into_response())
        }
    }
}

/// POST /periods/:id/generate
pub async fn generate(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::PAYROLL_GENERATE)?;
    let correlation_id = Uuid::new_v4();

    let result = {
        let conn = state.db().conn()?;
        engine::generate_for_period(&conn, id, state.rates()).and_then(|summary| {
            audit::record(
                &conn,
                Some(user.id),
                "generate",
                "pay_period",
                Some(id),
                Some(serde_json::json!({
                    "created": summary.created_records,
                    "recalculated": summary.recalculated,
                })),
                correlation_id,
            )?;
            Ok(summary)
        })
    };

    match result {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                period_id = id,
                created = summary.created_records,
                "payroll generated"
            );
            flash::push(
                &session,
                FlashLevel::Success,
                format!(
                    "Payroll generated: {} new records, {} recalculated.",
                    summary.created_records, summary.recalculated
                ),
            )
            .await?;
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error generating payroll: {err}"))
                .await?;
        }
    }
    Ok(Redirect::to("/periods").into_response())
}

/// POST /periods/:id/recalculate
pub async fn recalculate(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::PAYROLL_GENERATE)?;
    let correlation_id = Uuid::new_v4();

    let result = {
        let conn = state.db().conn()?;
        engine::recalculate_period(&conn, id, state.rates()).and_then(|count| {
            audit::record(
                &conn,
                Some(user.id),
                "recalculate",
                "pay_period",
                Some(id),
                Some(serde_json::json!({ "records": count })),
                correlation_id,
            )?;
            Ok(count)
        })
    };

    match result {
        Ok(count) => {
            flash::push(
                &session,
                FlashLevel::Success,
                format!("{count} payroll records recalculated."),
            )
            .await?;
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error recalculating: {err}"))
                .await?;
        }
    }
    Ok(Redirect::to("/periods").into_response())
}

/// POST /periods/:id/close
pub async fn close(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    user.require(perms::PERIODS_MANAGE)?;
    let correlation_id = Uuid::new_v4();

    let result = {
        let conn = state.db().conn()?;
        engine::close_period(&conn, id).and_then(|summary| {
            audit::record(
                &conn,
                Some(user.id),
                "close",
                "pay_period",
                Some(id),
                Some(serde_json::json!({ "loan_payments": summary.payments_posted })),
                correlation_id,
            )?;
            Ok(summary)
        })
    };

    match result {
        Ok(summary) => {
            flash::push(
                &session,
                FlashLevel::Success,
                format!(
                    "Period closed; {} loan payments posted.",
                    summary.payments_posted
                ),
            )
            .await?;
        }
        Err(err) => {
            flash::push(&session, FlashLevel::Danger, format!("Error closing period: {err}"))
                .await?;
        }
    }
    Ok(Redirect::to("/periods").into_response())
}
