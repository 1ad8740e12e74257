//! Report generation.
//!
//! Builds the downloadable artifacts: the per-period payroll register as
//! CSV or XLSX and the per-record payslip as PDF. All builders return raw
//! bytes; the web layer wraps them in download responses.

mod csv;
mod pdf;
mod xlsx;

pub use csv::period_register_csv;
pub use pdf::payslip_pdf;
pub use xlsx::period_register_xlsx;

use crate::error::AppError;

/// Maps a report backend error into the application error type.
fn report_err(err: impl std::fmt::Display) -> AppError {
    AppError::Report {
        message: err.to_string(),
    }
}
