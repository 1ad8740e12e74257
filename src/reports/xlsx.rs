//! Excel export of the payroll register.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use crate::error::AppResult;
use crate::models::PayPeriod;
use crate::store::payroll::RegisterRow;

use super::report_err;

/// Renders the payroll register of a period as XLSX bytes.
///
/// Shows one row per employee with the prorated figures and totals.
pub fn period_register_xlsx(period: &PayPeriod, rows: &[RegisterRow]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Payroll Register").map_err(report_err)?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    // Number format for money columns
    let money_format = Format::new().set_num_format("#,##0.00");

    let headers = [
        "Employee Code",
        "Employee",
        "Base Salary",
        "Payable Days",
        "Period Days",
        "Prorated Base",
        "Benefits",
        "Deductions",
        "Net Pay",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(report_err)?;
    }

    // Column widths
    worksheet.set_column_width(0, 15).map_err(report_err)?; // Employee Code
    worksheet.set_column_width(1, 30).map_err(report_err)?; // Employee
    for col in 2u16..9 {
        worksheet.set_column_width(col, 14).map_err(report_err)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        let record = &row.record;

        worksheet
            .write_string(r, 0, row.employee_code.as_deref().unwrap_or(""))
            .map_err(report_err)?;
        worksheet
            .write_string(r, 1, &row.employee_name)
            .map_err(report_err)?;
        worksheet
            .write_number_with_format(r, 2, record.base_salary.to_f64().unwrap_or(0.0), &money_format)
            .map_err(report_err)?;
        worksheet
            .write_number(r, 3, record.payable_days as f64)
            .map_err(report_err)?;
        worksheet
            .write_number(r, 4, record.period_days as f64)
            .map_err(report_err)?;
        worksheet
            .write_number_with_format(r, 5, record.prorated_base.to_f64().unwrap_or(0.0), &money_format)
            .map_err(report_err)?;
        worksheet
            .write_number_with_format(r, 6, record.benefits_total.to_f64().unwrap_or(0.0), &money_format)
            .map_err(report_err)?;
        worksheet
            .write_number_with_format(r, 7, record.deductions_total.to_f64().unwrap_or(0.0), &money_format)
            .map_err(report_err)?;
        worksheet
            .write_number_with_format(r, 8, record.net_pay.to_f64().unwrap_or(0.0), &money_format)
            .map_err(report_err)?;
    }

    let footer = (rows.len() + 2) as u32;
    worksheet
        .write_string(
            footer,
            0,
            format!("Period {} to {}", period.start_date, period.end_date),
        )
        .map_err(report_err)?;

    workbook.save_to_buffer().map_err(report_err)
}
