//! CSV export of the payroll register.

use crate::error::AppResult;
use crate::models::PayPeriod;
use crate::store::payroll::RegisterRow;

use super::report_err;

/// Renders the payroll register of a period as CSV bytes.
pub fn period_register_csv(period: &PayPeriod, rows: &[RegisterRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "Employee Code",
            "Employee",
            "Base Salary",
            "Payable Days",
            "Period Days",
            "Prorated Base",
            "Benefits",
            "Deductions",
            "Net Pay",
        ])
        .map_err(report_err)?;

    for row in rows {
        writer
            .write_record([
                row.employee_code.clone().unwrap_or_default(),
                row.employee_name.clone(),
                format!("{:.2}", row.record.base_salary),
                row.record.payable_days.to_string(),
                row.record.period_days.to_string(),
                format!("{:.2}", row.record.prorated_base),
                format!("{:.2}", row.record.benefits_total),
                format!("{:.2}", row.record.deductions_total),
                format!("{:.2}", row.record.net_pay),
            ])
            .map_err(report_err)?;
    }

    // Trailing summary line with the period range, like the printed register.
    writer
        .write_record([
            format!("Period {} to {}", period.start_date, period.end_date),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ])
        .map_err(report_err)?;

    writer.into_inner().map_err(report_err)
}
