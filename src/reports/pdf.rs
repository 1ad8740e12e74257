//! PDF payslip rendering.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::AppResult;
use crate::models::{Employee, EntryKind, PayPeriod, PayrollItem, PayrollRecord};

use super::report_err;

// A4 portrait.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_MM: f32 = 7.0;

/// Renders one employee's payslip for a period as PDF bytes.
pub fn payslip_pdf(
    employee: &Employee,
    period: &PayPeriod,
    record: &PayrollRecord,
    items: &[PayrollItem],
) -> AppResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Payslip", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "payslip");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(report_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(report_err)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    let amount_x = PAGE_WIDTH_MM - MARGIN_MM - 40.0;

    layer.use_text("Payslip", 18.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= LINE_MM * 1.5;

    layer.use_text(
        format!("Period: {} to {}", period.start_date, period.end_date),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_MM;

    let code = employee.code.as_deref().unwrap_or("-");
    layer.use_text(
        format!("Employee: {} ({})", employee.full_name(), code),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_MM;

    if let Some(igss) = &employee.igss_number {
        layer.use_text(
            format!("IGSS affiliation: {igss}"),
            11.0,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        y -= LINE_MM;
    }

    y -= LINE_MM / 2.0;
    layer.use_text(
        format!(
            "Base salary {:.2} prorated to {:.2} ({} of {} days)",
            record.base_salary, record.prorated_base, record.payable_days, record.period_days
        ),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_MM * 1.5;

    layer.use_text("Concept", 11.0, Mm(MARGIN_MM), Mm(y), &bold);
    layer.use_text("Amount", 11.0, Mm(amount_x), Mm(y), &bold);
    y -= LINE_MM;

    for item in items {
        let sign = match item.kind {
            EntryKind::Benefit => "+",
            EntryKind::Deduction => "-",
        };
        layer.use_text(item.name.as_str(), 10.0, Mm(MARGIN_MM), Mm(y), &font);
        layer.use_text(
            format!("{sign}{:.2}", item.amount),
            10.0,
            Mm(amount_x),
            Mm(y),
            &font,
        );
        y -= LINE_MM;
    }

    y -= LINE_MM / 2.0;
    layer.use_text(
        format!("Benefits total: {:.2}", record.benefits_total),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_MM;
    layer.use_text(
        format!("Deductions total: {:.2}", record.deductions_total),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_MM;
    layer.use_text(
        format!("Net pay: {:.2}", record.net_pay),
        13.0,
        Mm(MARGIN_MM),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes().map_err(report_err)
}
