//! Payroll generation and recalculation.
//!
//! Generation chains the steps the payroll clerk used to run by hand:
//! create missing records for the period, make sure the statutory
//! deductions exist, then recalculate every record from attendance, the
//! catalog and open loans.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::StatutoryRates;
use crate::error::{AppError, AppResult};
use crate::models::{EntryKind, PayPeriod, PayrollRecord};
use crate::store::{attendance, loans, payroll, periods};

use super::items::{expand_catalog, loan_items};
use super::proration::{prorate, resolve_payable_days};
use super::statutory::{ensure_statutory_entries, statutory_names};

/// The outcome of generating payroll for a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    /// The period that was generated.
    pub period_id: i64,
    /// Records newly created for employees that had none.
    pub created_records: usize,
    /// Records recalculated (includes the newly created ones).
    pub recalculated: usize,
}

/// The outcome of closing a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseSummary {
    /// The period that was closed.
    pub period_id: i64,
    /// Loan payments posted from the period's deduction items.
    pub payments_posted: usize,
}

/// Generates payroll for a period: inserts missing records, ensures the
/// statutory deductions exist, then recalculates every record.
pub fn generate_for_period(
    conn: &Connection,
    period_id: i64,
    rates: &StatutoryRates,
) -> AppResult<GenerationSummary> {
    let period = periods::get(conn, period_id)?;
    if !period.is_open() {
        return Err(AppError::PeriodClosed { period_id });
    }

    let created_records = payroll::insert_missing_records(conn, &period)?;
    ensure_statutory_entries(conn, rates)?;

    let records = payroll::records_for_period(conn, period_id)?;
    for record in &records {
        recalculate_record(conn, &period, record, rates)?;
    }

    info!(
        period_id,
        created = created_records,
        recalculated = records.len(),
        "generated payroll for period"
    );
    Ok(GenerationSummary {
        period_id,
        created_records,
        recalculated: records.len(),
    })
}

/// Recalculates every existing record of an open period.
pub fn recalculate_period(
    conn: &Connection,
    period_id: i64,
    rates: &StatutoryRates,
) -> AppResult<usize> {
    let period = periods::get(conn, period_id)?;
    if !period.is_open() {
        return Err(AppError::PeriodClosed { period_id });
    }

    let records = payroll::records_for_period(conn, period_id)?;
    for record in &records {
        recalculate_record(conn, &period, record, rates)?;
    }
    info!(period_id, recalculated = records.len(), "recalculated period");
    Ok(records.len())
}

/// Recalculates one record: proration from attendance, item expansion from
/// the catalog and open loans, then totals.
pub fn recalculate_record(
    conn: &Connection,
    period: &PayPeriod,
    record: &PayrollRecord,
    rates: &StatutoryRates,
) -> AppResult<PayrollRecord> {
    let has_punches = attendance::has_punches(
        conn,
        record.employee_id,
        period.start_date,
        period.end_date,
    )?;
    let worked = attendance::worked_days(
        conn,
        record.employee_id,
        period.start_date,
        period.end_date,
    )?;
    let payable_days = resolve_payable_days(has_punches, worked, period.days());
    let prorated_base = prorate(record.base_salary, payable_days, period.days());

    let names = statutory_names(rates);
    let mut items = expand_catalog(conn, record.employee_id, prorated_base, &names)?;
    let employee_loans = loans::active_for_employee(conn, record.employee_id)?;
    items.extend(loan_items(&employee_loans));

    payroll::clear_items(conn, record.id)?;
    let mut benefits_total = Decimal::ZERO;
    let mut deductions_total = Decimal::ZERO;
    for item in &items {
        match item.kind {
            EntryKind::Benefit => benefits_total += item.amount,
            EntryKind::Deduction => deductions_total += item.amount,
        }
        payroll::insert_item(
            conn,
            &payroll::NewItem {
                record_id: record.id,
                entry_id: item.entry_id,
                loan_id: item.loan_id,
                name: item.name.clone(),
                kind: item.kind,
                source: item.source,
                rate: item.rate,
                amount: item.amount,
            },
        )?;
    }

    let net_pay = prorated_base + benefits_total - deductions_total;
    payroll::update_totals(
        conn,
        record.id,
        payable_days,
        prorated_base,
        benefits_total,
        deductions_total,
        net_pay,
    )?;

    debug!(
        record_id = record.id,
        employee_id = record.employee_id,
        payable_days,
        %net_pay,
        "recalculated payroll record"
    );
    payroll::get_record(conn, record.id)
}

/// Closes a period: posts the period's loan deduction items against loan
/// balances, then marks the period closed.
pub fn close_period(conn: &Connection, period_id: i64) -> AppResult<CloseSummary> {
    let period = periods::get(conn, period_id)?;
    if !period.is_open() {
        return Err(AppError::PeriodClosed { period_id });
    }

    let totals = payroll::loan_totals_for_period(conn, period_id)?;
    for (loan_id, amount) in &totals {
        loans::apply_payment(conn, *loan_id, *amount)?;
    }
    periods::close(conn, period_id)?;

    info!(period_id, payments = totals.len(), "closed period");
    Ok(CloseSummary {
        period_id,
        payments_posted: totals.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::models::{CalcMethod, ItemSource, PeriodKind, PunchKind};
    use crate::store::employees::{self, EmployeeInput};
    use crate::store::catalog;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn insert_employee(conn: &Connection, name: &str, salary: &str) -> i64 {
        employees::insert(
            conn,
            &EmployeeInput {
                code: Some(format!("EMP-{name}")),
                first_name: name.to_string(),
                last_name: "Test".to_string(),
                document_id: None,
                email: None,
                igss_number: None,
                position: None,
                birth_date: None,
                hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                base_salary: dec(salary),
            },
        )
        .unwrap()
    }

    fn insert_period(conn: &Connection) -> i64 {
        periods::insert(
            conn,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            PeriodKind::Monthly,
        )
        .unwrap()
    }

    fn punch(conn: &Connection, employee_id: i64, date: &str) {
        let d: NaiveDate = date.parse().unwrap();
        let at: DateTime<Utc> = Utc.from_utc_datetime(&d.and_hms_opt(8, 0, 0).unwrap());
        attendance::record(conn, employee_id, at, PunchKind::ClockIn, None).unwrap();
    }

    #[test]
    fn test_generate_creates_statutory_entries_and_records() {
        let db = test_db();
        let conn = db.conn().unwrap();
        insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);

        let summary = generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();
        assert_eq!(summary.created_records, 1);
        assert_eq!(summary.recalculated, 1);

        assert!(catalog::find_by_name(&conn, "IGSS").unwrap().is_some());
        assert!(catalog::find_by_name(&conn, "ISR").unwrap().is_some());
    }

    #[test]
    fn test_no_punches_pays_full_base_minus_statutory() {
        let db = test_db();
        let conn = db.conn().unwrap();
        insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);

        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();

        let record = &payroll::records_for_period(&conn, period_id).unwrap()[0];
        assert_eq!(record.payable_days, 31);
        assert_eq!(record.prorated_base, dec("6000.00"));
        // IGSS 4.83% = 289.80, ISR 5% = 300.00
        assert_eq!(record.deductions_total, dec("589.80"));
        assert_eq!(record.net_pay, dec("5410.20"));
    }

    #[test]
    fn test_punches_prorate_the_base() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana", "6200.00");
        let period_id = insert_period(&conn);
        for day in ["2026-01-05", "2026-01-06", "2026-01-07"] {
            punch(&conn, employee_id, day);
        }

        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();

        let record = &payroll::records_for_period(&conn, period_id).unwrap()[0];
        assert_eq!(record.payable_days, 3);
        // 6200 * 3/31 = 600.00
        assert_eq!(record.prorated_base, dec("600.00"));
        // IGSS 28.98 + ISR 30.00
        assert_eq!(record.deductions_total, dec("58.98"));
        assert_eq!(record.net_pay, dec("541.02"));
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let db = test_db();
        let conn = db.conn().unwrap();
        insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);

        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();
        let first = payroll::records_for_period(&conn, period_id).unwrap();
        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();
        let second = payroll::records_for_period(&conn, period_id).unwrap();

        assert_eq!(first, second);
        let items = payroll::items_for_record(&conn, first[0].id).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_loan_installment_deducted_but_balance_unchanged_until_close() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);
        let loan_id = loans::insert(
            &conn,
            employee_id,
            "Adelanto",
            dec("1000.00"),
            dec("250.00"),
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        )
        .unwrap();

        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();

        let record = &payroll::records_for_period(&conn, period_id).unwrap()[0];
        // IGSS 289.80 + ISR 300.00 + loan 250.00
        assert_eq!(record.deductions_total, dec("839.80"));
        assert_eq!(loans::get(&conn, loan_id).unwrap().balance, dec("1000.00"));

        let items = payroll::items_for_record(&conn, record.id).unwrap();
        assert!(items.iter().any(|i| i.source == ItemSource::Loan));
    }

    #[test]
    fn test_close_posts_loan_payments_and_blocks_regeneration() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);
        let loan_id = loans::insert(
            &conn,
            employee_id,
            "Adelanto",
            dec("1000.00"),
            dec("250.00"),
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        )
        .unwrap();

        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();
        let summary = close_period(&conn, period_id).unwrap();
        assert_eq!(summary.payments_posted, 1);
        assert_eq!(loans::get(&conn, loan_id).unwrap().balance, dec("750.00"));

        let again = generate_for_period(&conn, period_id, &StatutoryRates::default());
        assert!(matches!(again, Err(AppError::PeriodClosed { .. })));
        let close_again = close_period(&conn, period_id);
        assert!(matches!(close_again, Err(AppError::PeriodClosed { .. })));
    }

    #[test]
    fn test_fixed_benefit_with_override_changes_net() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);
        let entry_id = catalog::insert(
            &conn,
            "Bono",
            EntryKind::Benefit,
            CalcMethod::Fixed,
            dec("250.00"),
            None,
        )
        .unwrap();
        catalog::upsert_assignment(
            &conn,
            &crate::models::EmployeeAssignment {
                employee_id,
                entry_id,
                active: true,
                method_override: None,
                value_override: Some(dec("400.00")),
            },
        )
        .unwrap();

        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();

        let record = &payroll::records_for_period(&conn, period_id).unwrap()[0];
        assert_eq!(record.benefits_total, dec("400.00"));
        // 6000 + 400 - 589.80
        assert_eq!(record.net_pay, dec("5810.20"));
    }

    #[test]
    fn test_salary_snapshot_survives_employee_edit() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let employee_id = insert_employee(&conn, "Ana", "6000.00");
        let period_id = insert_period(&conn);
        generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();

        let mut input = EmployeeInput {
            code: Some("EMP-Ana".to_string()),
            first_name: "Ana".to_string(),
            last_name: "Test".to_string(),
            document_id: None,
            email: None,
            igss_number: None,
            position: None,
            birth_date: None,
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            base_salary: dec("9000.00"),
        };
        input.base_salary = dec("9000.00");
        employees::update(&conn, employee_id, &input).unwrap();

        recalculate_period(&conn, period_id, &StatutoryRates::default()).unwrap();

        let record = &payroll::records_for_period(&conn, period_id).unwrap()[0];
        assert_eq!(record.base_salary, dec("6000.00"));
        assert_eq!(record.prorated_base, dec("6000.00"));
    }
}
