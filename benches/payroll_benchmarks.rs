//! Performance benchmarks for payroll generation.
//!
//! This suite tracks the cost of the computation core:
//! - Salary proration arithmetic
//! - Recalculating a single record (attendance + catalog + loans)
//! - Regenerating a whole period at increasing headcounts
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use planilla::config::StatutoryRates;
use planilla::db::Db;
use planilla::models::{CalcMethod, EntryKind, PunchKind};
use planilla::payroll::{generate_for_period, prorate, recalculate_period};
use planilla::store::employees::EmployeeInput;
use planilla::store::{attendance, catalog, employees, loans, periods};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Builds a period with the requested headcount. Every employee clocks in
/// on twenty days of the period, every third employee carries a loan, and
/// the catalog holds a fixed benefit on top of the statutory deductions.
fn seeded_period(employee_count: usize) -> (Db, i64) {
    let db = Db::open_in_memory().expect("open in-memory database");
    db.migrate().expect("apply schema");
    let conn = db.conn().unwrap();

    let period_id = periods::insert(
        &conn,
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        planilla::models::PeriodKind::Monthly,
    )
    .unwrap();

    catalog::insert(
        &conn,
        "Bono mensual",
        EntryKind::Benefit,
        CalcMethod::Fixed,
        dec("250.00"),
        None,
    )
    .unwrap();

    for i in 0..employee_count {
        let employee_id = employees::insert(
            &conn,
            &EmployeeInput {
                code: Some(format!("EMP-{i:04}")),
                first_name: format!("Empleado{i}"),
                last_name: "Prueba".to_string(),
                document_id: None,
                email: None,
                igss_number: None,
                position: None,
                birth_date: None,
                hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                base_salary: dec("6000.00") + Decimal::from(i as i64),
            },
        )
        .unwrap();

        for day in 2..22 {
            let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
            let at = Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap());
            attendance::record(&conn, employee_id, at, PunchKind::ClockIn, None).unwrap();
        }

        if i % 3 == 0 {
            loans::insert(
                &conn,
                employee_id,
                "Adelanto",
                dec("1000.00"),
                dec("250.00"),
                NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            )
            .unwrap();
        }
    }

    // First generation creates the records and the statutory entries so the
    // benchmarks below measure steady-state recalculation.
    generate_for_period(&conn, period_id, &StatutoryRates::default()).unwrap();
    drop(conn);
    (db, period_id)
}

/// Benchmark: the proration arithmetic on its own.
fn bench_prorate(c: &mut Criterion) {
    let base = dec("6234.56");
    c.bench_function("prorate", |b| {
        b.iter(|| {
            for days in 1..=31 {
                black_box(prorate(black_box(base), days, 31));
            }
        })
    });
}

/// Benchmark: recalculating a single-employee period.
fn bench_recalculate_single(c: &mut Criterion) {
    let (db, period_id) = seeded_period(1);
    let rates = StatutoryRates::default();

    c.bench_function("recalculate_single_record", |b| {
        b.iter(|| {
            let conn = db.conn().unwrap();
            black_box(recalculate_period(&conn, period_id, &rates).unwrap())
        })
    });
}

/// Benchmark: regenerating whole periods at increasing headcounts.
fn bench_generation_scaling(c: &mut Criterion) {
    let rates = StatutoryRates::default();
    let mut group = c.benchmark_group("generation");
    group.sample_size(10);

    for employee_count in [10, 50, 100] {
        let (db, period_id) = seeded_period(employee_count);

        group.throughput(Throughput::Elements(employee_count as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", employee_count),
            &employee_count,
            |b, _| {
                b.iter(|| {
                    let conn = db.conn().unwrap();
                    black_box(generate_for_period(&conn, period_id, &rates).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_prorate,
    bench_recalculate_single,
    bench_generation_scaling,
);
criterion_main!(benches);
