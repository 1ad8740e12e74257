//! Salary proration by attendance days.

use rust_decimal::Decimal;

/// Determines how many days of the period an employee is paid for.
///
/// Employees with no punches at all inside the period are treated as
/// salaried-without-clocking and paid the full period. Any punches switch
/// the record to prorated pay on distinct clock-in days, capped at the
/// period length.
///
/// # Example
///
/// ```
/// use planilla::payroll::resolve_payable_days;
///
/// assert_eq!(resolve_payable_days(false, 0, 31), 31);
/// assert_eq!(resolve_payable_days(true, 20, 31), 20);
/// assert_eq!(resolve_payable_days(true, 40, 31), 31);
/// ```
pub fn resolve_payable_days(has_punches: bool, worked_days: i64, period_days: i64) -> i64 {
    if !has_punches {
        return period_days;
    }
    worked_days.min(period_days)
}

/// Prorates a base salary over the payable portion of a period.
///
/// Returns `base * payable_days / period_days` rounded to two decimal
/// places. A full period returns the base unchanged; a non-positive period
/// length yields zero.
///
/// # Example
///
/// ```
/// use planilla::payroll::prorate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let base = Decimal::from_str("6200.00").unwrap();
/// assert_eq!(prorate(base, 31, 31), base);
/// assert_eq!(prorate(base, 15, 31), Decimal::from_str("3000.00").unwrap());
/// ```
pub fn prorate(base: Decimal, payable_days: i64, period_days: i64) -> Decimal {
    if period_days <= 0 || payable_days <= 0 {
        return Decimal::ZERO;
    }
    if payable_days >= period_days {
        return base;
    }
    let fraction = Decimal::from(payable_days) / Decimal::from(period_days);
    (base * fraction).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_period_returns_base_unchanged() {
        assert_eq!(prorate(dec("6000.00"), 31, 31), dec("6000.00"));
    }

    #[test]
    fn test_half_period_halves_salary() {
        assert_eq!(prorate(dec("6000.00"), 15, 30), dec("3000.00"));
    }

    #[test]
    fn test_uneven_fraction_rounds_to_two_places() {
        // 6000 * 20 / 31 = 3870.9677...
        assert_eq!(prorate(dec("6000.00"), 20, 31), dec("3870.97"));
    }

    #[test]
    fn test_zero_payable_days_pays_nothing() {
        assert_eq!(prorate(dec("6000.00"), 0, 31), Decimal::ZERO);
    }

    #[test]
    fn test_excess_payable_days_capped_at_base() {
        assert_eq!(prorate(dec("6000.00"), 40, 31), dec("6000.00"));
    }

    #[test]
    fn test_zero_length_period_pays_nothing() {
        assert_eq!(prorate(dec("6000.00"), 5, 0), Decimal::ZERO);
    }

    #[test]
    fn test_no_punches_pays_full_period() {
        assert_eq!(resolve_payable_days(false, 0, 31), 31);
        assert_eq!(resolve_payable_days(false, 12, 31), 31);
    }

    #[test]
    fn test_punches_prorate_by_worked_days() {
        assert_eq!(resolve_payable_days(true, 0, 31), 0);
        assert_eq!(resolve_payable_days(true, 20, 31), 20);
    }

    proptest! {
        #[test]
        fn prorated_never_exceeds_base(
            cents in 0i64..100_000_000i64,
            payable in 0i64..64i64,
            period in 1i64..64i64,
        ) {
            let base = Decimal::new(cents, 2);
            let prorated = prorate(base, payable, period);
            prop_assert!(prorated <= base);
            prop_assert!(prorated >= Decimal::ZERO);
        }

        #[test]
        fn full_attendance_always_pays_base(
            cents in 0i64..100_000_000i64,
            period in 1i64..64i64,
        ) {
            let base = Decimal::new(cents, 2);
            prop_assert_eq!(prorate(base, period, period), base);
        }
    }
}
