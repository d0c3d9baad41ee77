pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanYear {
    pub interest_accrued: f64,
    pub principal_paid: f64,
    pub new_balance: f64,
}

fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / MONTHS_PER_YEAR
}

/// Fixed monthly installment (EMI) for a fully amortising loan.
///
/// Falls back to straight-line repayment when the rate is zero. Returns 0
/// for a non-positive principal or a zero term.
pub fn monthly_installment(principal: f64, annual_rate_pct: f64, term_years: u32) -> f64 {
    if principal <= 0.0 || term_years == 0 {
        return 0.0;
    }

    let n = term_years as f64 * MONTHS_PER_YEAR;
    let r = monthly_rate(annual_rate_pct);
    if r == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// Advances a loan by one year at yearly granularity.
///
/// Interest is charged on the opening balance for the whole year rather
/// than compounded month by month. That overstates interest, so
/// twelve installments leave a residual by the end of the term; the final
/// year (`years_remaining <= 1`) therefore settles whatever is outstanding.
///
/// The residual grows with rate and term. At 8.5% over 20 years about 7% of
/// the principal is settled in the last year; at 30% over 40 years the
/// yearly interest almost matches twelve installments, so roughly 80% of
/// the principal is still outstanding at the final year.
pub fn advance_one_year(
    balance: f64,
    annual_rate_pct: f64,
    monthly_installment: f64,
    years_remaining: u32,
) -> LoanYear {
    if balance <= 0.0 {
        return LoanYear {
            interest_accrued: 0.0,
            principal_paid: 0.0,
            new_balance: 0.0,
        };
    }

    let interest_accrued = balance * annual_rate_pct / 100.0;
    let principal_paid = if years_remaining <= 1 {
        balance
    } else {
        (MONTHS_PER_YEAR * monthly_installment - interest_accrued)
            .max(0.0)
            .min(balance)
    };

    LoanYear {
        interest_accrued,
        principal_paid,
        new_balance: (balance - principal_paid).max(0.0),
    }
}

pub fn amortization_schedule(principal: f64, annual_rate_pct: f64, term_years: u32) -> Vec<LoanYear> {
    let installment = monthly_installment(principal, annual_rate_pct, term_years);
    let mut balance = principal.max(0.0);
    let mut years = Vec::with_capacity(term_years as usize);
    for year in 1..=term_years {
        let step = advance_one_year(balance, annual_rate_pct, installment, term_years - year + 1);
        balance = step.new_balance;
        years.push(step);
    }
    years
}

/// Future value of an ordinary annuity: a fixed contribution at the end of
/// every month, compounded monthly, after `years` (may be fractional).
pub fn future_value_of_monthly_contribution(
    monthly_amount: f64,
    annual_rate_pct: f64,
    years: f64,
) -> f64 {
    if monthly_amount <= 0.0 || years <= 0.0 {
        return 0.0;
    }

    let i = monthly_rate(annual_rate_pct);
    if i == 0.0 {
        return monthly_amount * MONTHS_PER_YEAR * years;
    }

    let m = years * MONTHS_PER_YEAR;
    monthly_amount * ((1.0 + i).powf(m) - 1.0) / i
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn installment_matches_standard_formula() {
        let emi = monthly_installment(4_000_000.0, 8.5, 20);
        assert_approx_tol(emi, 34_712.93, 0.01);
        assert!(emi * 240.0 > 4_000_000.0);
    }

    #[test]
    fn installment_degrades_to_straight_line_at_zero_rate() {
        assert_approx(monthly_installment(120_000.0, 0.0, 10), 1_000.0);
    }

    #[test]
    fn installment_is_zero_for_degenerate_inputs() {
        assert_approx(monthly_installment(0.0, 9.0, 10), 0.0);
        assert_approx(monthly_installment(-5.0, 9.0, 10), 0.0);
        assert_approx(monthly_installment(100_000.0, 9.0, 0), 0.0);
    }

    #[test]
    fn advance_one_year_splits_interest_and_principal() {
        let emi = monthly_installment(4_000_000.0, 8.5, 20);
        let step = advance_one_year(4_000_000.0, 8.5, emi, 20);
        assert_approx(step.interest_accrued, 340_000.0);
        assert_approx(step.principal_paid, emi * 12.0 - 340_000.0);
        assert_approx(step.new_balance, 4_000_000.0 - step.principal_paid);
        assert_approx(step.interest_accrued + step.principal_paid, emi * 12.0);
    }

    #[test]
    fn advance_one_year_never_goes_negative() {
        let step = advance_one_year(1_000.0, 5.0, 10_000.0, 5);
        assert_approx(step.principal_paid, 1_000.0);
        assert_approx(step.new_balance, 0.0);

        let settled = advance_one_year(0.0, 5.0, 10_000.0, 5);
        assert_approx(settled.principal_paid, 0.0);
        assert_approx(settled.interest_accrued, 0.0);
    }

    #[test]
    fn high_rate_long_term_settles_a_large_balloon() {
        let schedule = amortization_schedule(1_000_000.0, 30.0, 40);
        let emi = monthly_installment(1_000_000.0, 30.0, 40);
        let last = schedule[39];
        assert!(last.principal_paid > 0.75 * 1_000_000.0);
        assert!(last.principal_paid > emi * 12.0);
        assert_approx(last.new_balance, 0.0);
    }

    #[test]
    fn final_year_settles_the_residual() {
        let schedule = amortization_schedule(4_000_000.0, 8.5, 20);
        assert_eq!(schedule.len(), 20);
        let before_last = schedule[18].new_balance;
        assert!(before_last > 0.0);
        assert_approx(schedule[19].principal_paid, before_last);
        assert_approx(schedule[19].new_balance, 0.0);
    }

    #[test]
    fn future_value_zero_rate_is_sum_of_contributions() {
        assert_eq!(
            future_value_of_monthly_contribution(10_000.0, 0.0, 10.0),
            10_000.0 * 12.0 * 10.0
        );
    }

    #[test]
    fn future_value_matches_closed_form() {
        let fv = future_value_of_monthly_contribution(1_000.0, 12.0, 1.0);
        let expected = 1_000.0 * (1.01_f64.powi(12) - 1.0) / 0.01;
        assert_approx(fv, expected);
        assert_approx_tol(fv, 12_682.50, 0.01);
    }

    #[test]
    fn future_value_is_zero_without_time_or_money() {
        assert_approx(future_value_of_monthly_contribution(1_000.0, 10.0, 0.0), 0.0);
        assert_approx(future_value_of_monthly_contribution(0.0, 10.0, 5.0), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_schedule_pays_off_loan_by_final_year(
            principal in 1_000u32..50_000_000,
            rate_bp in 0u32..3_000,
            term in 1u32..41
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 100.0;
            let schedule = amortization_schedule(principal, rate, term);
            prop_assert_eq!(schedule.len(), term as usize);

            let mut previous = principal;
            for year in &schedule {
                prop_assert!(year.new_balance >= 0.0);
                prop_assert!(year.new_balance <= previous + 1e-9);
                previous = year.new_balance;
            }
            prop_assert!(schedule[schedule.len() - 1].new_balance.abs() <= 1e-6);

            let repaid: f64 = schedule.iter().map(|y| y.principal_paid).sum();
            prop_assert!((repaid - principal).abs() <= principal * 1e-9);
        }

        #[test]
        fn prop_zero_rate_future_value_is_linear(
            amount in 1u32..1_000_000,
            years in 0u32..41
        ) {
            let amount = amount as f64;
            let years = years as f64;
            prop_assert_eq!(
                future_value_of_monthly_contribution(amount, 0.0, years),
                amount * 12.0 * years
            );
        }

        #[test]
        fn prop_future_value_is_monotonic_in_years_and_rate(
            amount in 1u32..500_000,
            rate_bp in 0u32..2_500,
            years in 1u32..40
        ) {
            let amount = amount as f64;
            let rate = rate_bp as f64 / 100.0;
            let years = years as f64;
            let base = future_value_of_monthly_contribution(amount, rate, years);
            let longer = future_value_of_monthly_contribution(amount, rate, years + 1.0);
            let richer = future_value_of_monthly_contribution(amount, rate + 0.5, years);
            prop_assert!(longer > base);
            prop_assert!(richer > base);
        }
    }
}
