use std::collections::BTreeMap;

use super::calc::MONTHS_PER_YEAR;
use super::types::{FinancialRecords, FinancialSnapshot, Frequency};

pub const WEEKS_PER_MONTH: f64 = 4.33;

pub fn monthly_equivalent(amount: f64, frequency: Frequency) -> f64 {
    let monthly = match frequency {
        Frequency::Weekly => amount * WEEKS_PER_MONTH,
        Frequency::Monthly => amount,
        Frequency::Yearly | Frequency::OneTime => amount / MONTHS_PER_YEAR,
    };
    finite_or_zero(monthly)
}

/// Reduces raw records into a snapshot. Never fails: empty lists sum to
/// zero and non-finite artifacts are coerced to zero.
///
/// Net worth is cost basis (`initial_investment`, falling back to current
/// value when absent) minus outstanding loan balances.
pub fn aggregate_snapshot(
    records: &FinancialRecords,
    assumed_investment_return_rate_pct: f64,
) -> FinancialSnapshot {
    let monthly_income = sum_finite(
        records
            .incomes
            .iter()
            .map(|income| monthly_equivalent(income.amount, income.frequency)),
    );

    let mut expenses_by_category: BTreeMap<String, f64> = BTreeMap::new();
    for expense in &records.expenses {
        let monthly = monthly_equivalent(expense.amount, expense.frequency);
        *expenses_by_category
            .entry(expense.category.clone())
            .or_insert(0.0) += monthly;
    }
    let monthly_expenses = sum_finite(expenses_by_category.values().copied());

    let total_initial_investment = sum_finite(
        records
            .investments
            .iter()
            .map(|inv| inv.initial_investment.unwrap_or(inv.current_value)),
    );
    let total_debt = sum_finite(records.loans.iter().map(|loan| loan.outstanding_balance));
    let monthly_debt_service = sum_finite(records.loans.iter().map(|loan| loan.monthly_payment));

    let mut snapshot = FinancialSnapshot::new(
        monthly_income,
        monthly_expenses,
        total_initial_investment,
        total_debt,
        finite_or_zero(assumed_investment_return_rate_pct),
    );
    snapshot.monthly_debt_service = monthly_debt_service;
    snapshot.expenses_by_category = expenses_by_category;
    snapshot
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn sum_finite(values: impl Iterator<Item = f64>) -> f64 {
    finite_or_zero(values.map(finite_or_zero).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{
        ExpenseKind, ExpenseRecord, IncomeRecord, InvestmentRecord, LoanRecord,
    };

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn expense(amount: f64, frequency: Frequency, category: &str) -> ExpenseRecord {
        ExpenseRecord {
            amount,
            frequency,
            kind: ExpenseKind::Fixed,
            category: category.to_string(),
        }
    }

    #[test]
    fn empty_records_produce_zero_snapshot() {
        let snapshot = aggregate_snapshot(&FinancialRecords::default(), 8.0);
        assert_approx(snapshot.monthly_income, 0.0);
        assert_approx(snapshot.monthly_expenses, 0.0);
        assert_approx(snapshot.monthly_savings, 0.0);
        assert_approx(snapshot.net_worth, 0.0);
        assert_approx(snapshot.savings_rate_pct, 0.0);
        assert_approx(snapshot.assumed_investment_return_rate_pct, 8.0);
        assert!(snapshot.expenses_by_category.is_empty());
    }

    #[test]
    fn frequencies_convert_to_monthly_equivalents() {
        assert_approx(monthly_equivalent(1_000.0, Frequency::Weekly), 4_330.0);
        assert_approx(monthly_equivalent(1_000.0, Frequency::Monthly), 1_000.0);
        assert_approx(monthly_equivalent(120_000.0, Frequency::Yearly), 10_000.0);
        assert_approx(monthly_equivalent(24_000.0, Frequency::OneTime), 2_000.0);
    }

    #[test]
    fn aggregates_income_expenses_and_net_worth() {
        let records = FinancialRecords {
            incomes: vec![
                IncomeRecord {
                    amount: 80_000.0,
                    frequency: Frequency::Monthly,
                },
                IncomeRecord {
                    amount: 120_000.0,
                    frequency: Frequency::Yearly,
                },
            ],
            expenses: vec![
                expense(20_000.0, Frequency::Monthly, "rent"),
                expense(6_000.0, Frequency::Monthly, "food"),
                expense(12_000.0, Frequency::Yearly, "food"),
            ],
            investments: vec![
                InvestmentRecord {
                    current_value: 500_000.0,
                    initial_investment: Some(400_000.0),
                },
                InvestmentRecord {
                    current_value: 100_000.0,
                    initial_investment: None,
                },
            ],
            loans: vec![LoanRecord {
                outstanding_balance: 150_000.0,
                monthly_payment: 5_000.0,
            }],
        };

        let snapshot = aggregate_snapshot(&records, 7.5);
        assert_approx(snapshot.monthly_income, 90_000.0);
        assert_approx(snapshot.monthly_expenses, 27_000.0);
        assert_approx(snapshot.monthly_savings, 63_000.0);
        assert_approx(snapshot.total_initial_investment, 500_000.0);
        assert_approx(snapshot.total_debt, 150_000.0);
        assert_approx(snapshot.net_worth, 350_000.0);
        assert_approx(snapshot.monthly_debt_service, 5_000.0);
        assert_approx(snapshot.expenses_by_category["food"], 7_000.0);
        assert_approx(snapshot.expenses_by_category["rent"], 20_000.0);
        assert_approx(snapshot.savings_rate_pct, 70.0);
    }

    #[test]
    fn non_finite_amounts_are_coerced_to_zero() {
        let records = FinancialRecords {
            incomes: vec![
                IncomeRecord {
                    amount: f64::NAN,
                    frequency: Frequency::Monthly,
                },
                IncomeRecord {
                    amount: 10_000.0,
                    frequency: Frequency::Monthly,
                },
            ],
            expenses: vec![expense(f64::INFINITY, Frequency::Yearly, "misc")],
            investments: vec![InvestmentRecord {
                current_value: f64::NAN,
                initial_investment: None,
            }],
            loans: vec![],
        };

        let snapshot = aggregate_snapshot(&records, f64::NAN);
        assert_approx(snapshot.monthly_income, 10_000.0);
        assert_approx(snapshot.monthly_expenses, 0.0);
        assert_approx(snapshot.total_initial_investment, 0.0);
        assert_approx(snapshot.assumed_investment_return_rate_pct, 0.0);
        assert!(snapshot.net_worth.is_finite());
    }

    #[test]
    fn net_worth_can_be_negative() {
        let records = FinancialRecords {
            loans: vec![LoanRecord {
                outstanding_balance: 90_000.0,
                monthly_payment: 0.0,
            }],
            ..FinancialRecords::default()
        };
        let snapshot = aggregate_snapshot(&records, 8.0);
        assert_approx(snapshot.net_worth, -90_000.0);
    }
}
