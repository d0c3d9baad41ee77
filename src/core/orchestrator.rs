use tracing::debug;

use super::engine::{
    career_change_metrics, investment_strategy_metrics, major_purchase_metrics,
    project_career_change, project_investment_strategy, project_major_purchase,
};
use super::types::{DifferenceMetrics, FinancialSnapshot, ScenarioOutcome, ScenarioParameters};

pub fn run_scenario(parameters: &ScenarioParameters, snapshot: &FinancialSnapshot) -> ScenarioOutcome {
    let scenario_type = parameters.scenario_type();
    debug!(
        scenario = scenario_type.as_str(),
        years = parameters.years_to_simulate(),
        "running scenario"
    );

    let (series, difference_metrics) = match parameters {
        ScenarioParameters::CareerChange(params) => {
            let projection = project_career_change(snapshot, params);
            let metrics = career_change_metrics(&projection, params);
            (
                vec![projection.income, projection.cumulative_savings],
                DifferenceMetrics::CareerChange(metrics),
            )
        }
        ScenarioParameters::InvestmentStrategy(params) => {
            let series = project_investment_strategy(params);
            let metrics = investment_strategy_metrics(&series, params);
            (vec![series], DifferenceMetrics::InvestmentStrategy(metrics))
        }
        ScenarioParameters::MajorPurchase(params) => {
            let projection = project_major_purchase(snapshot, params);
            let metrics = major_purchase_metrics(&projection, params);
            (
                vec![projection.net_worth],
                DifferenceMetrics::MajorPurchase(metrics),
            )
        }
    };

    ScenarioOutcome {
        scenario_type,
        series,
        difference_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{
        CareerChangeParams, InvestmentStrategyParams, MajorPurchaseParams, PurchaseType,
        ScenarioType, SeriesKind,
    };

    fn sample_snapshot() -> FinancialSnapshot {
        FinancialSnapshot::new(120_000.0, 50_000.0, 800_000.0, 0.0, 8.0)
    }

    #[test]
    fn dispatches_career_change_to_two_series() {
        let params = ScenarioParameters::CareerChange(CareerChangeParams {
            current_monthly_salary: 50_000.0,
            new_monthly_salary: 80_000.0,
            years_to_simulate: 7,
            annual_growth_rate_pct: 4.0,
        });
        let outcome = run_scenario(&params, &sample_snapshot());
        assert_eq!(outcome.scenario_type, ScenarioType::CareerChange);
        let kinds: Vec<SeriesKind> = outcome.series.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SeriesKind::Income, SeriesKind::CumulativeSavings]);
        assert!(outcome.series.iter().all(|s| s.points.len() == 7));
        assert!(matches!(
            outcome.difference_metrics,
            DifferenceMetrics::CareerChange(ref m) if m.years_simulated == 7
        ));
    }

    #[test]
    fn dispatches_investment_strategy() {
        let params = ScenarioParameters::InvestmentStrategy(InvestmentStrategyParams {
            monthly_contribution: 5_000.0,
            current_annual_rate_pct: 6.0,
            new_annual_rate_pct: 10.0,
            years_to_simulate: 15,
        });
        let outcome = run_scenario(&params, &sample_snapshot());
        assert_eq!(outcome.scenario_type, ScenarioType::InvestmentStrategy);
        assert_eq!(outcome.series.len(), 1);
        assert_eq!(outcome.series[0].kind, SeriesKind::PortfolioValue);
        assert_eq!(outcome.series[0].points.len(), 15);
    }

    #[test]
    fn dispatches_major_purchase_with_baseline_row() {
        let params = ScenarioParameters::MajorPurchase(MajorPurchaseParams {
            purchase_type: PurchaseType::Vehicle,
            total_cost: 1_200_000.0,
            down_payment: 200_000.0,
            annual_interest_rate_pct: 9.0,
            loan_term_years: 5,
            monthly_rent_if_property: 0.0,
        });
        let outcome = run_scenario(&params, &sample_snapshot());
        assert_eq!(outcome.scenario_type, ScenarioType::MajorPurchase);
        assert_eq!(outcome.series[0].kind, SeriesKind::NetWorth);
        assert_eq!(outcome.series[0].points.len(), 6);
        assert_eq!(outcome.series[0].points[0].year, 0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let params = ScenarioParameters::InvestmentStrategy(InvestmentStrategyParams {
            monthly_contribution: 2_500.0,
            current_annual_rate_pct: 7.0,
            new_annual_rate_pct: 9.0,
            years_to_simulate: 40,
        });
        let snapshot = sample_snapshot();
        assert_eq!(run_scenario(&params, &snapshot), run_scenario(&params, &snapshot));
    }
}
