use serde::Serialize;

use crate::core::{
    DifferenceMetrics, FinancialSnapshot, ProjectionSeries, ScenarioOutcome, ScenarioParameters,
    ScenarioType, SeriesKind,
};

pub fn format_inr(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let grouped = group_indian_digits(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

fn group_indian_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

fn format_pct(value: f64) -> String {
    format!("{value}%")
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub label: String,
    pub value: String,
}

fn money(label: impl Into<String>, value: f64) -> Figure {
    Figure {
        label: label.into(),
        value: format_inr(value),
    }
}

fn plain(label: impl Into<String>, value: impl ToString) -> Figure {
    Figure {
        label: label.into(),
        value: value.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRow {
    pub year: u32,
    pub current_path: String,
    pub new_path: String,
    pub difference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invested_corpus: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSeries {
    pub kind: SeriesKind,
    pub rows: Vec<FormattedRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeInput {
    pub scenario_type: ScenarioType,
    pub snapshot: Vec<Figure>,
    pub parameters: Vec<Figure>,
    pub difference_metrics: Vec<Figure>,
    pub series: Vec<FormattedSeries>,
}

pub fn build_narrative_input(
    parameters: &ScenarioParameters,
    snapshot: &FinancialSnapshot,
    outcome: &ScenarioOutcome,
) -> NarrativeInput {
    NarrativeInput {
        scenario_type: outcome.scenario_type,
        snapshot: snapshot_figures(snapshot),
        parameters: parameter_figures(parameters),
        difference_metrics: metric_figures(&outcome.difference_metrics),
        series: outcome.series.iter().map(format_series).collect(),
    }
}

fn snapshot_figures(snapshot: &FinancialSnapshot) -> Vec<Figure> {
    let mut figures = vec![
        money("Monthly income", snapshot.monthly_income),
        money("Monthly expenses", snapshot.monthly_expenses),
        money("Monthly savings", snapshot.monthly_savings),
        plain("Savings rate", format!("{:.1}%", snapshot.savings_rate_pct)),
        money("Total initial investment", snapshot.total_initial_investment),
        money("Total debt", snapshot.total_debt),
        money("Monthly debt service", snapshot.monthly_debt_service),
        money("Net worth", snapshot.net_worth),
        plain(
            "Assumed investment return",
            format_pct(snapshot.assumed_investment_return_rate_pct),
        ),
    ];
    figures.extend(
        snapshot
            .expenses_by_category
            .iter()
            .map(|(category, amount)| money(format!("Monthly expenses ({category})"), *amount)),
    );
    figures
}

fn parameter_figures(parameters: &ScenarioParameters) -> Vec<Figure> {
    match parameters {
        ScenarioParameters::CareerChange(p) => vec![
            money("Current monthly salary", p.current_monthly_salary),
            money("New monthly salary", p.new_monthly_salary),
            plain("Years simulated", p.years_to_simulate),
            plain("Annual salary growth", format_pct(p.annual_growth_rate_pct)),
        ],
        ScenarioParameters::InvestmentStrategy(p) => vec![
            money("Monthly contribution", p.monthly_contribution),
            plain("Current annual return", format_pct(p.current_annual_rate_pct)),
            plain("New annual return", format_pct(p.new_annual_rate_pct)),
            plain("Years simulated", p.years_to_simulate),
        ],
        ScenarioParameters::MajorPurchase(p) => {
            let mut figures = vec![
                plain("Purchase type", format!("{:?}", p.purchase_type).to_lowercase()),
                money("Total cost", p.total_cost),
                money("Down payment", p.down_payment),
                plain("Loan interest rate", format_pct(p.annual_interest_rate_pct)),
                plain("Loan term (years)", p.loan_term_years),
            ];
            let rent = p.effective_monthly_rent();
            if rent > 0.0 {
                figures.push(money("Monthly rent", rent));
            }
            figures
        }
    }
}

fn metric_figures(metrics: &DifferenceMetrics) -> Vec<Figure> {
    match metrics {
        DifferenceMetrics::CareerChange(m) => vec![
            money("Final-year income difference", m.income_difference),
            money("Cumulative savings difference", m.savings_difference),
            money("New monthly salary", m.new_monthly_salary),
            plain("Years simulated", m.years_simulated),
        ],
        DifferenceMetrics::InvestmentStrategy(m) => vec![
            money("Current strategy final amount", m.current_strategy_final_amount),
            money("New strategy final amount", m.new_strategy_final_amount),
            money("Difference", m.difference),
            money("Total investment made", m.total_investment_made),
        ],
        DifferenceMetrics::MajorPurchase(m) => {
            let mut figures = vec![
                money("Loan amount", m.loan_amount),
                money("Monthly EMI", m.monthly_emi),
                money(
                    "Final net worth without purchase",
                    m.final_net_worth_without_purchase,
                ),
                money("Final net worth with purchase", m.final_net_worth_with_purchase),
                money("Net worth difference", m.net_worth_difference),
                plain("Years simulated", m.years_simulated),
            ];
            if let Some(rent) = m.monthly_rent {
                figures.push(money("Monthly rent", rent));
            }
            figures
        }
    }
}

fn format_series(series: &ProjectionSeries) -> FormattedSeries {
    FormattedSeries {
        kind: series.kind,
        rows: series
            .points
            .iter()
            .map(|p| FormattedRow {
                year: p.year,
                current_path: format_inr(p.current_path_value),
                new_path: format_inr(p.new_path_value),
                difference: format_inr(p.difference()),
                asset_value: p.asset_value.map(format_inr),
                loan_balance: p.loan_balance.map(format_inr),
                invested_corpus: p.invested_corpus.map(format_inr),
            })
            .collect(),
    }
}
