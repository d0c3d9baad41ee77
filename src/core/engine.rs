use super::calc::{
    MONTHS_PER_YEAR, amortization_schedule, future_value_of_monthly_contribution,
    monthly_installment,
};
use super::types::{
    CareerChangeMetrics, CareerChangeParams, FinancialSnapshot, InvestmentStrategyMetrics,
    InvestmentStrategyParams, MajorPurchaseMetrics, MajorPurchaseParams, ProjectionPoint,
    ProjectionSeries, PurchaseType, SeriesKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CareerChangeProjection {
    pub income: ProjectionSeries,
    pub cumulative_savings: ProjectionSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MajorPurchaseProjection {
    pub loan_amount: f64,
    pub monthly_emi: f64,
    pub net_worth: ProjectionSeries,
}

/// Income and cumulative savings on the current and new salary paths.
///
/// Year 1 uses the raw annual salary; growth compounds from year 2. Both
/// paths share the same flat expense line taken from the snapshot.
pub fn project_career_change(
    snapshot: &FinancialSnapshot,
    params: &CareerChangeParams,
) -> CareerChangeProjection {
    let years = params.years_to_simulate;
    let growth = 1.0 + params.annual_growth_rate_pct / 100.0;
    let annual_expenses = snapshot.monthly_expenses * MONTHS_PER_YEAR;

    let mut current_income = params.current_monthly_salary * MONTHS_PER_YEAR;
    let mut new_income = params.new_monthly_salary * MONTHS_PER_YEAR;
    let mut current_savings = 0.0;
    let mut new_savings = 0.0;

    let mut income = Vec::with_capacity(years as usize);
    let mut savings = Vec::with_capacity(years as usize);
    for year in 1..=years {
        if year > 1 {
            current_income *= growth;
            new_income *= growth;
        }
        current_savings += current_income - annual_expenses;
        new_savings += new_income - annual_expenses;

        income.push(ProjectionPoint::new(year, current_income, new_income));
        savings.push(ProjectionPoint::new(year, current_savings, new_savings));
    }

    CareerChangeProjection {
        income: ProjectionSeries {
            kind: SeriesKind::Income,
            points: income,
        },
        cumulative_savings: ProjectionSeries {
            kind: SeriesKind::CumulativeSavings,
            points: savings,
        },
    }
}

pub fn career_change_metrics(
    projection: &CareerChangeProjection,
    params: &CareerChangeParams,
) -> CareerChangeMetrics {
    CareerChangeMetrics {
        income_difference: final_difference(&projection.income),
        savings_difference: final_difference(&projection.cumulative_savings),
        new_monthly_salary: params.new_monthly_salary,
        years_simulated: projection.income.points.len() as u32,
    }
}

pub fn project_investment_strategy(params: &InvestmentStrategyParams) -> ProjectionSeries {
    let points = (1..=params.years_to_simulate)
        .map(|year| {
            let elapsed = year as f64;
            let mut point = ProjectionPoint::new(
                year,
                future_value_of_monthly_contribution(
                    params.monthly_contribution,
                    params.current_annual_rate_pct,
                    elapsed,
                ),
                future_value_of_monthly_contribution(
                    params.monthly_contribution,
                    params.new_annual_rate_pct,
                    elapsed,
                ),
            );
            point.invested_corpus = Some(total_contributed(params.monthly_contribution, year));
            point
        })
        .collect();

    ProjectionSeries {
        kind: SeriesKind::PortfolioValue,
        points,
    }
}

pub fn investment_strategy_metrics(
    series: &ProjectionSeries,
    params: &InvestmentStrategyParams,
) -> InvestmentStrategyMetrics {
    let (current, new) = series
        .last()
        .map(|p| (p.current_path_value, p.new_path_value))
        .unwrap_or((0.0, 0.0));
    InvestmentStrategyMetrics {
        current_strategy_final_amount: current,
        new_strategy_final_amount: new,
        difference: new - current,
        total_investment_made: total_contributed(
            params.monthly_contribution,
            params.years_to_simulate,
        ),
    }
}

fn total_contributed(monthly_contribution: f64, years: u32) -> f64 {
    monthly_contribution * MONTHS_PER_YEAR * years as f64
}

/// Net worth with and without the purchase over the loan term, starting with
/// a year-0 baseline row.
///
/// Without the purchase the down payment stays invested and (for property)
/// the rent figure is added to yearly savings. With the purchase the asset
/// is carried at cost and the loan balance runs down on the yearly schedule.
/// Both corpora take their contributions first, then compound; existing
/// unrelated debt is subtracted on both tracks.
pub fn project_major_purchase(
    snapshot: &FinancialSnapshot,
    params: &MajorPurchaseParams,
) -> MajorPurchaseProjection {
    let years = params.loan_term_years;
    let loan_amount = params.loan_amount();
    let monthly_emi = monthly_installment(loan_amount, params.annual_interest_rate_pct, years);

    let growth = 1.0 + snapshot.assumed_investment_return_rate_pct / 100.0;
    let annual_savings = snapshot.monthly_savings * MONTHS_PER_YEAR;
    let annual_rent = params.effective_monthly_rent() * MONTHS_PER_YEAR;
    let asset_value = params.total_cost;
    let existing_debt = snapshot.total_debt;

    let mut corpus_without = (snapshot.total_initial_investment + params.down_payment).max(0.0);
    let mut corpus_with = (snapshot.total_initial_investment - params.down_payment).max(0.0);
    let schedule = amortization_schedule(loan_amount, params.annual_interest_rate_pct, years);

    let mut points = Vec::with_capacity(years as usize + 1);
    points.push(purchase_point(
        0,
        corpus_without - existing_debt,
        corpus_with,
        asset_value,
        loan_amount,
        existing_debt,
    ));

    for (year, step) in (1..=years).zip(&schedule) {
        corpus_without = ((corpus_without + annual_savings + annual_rent) * growth).max(0.0);
        corpus_with = ((corpus_with + annual_savings) * growth).max(0.0);

        points.push(purchase_point(
            year,
            corpus_without - existing_debt,
            corpus_with,
            asset_value,
            step.new_balance,
            existing_debt,
        ));
    }

    MajorPurchaseProjection {
        loan_amount,
        monthly_emi,
        net_worth: ProjectionSeries {
            kind: SeriesKind::NetWorth,
            points,
        },
    }
}

fn purchase_point(
    year: u32,
    net_worth_without: f64,
    corpus_with: f64,
    asset_value: f64,
    loan_balance: f64,
    existing_debt: f64,
) -> ProjectionPoint {
    ProjectionPoint {
        year,
        current_path_value: net_worth_without,
        new_path_value: corpus_with + asset_value - loan_balance - existing_debt,
        asset_value: Some(asset_value),
        loan_balance: Some(loan_balance),
        invested_corpus: Some(corpus_with),
    }
}

pub fn major_purchase_metrics(
    projection: &MajorPurchaseProjection,
    params: &MajorPurchaseParams,
) -> MajorPurchaseMetrics {
    let (without, with) = projection
        .net_worth
        .last()
        .map(|p| (p.current_path_value, p.new_path_value))
        .unwrap_or((0.0, 0.0));
    MajorPurchaseMetrics {
        loan_amount: projection.loan_amount,
        monthly_emi: projection.monthly_emi,
        final_net_worth_without_purchase: without,
        final_net_worth_with_purchase: with,
        net_worth_difference: with - without,
        years_simulated: params.loan_term_years,
        monthly_rent: match params.purchase_type {
            PurchaseType::Property => Some(params.effective_monthly_rent()),
            PurchaseType::Vehicle | PurchaseType::Other => None,
        },
    }
}

fn final_difference(series: &ProjectionSeries) -> f64 {
    series.last().map(ProjectionPoint::difference).unwrap_or(0.0)
}
