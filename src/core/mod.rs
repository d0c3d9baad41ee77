mod calc;
mod engine;
mod orchestrator;
mod snapshot;
mod types;

pub use calc::{
    LoanYear, advance_one_year, amortization_schedule, future_value_of_monthly_contribution,
    monthly_installment,
};
pub use engine::{
    CareerChangeProjection, MajorPurchaseProjection, career_change_metrics,
    investment_strategy_metrics, major_purchase_metrics, project_career_change,
    project_investment_strategy, project_major_purchase,
};
pub use orchestrator::run_scenario;
pub use snapshot::{aggregate_snapshot, monthly_equivalent};
pub use types::{
    CareerChangeMetrics, CareerChangeParams, DifferenceMetrics, ExpenseKind, ExpenseRecord,
    FinancialRecords, FinancialSnapshot, Frequency, IncomeRecord, InvestmentRecord,
    InvestmentStrategyMetrics, InvestmentStrategyParams, LoanRecord, MajorPurchaseMetrics,
    MajorPurchaseParams, ProjectionPoint, ProjectionSeries, PurchaseType, ScenarioOutcome,
    ScenarioParameters, ScenarioType, SeriesKind,
};
