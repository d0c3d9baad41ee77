use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
    #[serde(alias = "one_time", alias = "oneTime", alias = "once")]
    OneTime,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseKind {
    Fixed,
    Variable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRecord {
    pub amount: f64,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub amount: f64,
    pub frequency: Frequency,
    #[serde(default = "default_expense_kind", rename = "type")]
    pub kind: ExpenseKind,
    #[serde(default = "default_expense_category")]
    pub category: String,
}

fn default_expense_kind() -> ExpenseKind {
    ExpenseKind::Variable
}

fn default_expense_category() -> String {
    "other".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub current_value: f64,
    #[serde(default)]
    pub initial_investment: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub outstanding_balance: f64,
    #[serde(default)]
    pub monthly_payment: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialRecords {
    pub incomes: Vec<IncomeRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub investments: Vec<InvestmentRecord>,
    pub loans: Vec<LoanRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_savings: f64,
    pub savings_rate_pct: f64,
    pub total_initial_investment: f64,
    pub total_debt: f64,
    pub net_worth: f64,
    pub assumed_investment_return_rate_pct: f64,
    pub monthly_debt_service: f64,
    pub expenses_by_category: BTreeMap<String, f64>,
}

impl FinancialSnapshot {
    pub fn new(
        monthly_income: f64,
        monthly_expenses: f64,
        total_initial_investment: f64,
        total_debt: f64,
        assumed_investment_return_rate_pct: f64,
    ) -> Self {
        let monthly_savings = monthly_income - monthly_expenses;
        let savings_rate_pct = if monthly_income > 0.0 {
            monthly_savings / monthly_income * 100.0
        } else {
            0.0
        };
        Self {
            monthly_income,
            monthly_expenses,
            monthly_savings,
            savings_rate_pct,
            total_initial_investment,
            total_debt,
            net_worth: total_initial_investment - total_debt,
            assumed_investment_return_rate_pct,
            monthly_debt_service: 0.0,
            expenses_by_category: BTreeMap::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioType {
    CareerChange,
    InvestmentStrategy,
    MajorPurchase,
}

impl ScenarioType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioType::CareerChange => "career-change",
            ScenarioType::InvestmentStrategy => "investment-strategy",
            ScenarioType::MajorPurchase => "major-purchase",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseType {
    Property,
    Vehicle,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerChangeParams {
    pub current_monthly_salary: f64,
    pub new_monthly_salary: f64,
    pub years_to_simulate: u32,
    pub annual_growth_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStrategyParams {
    pub monthly_contribution: f64,
    pub current_annual_rate_pct: f64,
    pub new_annual_rate_pct: f64,
    pub years_to_simulate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorPurchaseParams {
    pub purchase_type: PurchaseType,
    pub total_cost: f64,
    pub down_payment: f64,
    pub annual_interest_rate_pct: f64,
    pub loan_term_years: u32,
    pub monthly_rent_if_property: f64,
}

impl MajorPurchaseParams {
    pub fn loan_amount(&self) -> f64 {
        (self.total_cost - self.down_payment).max(0.0)
    }

    pub fn effective_monthly_rent(&self) -> f64 {
        match self.purchase_type {
            PurchaseType::Property => self.monthly_rent_if_property.max(0.0),
            PurchaseType::Vehicle | PurchaseType::Other => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scenarioType", rename_all = "kebab-case")]
pub enum ScenarioParameters {
    CareerChange(CareerChangeParams),
    InvestmentStrategy(InvestmentStrategyParams),
    MajorPurchase(MajorPurchaseParams),
}

impl ScenarioParameters {
    pub fn scenario_type(&self) -> ScenarioType {
        match self {
            ScenarioParameters::CareerChange(_) => ScenarioType::CareerChange,
            ScenarioParameters::InvestmentStrategy(_) => ScenarioType::InvestmentStrategy,
            ScenarioParameters::MajorPurchase(_) => ScenarioType::MajorPurchase,
        }
    }

    pub fn years_to_simulate(&self) -> u32 {
        match self {
            ScenarioParameters::CareerChange(p) => p.years_to_simulate,
            ScenarioParameters::InvestmentStrategy(p) => p.years_to_simulate,
            ScenarioParameters::MajorPurchase(p) => p.loan_term_years,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKind {
    Income,
    CumulativeSavings,
    PortfolioValue,
    NetWorth,
}

/// One simulated year. The optional fields are only populated by the
/// scenarios that track them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub current_path_value: f64,
    pub new_path_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invested_corpus: Option<f64>,
}

impl ProjectionPoint {
    pub fn new(year: u32, current_path_value: f64, new_path_value: f64) -> Self {
        Self {
            year,
            current_path_value,
            new_path_value,
            asset_value: None,
            loan_balance: None,
            invested_corpus: None,
        }
    }

    pub fn difference(&self) -> f64 {
        self.new_path_value - self.current_path_value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSeries {
    pub kind: SeriesKind,
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    pub fn last(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerChangeMetrics {
    pub income_difference: f64,
    pub savings_difference: f64,
    pub new_monthly_salary: f64,
    pub years_simulated: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStrategyMetrics {
    pub current_strategy_final_amount: f64,
    pub new_strategy_final_amount: f64,
    pub difference: f64,
    pub total_investment_made: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorPurchaseMetrics {
    pub loan_amount: f64,
    #[serde(rename = "monthlyEMI")]
    pub monthly_emi: f64,
    pub final_net_worth_without_purchase: f64,
    pub final_net_worth_with_purchase: f64,
    pub net_worth_difference: f64,
    pub years_simulated: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DifferenceMetrics {
    CareerChange(CareerChangeMetrics),
    InvestmentStrategy(InvestmentStrategyMetrics),
    MajorPurchase(MajorPurchaseMetrics),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub scenario_type: ScenarioType,
    pub series: Vec<ProjectionSeries>,
    pub difference_metrics: DifferenceMetrics,
}
