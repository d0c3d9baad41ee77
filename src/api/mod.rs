mod error;
mod format;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    CareerChangeParams, DifferenceMetrics, FinancialRecords, FinancialSnapshot,
    InvestmentStrategyParams, MajorPurchaseParams, ProjectionSeries, PurchaseType,
    ScenarioParameters, ScenarioType, aggregate_snapshot, run_scenario,
};

pub use error::ApiError;
pub use format::{NarrativeInput, build_narrative_input, format_inr};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ApiScenarioType {
    #[serde(alias = "careerChange", alias = "career_change", alias = "career")]
    CareerChange,
    #[serde(
        alias = "investmentStrategy",
        alias = "investment_strategy",
        alias = "investment"
    )]
    InvestmentStrategy,
    #[serde(alias = "majorPurchase", alias = "major_purchase", alias = "purchase")]
    MajorPurchase,
}

impl From<ApiScenarioType> for ScenarioType {
    fn from(value: ApiScenarioType) -> Self {
        match value {
            ApiScenarioType::CareerChange => ScenarioType::CareerChange,
            ApiScenarioType::InvestmentStrategy => ScenarioType::InvestmentStrategy,
            ApiScenarioType::MajorPurchase => ScenarioType::MajorPurchase,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ApiPurchaseType {
    #[serde(alias = "Property", alias = "house", alias = "home")]
    Property,
    #[serde(alias = "Vehicle", alias = "car")]
    Vehicle,
    #[serde(alias = "Other")]
    Other,
}

impl From<ApiPurchaseType> for PurchaseType {
    fn from(value: ApiPurchaseType) -> Self {
        match value {
            ApiPurchaseType::Property => PurchaseType::Property,
            ApiPurchaseType::Vehicle => PurchaseType::Vehicle,
            ApiPurchaseType::Other => PurchaseType::Other,
        }
    }
}

/// Request body for `/api/simulate` and the flags of the `simulate`
/// subcommand. Every field is optional; omitted ones take the API defaults.
#[derive(Debug, Default, Deserialize, Args)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatePayload {
    #[arg(long, value_enum)]
    pub scenario_type: Option<ApiScenarioType>,

    #[arg(long)]
    pub monthly_income: Option<f64>,
    #[arg(long)]
    pub monthly_expenses: Option<f64>,
    #[arg(long)]
    pub total_initial_investment: Option<f64>,
    #[arg(long)]
    pub total_debt: Option<f64>,
    #[serde(alias = "assumedInvestmentReturnRate", alias = "assumedInvestmentReturnRatePct")]
    #[arg(long, help = "Assumed yearly investment return in percent, e.g. 8")]
    pub assumed_return_rate: Option<f64>,
    #[arg(skip)]
    pub records: Option<FinancialRecords>,

    #[arg(long)]
    pub current_monthly_salary: Option<f64>,
    #[arg(long)]
    pub new_monthly_salary: Option<f64>,
    #[arg(long)]
    pub years_to_simulate: Option<u32>,
    #[serde(alias = "annualGrowthRatePct")]
    #[arg(long, help = "Yearly salary growth in percent, applied from year 2")]
    pub annual_growth_rate: Option<f64>,

    #[arg(long)]
    pub monthly_contribution: Option<f64>,
    #[serde(alias = "currentAnnualRatePct", alias = "currentAnnualRate")]
    #[arg(long, help = "Current strategy yearly return in percent")]
    pub current_rate: Option<f64>,
    #[serde(alias = "newAnnualRatePct", alias = "newAnnualRate")]
    #[arg(long, help = "New strategy yearly return in percent")]
    pub new_rate: Option<f64>,

    #[arg(long, value_enum)]
    pub purchase_type: Option<ApiPurchaseType>,
    #[arg(long)]
    pub total_cost: Option<f64>,
    #[arg(long)]
    pub down_payment: Option<f64>,
    #[serde(alias = "annualInterestRatePct", alias = "annualInterestRate")]
    #[arg(long, help = "Loan interest rate in percent per year")]
    pub interest_rate: Option<f64>,
    #[arg(long)]
    pub loan_term_years: Option<u32>,
    #[serde(alias = "monthlyRentIfProperty")]
    #[arg(long, help = "Monthly rent, only used for property purchases")]
    pub monthly_rent: Option<f64>,

    #[arg(long)]
    pub include_narrative_input: Option<bool>,
}

#[derive(Debug, Clone)]
struct ScenarioSettings {
    scenario_type: Option<ScenarioType>,

    monthly_income: f64,
    monthly_expenses: f64,
    total_initial_investment: f64,
    total_debt: f64,
    assumed_return_rate: f64,
    records: Option<FinancialRecords>,

    current_monthly_salary: Option<f64>,
    new_monthly_salary: f64,
    years_to_simulate: u32,
    annual_growth_rate: f64,

    monthly_contribution: f64,
    current_rate: f64,
    new_rate: f64,

    purchase_type: PurchaseType,
    total_cost: f64,
    down_payment: f64,
    interest_rate: f64,
    loan_term_years: u32,
    monthly_rent: f64,

    include_narrative_input: bool,
}

#[derive(Debug)]
pub struct ScenarioRequest {
    pub parameters: ScenarioParameters,
    pub snapshot: FinancialSnapshot,
    pub include_narrative_input: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub scenario_type: ScenarioType,
    pub snapshot: FinancialSnapshot,
    pub parameters: ScenarioParameters,
    pub series: Vec<ProjectionSeries>,
    pub difference_metrics: DifferenceMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_input: Option<NarrativeInput>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn default_settings() -> ScenarioSettings {
    ScenarioSettings {
        scenario_type: None,
        monthly_income: 100_000.0,
        monthly_expenses: 60_000.0,
        total_initial_investment: 500_000.0,
        total_debt: 0.0,
        assumed_return_rate: 8.0,
        records: None,
        current_monthly_salary: None,
        new_monthly_salary: 120_000.0,
        years_to_simulate: 10,
        annual_growth_rate: 5.0,
        monthly_contribution: 10_000.0,
        current_rate: 6.0,
        new_rate: 12.0,
        purchase_type: PurchaseType::Property,
        total_cost: 5_000_000.0,
        down_payment: 1_000_000.0,
        interest_rate: 8.5,
        loan_term_years: 20,
        monthly_rent: 0.0,
        include_narrative_input: true,
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ApiError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ApiError::invalid(field, "must be a finite number"))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ApiError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ApiError::invalid(field, "must be >= 0"));
    }
    Ok(())
}

fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ApiError> {
    require_finite(field, value)?;
    if !(min..=max).contains(&value) {
        return Err(ApiError::invalid(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

fn require_years(field: &'static str, value: u32, max: u32) -> Result<(), ApiError> {
    if !(1..=max).contains(&value) {
        return Err(ApiError::invalid(field, format!("must be between 1 and {max}")));
    }
    Ok(())
}

fn validate_records(records: &FinancialRecords) -> Result<(), ApiError> {
    for income in &records.incomes {
        require_non_negative("incomes[].amount", income.amount)?;
    }
    for expense in &records.expenses {
        require_non_negative("expenses[].amount", expense.amount)?;
    }
    for investment in &records.investments {
        require_non_negative("investments[].currentValue", investment.current_value)?;
        if let Some(initial) = investment.initial_investment {
            require_non_negative("investments[].initialInvestment", initial)?;
        }
    }
    for loan in &records.loans {
        require_non_negative("loans[].outstandingBalance", loan.outstanding_balance)?;
        require_non_negative("loans[].monthlyPayment", loan.monthly_payment)?;
    }
    Ok(())
}

fn build_snapshot(settings: &ScenarioSettings) -> Result<FinancialSnapshot, ApiError> {
    require_range("assumedReturnRate", settings.assumed_return_rate, 0.0, 100.0)?;

    if let Some(records) = &settings.records {
        validate_records(records)?;
        return Ok(aggregate_snapshot(records, settings.assumed_return_rate));
    }

    require_non_negative("monthlyIncome", settings.monthly_income)?;
    require_non_negative("monthlyExpenses", settings.monthly_expenses)?;
    require_non_negative("totalInitialInvestment", settings.total_initial_investment)?;
    require_non_negative("totalDebt", settings.total_debt)?;

    Ok(FinancialSnapshot::new(
        settings.monthly_income,
        settings.monthly_expenses,
        settings.total_initial_investment,
        settings.total_debt,
        settings.assumed_return_rate,
    ))
}

fn build_parameters(
    settings: &ScenarioSettings,
    snapshot: &FinancialSnapshot,
) -> Result<ScenarioParameters, ApiError> {
    let Some(scenario_type) = settings.scenario_type else {
        return Err(ApiError::invalid("scenarioType", "is required"));
    };

    match scenario_type {
        ScenarioType::CareerChange => {
            let current_monthly_salary = settings
                .current_monthly_salary
                .unwrap_or(snapshot.monthly_income);
            require_non_negative("currentMonthlySalary", current_monthly_salary)?;
            require_non_negative("newMonthlySalary", settings.new_monthly_salary)?;
            require_years("yearsToSimulate", settings.years_to_simulate, 30)?;
            require_range("annualGrowthRate", settings.annual_growth_rate, 0.0, 20.0)?;

            Ok(ScenarioParameters::CareerChange(CareerChangeParams {
                current_monthly_salary,
                new_monthly_salary: settings.new_monthly_salary,
                years_to_simulate: settings.years_to_simulate,
                annual_growth_rate_pct: settings.annual_growth_rate,
            }))
        }
        ScenarioType::InvestmentStrategy => {
            require_finite("monthlyContribution", settings.monthly_contribution)?;
            if settings.monthly_contribution <= 0.0 {
                return Err(ApiError::invalid("monthlyContribution", "must be > 0"));
            }
            require_range("currentRate", settings.current_rate, 0.0, 100.0)?;
            require_range("newRate", settings.new_rate, 0.0, 100.0)?;
            require_years("yearsToSimulate", settings.years_to_simulate, 40)?;

            Ok(ScenarioParameters::InvestmentStrategy(
                InvestmentStrategyParams {
                    monthly_contribution: settings.monthly_contribution,
                    current_annual_rate_pct: settings.current_rate,
                    new_annual_rate_pct: settings.new_rate,
                    years_to_simulate: settings.years_to_simulate,
                },
            ))
        }
        ScenarioType::MajorPurchase => {
            require_finite("totalCost", settings.total_cost)?;
            if settings.total_cost <= 0.0 {
                return Err(ApiError::invalid("totalCost", "must be > 0"));
            }
            require_non_negative("downPayment", settings.down_payment)?;
            if settings.down_payment > settings.total_cost {
                return Err(ApiError::invalid("downPayment", "must be <= totalCost"));
            }
            require_range("interestRate", settings.interest_rate, 0.0, 30.0)?;
            require_years("loanTermYears", settings.loan_term_years, 40)?;
            require_non_negative("monthlyRent", settings.monthly_rent)?;

            Ok(ScenarioParameters::MajorPurchase(MajorPurchaseParams {
                purchase_type: settings.purchase_type,
                total_cost: settings.total_cost,
                down_payment: settings.down_payment,
                annual_interest_rate_pct: settings.interest_rate,
                loan_term_years: settings.loan_term_years,
                monthly_rent_if_property: settings.monthly_rent,
            }))
        }
    }
}

fn build_request(settings: ScenarioSettings) -> Result<ScenarioRequest, ApiError> {
    let snapshot = build_snapshot(&settings)?;
    let parameters = build_parameters(&settings, &snapshot)?;
    Ok(ScenarioRequest {
        parameters,
        snapshot,
        include_narrative_input: settings.include_narrative_input,
    })
}

pub fn api_request_from_json(json: &str) -> Result<ScenarioRequest, ApiError> {
    let payload = serde_json::from_str::<SimulatePayload>(json)?;
    api_request_from_payload(payload)
}

pub fn api_request_from_payload(payload: SimulatePayload) -> Result<ScenarioRequest, ApiError> {
    let mut settings = default_settings();

    if let Some(v) = payload.scenario_type {
        settings.scenario_type = Some(v.into());
    }

    if let Some(v) = payload.monthly_income {
        settings.monthly_income = v;
    }
    if let Some(v) = payload.monthly_expenses {
        settings.monthly_expenses = v;
    }
    if let Some(v) = payload.total_initial_investment {
        settings.total_initial_investment = v;
    }
    if let Some(v) = payload.total_debt {
        settings.total_debt = v;
    }
    if let Some(v) = payload.assumed_return_rate {
        settings.assumed_return_rate = v;
    }
    if payload.records.is_some() {
        settings.records = payload.records;
    }

    if let Some(v) = payload.current_monthly_salary {
        settings.current_monthly_salary = Some(v);
    }
    if let Some(v) = payload.new_monthly_salary {
        settings.new_monthly_salary = v;
    }
    if let Some(v) = payload.years_to_simulate {
        settings.years_to_simulate = v;
    }
    if let Some(v) = payload.annual_growth_rate {
        settings.annual_growth_rate = v;
    }

    if let Some(v) = payload.monthly_contribution {
        settings.monthly_contribution = v;
    }
    if let Some(v) = payload.current_rate {
        settings.current_rate = v;
    }
    if let Some(v) = payload.new_rate {
        settings.new_rate = v;
    }

    if let Some(v) = payload.purchase_type {
        settings.purchase_type = v.into();
    }
    if let Some(v) = payload.total_cost {
        settings.total_cost = v;
    }
    if let Some(v) = payload.down_payment {
        settings.down_payment = v;
    }
    if let Some(v) = payload.interest_rate {
        settings.interest_rate = v;
    }
    if let Some(v) = payload.loan_term_years {
        settings.loan_term_years = v;
    }
    if let Some(v) = payload.monthly_rent {
        settings.monthly_rent = v;
    }

    if let Some(v) = payload.include_narrative_input {
        settings.include_narrative_input = v;
    }

    build_request(settings)
}

pub fn run_request(request: ScenarioRequest) -> SimulateResponse {
    let outcome = run_scenario(&request.parameters, &request.snapshot);
    let narrative_input = request
        .include_narrative_input
        .then(|| build_narrative_input(&request.parameters, &request.snapshot, &outcome));

    SimulateResponse {
        scenario_type: outcome.scenario_type,
        snapshot: request.snapshot,
        parameters: request.parameters,
        series: outcome.series,
        difference_metrics: outcome.difference_metrics,
        narrative_input,
    }
}

pub fn simulate(payload: SimulatePayload) -> Result<SimulateResponse, ApiError> {
    let request = api_request_from_payload(payload)?;
    Ok(run_request(request))
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/health", get(health_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("whatif HTTP API listening on http://{addr}");
    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        ErrorResponse {
            error: "Not found".to_string(),
        },
    )
}

async fn simulate_get_handler(query: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => simulate_handler_impl(payload),
        Err(rejection) => ApiError::InvalidPayload(rejection.body_text()).into_response(),
    }
}

async fn simulate_post_handler(body: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => simulate_handler_impl(payload),
        Err(rejection) => ApiError::InvalidPayload(rejection.body_text()).into_response(),
    }
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    match simulate(payload) {
        Ok(response) => {
            info!(
                scenario = response.scenario_type.as_str(),
                rows = response.series.first().map_or(0, |s| s.points.len()),
                "simulation complete"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => err.into_response(),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}
