use axum::{
    Router,
    extract::{Json, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::{
    Debt, MonthKey, OneTimeFunding, PayoffPlan, PlanError, PlanSummary, PortfolioSummary,
    RecurringFunding, SimulationOptions, Strategy, StrategyComparison, StrategySettings,
    compare_strategies, simulate_with, validate_inputs,
};
use crate::store::{MemoryStore, RecordStore, Snapshot};

const MAX_REQUEST_MONTHS: u32 = 1200;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStrategy {
    Avalanche,
    Snowball,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Avalanche => Strategy::Avalanche,
            CliStrategy::Snowball => Strategy::Snowball,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiStrategy {
    #[serde(
        alias = "Avalanche",
        alias = "highestInterest",
        alias = "highest-interest",
        alias = "highest_interest"
    )]
    Avalanche,
    #[serde(
        alias = "Snowball",
        alias = "lowestBalance",
        alias = "lowest-balance",
        alias = "lowest_balance"
    )]
    Snowball,
}

impl From<ApiStrategy> for Strategy {
    fn from(value: ApiStrategy) -> Self {
        match value {
            ApiStrategy::Avalanche => Strategy::Avalanche,
            ApiStrategy::Snowball => Strategy::Snowball,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    debts: Vec<Debt>,
    strategy: Option<ApiStrategy>,
    recurring_funding: Option<RecurringFunding>,
    #[serde(alias = "monthlyFunding")]
    monthly_budget: Option<Decimal>,
    one_time_fundings: Vec<OneTimeFunding>,
    start_month: Option<MonthKey>,
    max_months: Option<u32>,
}

#[derive(Debug)]
struct ApiRequest {
    debts: Vec<Debt>,
    settings: StrategySettings,
    options: SimulationOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    portfolio: PortfolioSummary,
    summary: PlanSummary,
    plan: PayoffPlan,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid input: {0}")]
    Invalid(#[from] PlanError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(status = %status, error = %self, "request rejected");
        error_response(status, &self.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "payoff",
    about = "Debt payoff planner: month-by-month avalanche or snowball schedules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, help = "Port to listen on; overrides PAYOFF_PORT")]
        port: Option<u16>,
    },
    /// Compute a plan from a JSON file and print it
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[arg(long, help = "JSON file with debts, recurringFunding and oneTimeFundings")]
    pub input: PathBuf,
    #[arg(long, value_enum, help = "Overrides the strategy in the input file")]
    pub strategy: Option<CliStrategy>,
    #[arg(long, help = "First simulated month as YYYY-MM; defaults to the current month")]
    pub start_month: Option<MonthKey>,
    #[arg(long, help = "Iteration bound in months")]
    pub max_months: Option<u32>,
    #[arg(long, default_value_t = false, help = "Run both strategies side by side")]
    pub compare: bool,
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub config: Config,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route("/api/compare", post(compare_post_handler))
        .route("/api/records", put(records_put_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: Config) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        store: Arc::new(MemoryStore::default()),
        config,
    };
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "payoff HTTP API listening");
    axum::serve(listener, router(state)).await
}

pub fn run_plan_command(args: PlanArgs, config: &Config) -> Result<String, ApiError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let mut payload = serde_json::from_str::<PlanPayload>(&raw).map_err(|e| {
        ApiError::BadRequest(format!("invalid JSON in {}: {e}", args.input.display()))
    })?;
    if let Some(start) = args.start_month {
        payload.start_month = Some(start);
    }
    if let Some(max_months) = args.max_months {
        payload.max_months = Some(max_months);
    }

    let mut request = api_request_from_payload(payload, config)?;
    if let Some(strategy) = args.strategy {
        request.settings.strategy = strategy.into();
    }
    let json = if args.compare {
        to_json(&compare_request(&request)?, args.pretty)
    } else {
        to_json(&plan_request(&request)?, args.pretty)
    };
    json.map_err(|e| ApiError::Internal(format!("failed to serialize output: {e}")))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<PlanPayload>,
) -> Response {
    respond(plan_handler_impl(&state, payload).await)
}

async fn plan_get_handler(State(state): State<AppState>) -> Response {
    respond(plan_from_store(&state).await)
}

async fn compare_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<PlanPayload>,
) -> Response {
    let result = match api_request_from_payload(payload, &state.config) {
        Ok(request) => run_blocking(move || compare_request(&request)).await,
        Err(e) => Err(e),
    };
    respond(result)
}

async fn records_put_handler(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> Response {
    match store_records(&state, snapshot) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn plan_handler_impl(
    state: &AppState,
    payload: PlanPayload,
) -> Result<PlanResponse, ApiError> {
    let request = api_request_from_payload(payload, &state.config)?;
    run_blocking(move || plan_request(&request)).await
}

async fn plan_from_store(state: &AppState) -> Result<PlanResponse, ApiError> {
    let request = request_from_store(state.store.as_ref(), &state.config)?;
    run_blocking(move || plan_request(&request)).await
}

fn request_from_store(store: &dyn RecordStore, config: &Config) -> Result<ApiRequest, ApiError> {
    let snapshot = store
        .snapshot()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(ApiRequest {
        debts: snapshot.debts,
        settings: snapshot.settings,
        options: config.simulation_options(),
    })
}

fn store_records(state: &AppState, snapshot: Snapshot) -> Result<(), ApiError> {
    validate_inputs(&snapshot.debts, &snapshot.settings)?;
    state
        .store
        .replace(snapshot)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

fn plan_request(request: &ApiRequest) -> Result<PlanResponse, ApiError> {
    let plan = simulate_with(&request.debts, &request.settings, request.options)?;
    Ok(PlanResponse {
        portfolio: PortfolioSummary::from_debts(&request.debts),
        summary: PlanSummary::from_plan(&plan),
        plan,
    })
}

fn compare_request(request: &ApiRequest) -> Result<StrategyComparison, ApiError> {
    Ok(compare_strategies(
        &request.debts,
        &request.settings,
        request.options,
    )?)
}

async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::Internal(format!("simulation task failed: {e}")))?
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => e.into_response(),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str, config: &Config) -> Result<ApiRequest, ApiError> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| ApiError::BadRequest(format!("Invalid API JSON payload: {e}")))?;
    api_request_from_payload(payload, config)
}

fn api_request_from_payload(
    payload: PlanPayload,
    config: &Config,
) -> Result<ApiRequest, ApiError> {
    let recurring_funding = match (payload.recurring_funding, payload.monthly_budget) {
        (Some(funding), _) => funding,
        (None, Some(amount)) => RecurringFunding {
            amount,
            day_of_month: None,
        },
        (None, None) => {
            return Err(ApiError::BadRequest(
                "recurringFunding or monthlyBudget is required".to_string(),
            ));
        }
    };

    let mut options = config.simulation_options();
    if let Some(start) = payload.start_month {
        options.start = start;
    }
    if let Some(max_months) = payload.max_months {
        if !(1..=MAX_REQUEST_MONTHS).contains(&max_months) {
            return Err(ApiError::BadRequest(format!(
                "maxMonths must be between 1 and {MAX_REQUEST_MONTHS}"
            )));
        }
        options.max_months = max_months;
    }

    Ok(ApiRequest {
        debts: payload.debts,
        settings: StrategySettings {
            strategy: payload.strategy.map(Strategy::from).unwrap_or_default(),
            recurring_funding,
            one_time_fundings: payload.one_time_fundings,
        },
        options,
    })
}
