use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::advice::AdviceService;
use crate::core::{
    ChartData, ExpenseCategory, PlanFigures, PlanInput, PlanResult, RiskProfile, Sheet,
    generate_plan,
};
use crate::export::{SheetExporter, default_file_name};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Longest accepted goal timeline: 100 years.
pub const MAX_TIMELINE_MONTHS: u32 = 1_200;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRiskProfile {
    #[serde(alias = "Conservative")]
    Conservative,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "Aggressive")]
    Aggressive,
}

impl From<ApiRiskProfile> for RiskProfile {
    fn from(value: ApiRiskProfile) -> Self {
        match value {
            ApiRiskProfile::Conservative => RiskProfile::Conservative,
            ApiRiskProfile::Moderate => RiskProfile::Moderate,
            ApiRiskProfile::Aggressive => RiskProfile::Aggressive,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanPayload {
    net_monthly_income: Option<f64>,
    monthly_tax_deduction: Option<f64>,
    monthly_side_income: Option<f64>,

    rent: Option<f64>,
    groceries: Option<f64>,
    utilities: Option<f64>,
    transport: Option<f64>,
    emi: Option<f64>,
    insurance: Option<f64>,
    subscriptions: Option<f64>,
    education: Option<f64>,
    health: Option<f64>,
    entertainment: Option<f64>,
    shopping: Option<f64>,
    #[serde(alias = "other")]
    others: Option<f64>,

    current_investments: Option<f64>,
    current_emergency_fund: Option<f64>,
    emergency_months_target: Option<u32>,

    target_passive_monthly: Option<f64>,
    target_timeline_months: Option<u32>,
    #[serde(alias = "assumedYieldPct")]
    assumed_yield_income_assets: Option<f64>,
    #[serde(alias = "accumulationReturnPct")]
    assumed_accumulation_return: Option<f64>,
    risk_profile: Option<ApiRiskProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdviceRequest {
    plan: PlanPayload,
    question: String,
}

#[derive(Debug, Serialize)]
struct AdviceResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanSummary {
    monthly_expenses: f64,
    net_income_after_tax: f64,
    monthly_surplus: f64,
    required_monthly_sip: f64,
    emergency_shortfall: f64,
    corpus_needed: f64,
}

impl From<&PlanFigures> for PlanSummary {
    fn from(figures: &PlanFigures) -> Self {
        Self {
            monthly_expenses: figures.monthly_expenses,
            net_income_after_tax: figures.net_income_after_tax,
            monthly_surplus: figures.monthly_surplus,
            required_monthly_sip: figures.required_monthly_sip,
            emergency_shortfall: figures.emergency_shortfall,
            corpus_needed: figures.corpus_needed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse<'a> {
    sheets: &'a [Sheet],
    chart_data: &'a ChartData,
    summary: PlanSummary,
}

fn build_plan_response(plan: &PlanResult) -> PlanResponse<'_> {
    PlanResponse {
        sheets: &plan.sheets,
        chart_data: &plan.chart_data,
        summary: PlanSummary::from(&plan.figures),
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub advice: Arc<AdviceService>,
    pub exporter: Arc<dyn SheetExporter>,
}

impl AppState {
    pub fn new(advice: AdviceService, exporter: impl SheetExporter + 'static) -> Self {
        Self {
            advice: Arc::new(advice),
            exporter: Arc::new(exporter),
        }
    }
}

fn validate_input(input: &PlanInput) -> Result<(), String> {
    let amounts = [
        ("netMonthlyIncome", input.net_monthly_income),
        ("monthlyTaxDeduction", input.monthly_tax_deduction),
        ("monthlySideIncome", input.monthly_side_income),
        ("currentInvestments", input.current_investments),
        ("currentEmergencyFund", input.current_emergency_fund),
        ("targetPassiveMonthly", input.target_passive_monthly),
        ("assumedYieldIncomeAssets", input.assumed_yield_pct),
        ("assumedAccumulationReturn", input.accumulation_return_pct),
    ];
    for (name, value) in amounts {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite number >= 0"));
        }
    }

    for (category, value) in input.expenses.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be a finite number >= 0", expense_key(category)));
        }
    }

    if input.emergency_months_target == 0 {
        return Err("emergencyMonthsTarget must be >= 1".to_string());
    }

    if !(1..=MAX_TIMELINE_MONTHS).contains(&input.target_timeline_months) {
        return Err(format!(
            "targetTimelineMonths must be between 1 and {MAX_TIMELINE_MONTHS}"
        ));
    }

    Ok(())
}

fn expense_key(category: ExpenseCategory) -> &'static str {
    match category {
        ExpenseCategory::Rent => "rent",
        ExpenseCategory::Groceries => "groceries",
        ExpenseCategory::Utilities => "utilities",
        ExpenseCategory::Transport => "transport",
        ExpenseCategory::Emi => "emi",
        ExpenseCategory::Insurance => "insurance",
        ExpenseCategory::Subscriptions => "subscriptions",
        ExpenseCategory::Education => "education",
        ExpenseCategory::Health => "health",
        ExpenseCategory::Entertainment => "entertainment",
        ExpenseCategory::Shopping => "shopping",
        ExpenseCategory::Other => "others",
    }
}

pub fn plan_input_from_json(json: &str) -> Result<PlanInput, String> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| format!("Invalid plan JSON payload: {e}"))?;
    plan_input_from_payload(payload)
}

pub fn plan_input_from_payload(payload: PlanPayload) -> Result<PlanInput, String> {
    let mut input = PlanInput::default();

    if let Some(v) = payload.net_monthly_income {
        input.net_monthly_income = v;
    }
    if let Some(v) = payload.monthly_tax_deduction {
        input.monthly_tax_deduction = v;
    }
    if let Some(v) = payload.monthly_side_income {
        input.monthly_side_income = v;
    }

    let expenses = [
        (ExpenseCategory::Rent, payload.rent),
        (ExpenseCategory::Groceries, payload.groceries),
        (ExpenseCategory::Utilities, payload.utilities),
        (ExpenseCategory::Transport, payload.transport),
        (ExpenseCategory::Emi, payload.emi),
        (ExpenseCategory::Insurance, payload.insurance),
        (ExpenseCategory::Subscriptions, payload.subscriptions),
        (ExpenseCategory::Education, payload.education),
        (ExpenseCategory::Health, payload.health),
        (ExpenseCategory::Entertainment, payload.entertainment),
        (ExpenseCategory::Shopping, payload.shopping),
        (ExpenseCategory::Other, payload.others),
    ];
    for (category, value) in expenses {
        if let Some(v) = value {
            *input.expenses.amount_mut(category) = v;
        }
    }

    if let Some(v) = payload.current_investments {
        input.current_investments = v;
    }
    if let Some(v) = payload.current_emergency_fund {
        input.current_emergency_fund = v;
    }
    if let Some(v) = payload.emergency_months_target {
        input.emergency_months_target = v;
    }

    if let Some(v) = payload.target_passive_monthly {
        input.target_passive_monthly = v;
    }
    if let Some(v) = payload.target_timeline_months {
        input.target_timeline_months = v;
    }
    if let Some(v) = payload.assumed_yield_income_assets {
        input.assumed_yield_pct = v;
    }
    if let Some(v) = payload.assumed_accumulation_return {
        input.accumulation_return_pct = v;
    }
    if let Some(v) = payload.risk_profile {
        input.risk_profile = v.into();
    }

    validate_input(&input)?;
    Ok(input)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route("/api/export", post(export_handler))
        .route("/api/advice", post(advice_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("finance planner listening on http://{addr}");
    tracing::info!("local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    let input = match plan_input_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    tracing::debug!(
        timeline_months = input.target_timeline_months,
        risk_profile = input.risk_profile.as_str(),
        "computing plan"
    );

    let plan = generate_plan(&input);
    json_response(StatusCode::OK, build_plan_response(&plan))
}

async fn export_handler(
    State(state): State<AppState>,
    Json(payload): Json<PlanPayload>,
) -> Response {
    let input = match plan_input_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let plan = generate_plan(&input);

    let exporter = Arc::clone(&state.exporter);
    let content_type = exporter.content_type();
    let exported = tokio::task::spawn_blocking(move || exporter.export(&plan.sheets)).await;
    let bytes = match exported {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(err)) => {
            tracing::error!(error = %err, "export failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
        Err(err) => {
            tracing::error!(error = %err, "export task failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Export failed");
        }
    };

    let file_name = default_file_name(chrono::Local::now().date_naive());
    with_cache_control((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

async fn advice_handler(
    State(state): State<AppState>,
    Json(request): Json<AdviceRequest>,
) -> Response {
    let question = request.question.trim();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "question must not be empty");
    }
    let input = match plan_input_from_payload(request.plan) {
        Ok(input) => input,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let plan = generate_plan(&input);
    let answer = state.advice.ask(&plan, question).await;
    json_response(StatusCode::OK, AdviceResponse { answer })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
