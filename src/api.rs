// 🌐 REST API - Read endpoints over the transaction CSV
//
// Every request re-reads the data source; the shared state is configuration only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::error::Error;
use crate::filters::{self, Expense, ExpenseQuery, TypeFilter};
use crate::loader::load_csv;
use crate::messenger::send_message;
use crate::summary::{summarize, Summary};
use crate::transaction::Transaction;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            config: Arc::new(config),
        }
    }

    fn load(&self) -> Result<Vec<Transaction>, ApiError> {
        Ok(load_csv(&self.config.data_path)?)
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Serialize)]
struct DataResponse<'a> {
    data: Vec<&'a Transaction>,
}

#[derive(Serialize)]
struct ExpensesResponse<'a> {
    expenses: Vec<Expense<'a>>,
}

#[derive(Serialize)]
struct RefundsResponse<'a> {
    refunds: Vec<&'a Transaction>,
}

#[derive(Serialize)]
struct IncomeResponse<'a> {
    income: Vec<&'a Transaction>,
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: Summary,
}

#[derive(Serialize)]
struct CategoriesResponse<'a> {
    categories: Vec<&'a str>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Default, Deserialize)]
struct SendRequest {
    #[serde(default)]
    message: Option<String>,
}

/// Library errors rendered as `{"error": ...}`: 400 for bad requests, 500 otherwise.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - All records
async fn get_all(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.load()?;
    Ok(Json(DataResponse {
        data: records.iter().collect(),
    })
    .into_response())
}

/// GET /expenses - Debits with their category
async fn get_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Response, ApiError> {
    let records = state.load()?;
    let expenses = query.apply(filters::expenses(&records, &state.config.rules))?;

    Ok(Json(ExpensesResponse { expenses }).into_response())
}

/// GET /refunds - Credits that are not payroll
async fn get_refunds(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.load()?;
    Ok(Json(RefundsResponse {
        refunds: filters::refunds(&records),
    })
    .into_response())
}

/// GET /income - Payroll credits
async fn get_income(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.load()?;
    Ok(Json(IncomeResponse {
        income: filters::income(&records),
    })
    .into_response())
}

/// GET /filters/:type - Filter transactions by type (all, debit, credit)
async fn filter_transactions(
    State(state): State<AppState>,
    Path(filter_type): Path<String>,
) -> Result<Response, ApiError> {
    let filter: TypeFilter = filter_type.parse()?;
    let records = state.load()?;

    Ok(Json(DataResponse {
        data: filters::by_type(&records, filter),
    })
    .into_response())
}

/// GET /summary - Totals by category and month
async fn get_summary(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.load()?;
    let summary = summarize(&records, &state.config.rules);

    Ok(Json(SummaryResponse { summary }).into_response())
}

/// GET /categories - Labels in evaluation order
async fn get_categories(State(state): State<AppState>) -> impl IntoResponse {
    Json(CategoriesResponse {
        categories: state.config.rules.labels(),
    })
    .into_response()
}

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// POST /send-message - Append a message to the mock sender's log
async fn post_message(
    State(state): State<AppState>,
    payload: Option<Json<SendRequest>>,
) -> Result<Response, ApiError> {
    let message = payload
        .and_then(|Json(request)| request.message)
        .unwrap_or_default();

    let status = send_message(
        &state.config.messenger,
        state.config.secrets.as_ref(),
        &message,
    )?;

    Ok(Json(StatusResponse { status }).into_response())
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(config: AppConfig) -> Router {
    let state = AppState::new(config);

    Router::new()
        .route("/", get(get_all))
        .route("/expenses", get(get_expenses))
        .route("/refunds", get(get_refunds))
        .route("/income", get(get_income))
        .route("/filters/:type", get(filter_transactions))
        .route("/summary", get(get_summary))
        .route("/categories", get(get_categories))
        .route("/health", get(health_check))
        .route("/send-message", post(post_message))
        // Path the dashboard frontend posts to
        .route("/send-whatsapp", post(post_message))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
