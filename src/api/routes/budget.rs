//! Budget Routes
//!
//! Months are addressed as `YYYY-MM`.
//!
//! - GET /api/v1/budgets - All months, oldest first
//! - GET /api/v1/budgets/current - Current month, created on first access
//! - PUT /api/v1/budgets/:month - Set the budget amount
//! - POST /api/v1/budgets/:month/purchases - Record a purchase
//! - GET /api/v1/budgets/:month/remaining - Remaining amount
//! - GET /api/v1/budgets/:month/summary - Spending summary
//! - GET /api/v1/budgets/:month/suggestions - Books the remainder can buy

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AmountRequest, BookListResponse, RemainingResponse, SuggestionsQuery};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::{
    validate, BudgetRecord, BudgetSummary, MonthKey, PurchaseDraft, DEFAULT_SUGGESTION_LIMIT,
};

fn parse_month(raw: &str) -> ApiResult<MonthKey> {
    Ok(raw.parse::<MonthKey>()?)
}

/// GET /api/v1/budgets
pub async fn list_budgets(State(state): State<Arc<AppState>>) -> Json<Vec<BudgetRecord>> {
    Json(state.store.budgets().await)
}

/// GET /api/v1/budgets/current
pub async fn current_budget(State(state): State<Arc<AppState>>) -> Json<BudgetRecord> {
    Json(state.store.current_month_budget().await)
}

/// PUT /api/v1/budgets/:month
///
/// Creates the month if needed; recorded purchases are kept.
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<Json<BudgetRecord>> {
    let month = parse_month(&month)?;
    let amount = validate::budget_amount(req.amount)?;
    Ok(Json(state.store.update_budget(month, amount).await))
}

/// POST /api/v1/budgets/:month/purchases
pub async fn add_purchase(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
    Json(draft): Json<PurchaseDraft>,
) -> ApiResult<(StatusCode, Json<BudgetRecord>)> {
    let month = parse_month(&month)?;
    validate::purchase_amount(draft.amount)?;
    if draft.book_title.trim().is_empty() {
        return Err(ApiError::Validation("bookTitle must not be empty".to_string()));
    }

    let record = state.store.add_purchase(month, draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/budgets/:month/remaining
pub async fn remaining_budget(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
) -> ApiResult<Json<RemainingResponse>> {
    let month = parse_month(&month)?;
    let remaining = state.store.remaining_budget(month).await;
    Ok(Json(RemainingResponse { month, remaining }))
}

/// GET /api/v1/budgets/:month/summary
pub async fn budget_summary(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
) -> ApiResult<Json<BudgetSummary>> {
    let month = parse_month(&month)?;
    Ok(Json(state.store.budget_summary(month).await?))
}

/// GET /api/v1/budgets/:month/suggestions?limit=N
pub async fn budget_suggestions(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
    Query(params): Query<SuggestionsQuery>,
) -> ApiResult<Json<BookListResponse>> {
    let month = parse_month(&month)?;
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    Ok(Json(state.store.budget_suggestions(month, limit).await.into()))
}
