//! Preferences Routes
//!
//! - GET /api/v1/preferences - Current preferences
//! - PATCH /api/v1/preferences - Shallow partial update
//! - PUT /api/v1/preferences/genres - Replace favorite genres
//! - PUT /api/v1/preferences/budget - Replace monthly budget
//! - GET /api/v1/preferences/onboarded - Onboarding status
//! - POST /api/v1/preferences/onboarding - Finish onboarding

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{AmountRequest, GenresRequest, OnboardedResponse, OnboardingRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::store::{validate, PreferencesPatch, UserPreferences};

/// GET /api/v1/preferences
pub async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<UserPreferences> {
    Json(state.store.preferences().await)
}

/// PATCH /api/v1/preferences
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<PreferencesPatch>,
) -> ApiResult<Json<UserPreferences>> {
    if let Some(amount) = patch.monthly_budget {
        validate::budget_amount(amount)?;
    }
    Ok(Json(state.store.update_preferences(patch).await))
}

/// PUT /api/v1/preferences/genres
pub async fn update_genres(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenresRequest>,
) -> Json<UserPreferences> {
    Json(state.store.update_genres(req.genres).await)
}

/// PUT /api/v1/preferences/budget
pub async fn update_monthly_budget(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<Json<UserPreferences>> {
    let amount = validate::budget_amount(req.amount)?;
    Ok(Json(state.store.update_monthly_budget(amount).await))
}

/// GET /api/v1/preferences/onboarded
pub async fn is_onboarded(State(state): State<Arc<AppState>>) -> Json<OnboardedResponse> {
    Json(OnboardedResponse {
        is_onboarded: state.store.is_onboarded().await,
    })
}

/// POST /api/v1/preferences/onboarding
///
/// Stores the chosen genres (at least one) and, when given, the budget pick
/// with its derived price ceiling, then marks onboarding complete.
pub async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OnboardingRequest>,
) -> ApiResult<Json<UserPreferences>> {
    validate::onboarding_genres(req.favorite_genres.as_slice())?;

    let patch = match req.monthly_budget {
        Some(amount) => PreferencesPatch::budget_selection(validate::budget_amount(amount)?),
        None => PreferencesPatch::new(),
    };
    let genres = req
        .favorite_genres
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty());

    state.store.update_preferences(patch.genres(genres)).await;
    Ok(Json(state.store.complete_onboarding().await))
}
