//! Wishlist Routes
//!
//! - GET /api/v1/wishlist - Items joined with their books
//! - POST /api/v1/wishlist - Add a book
//! - GET /api/v1/wishlist/:id - Get an item
//! - PATCH /api/v1/wishlist/:id - Update target price, notification flag or priority
//! - DELETE /api/v1/wishlist/:id - Remove an item
//! - POST /api/v1/wishlist/toggle - Add or remove a book
//! - GET /api/v1/wishlist/contains/:book_id - Membership check
//! - GET /api/v1/wishlist/alerts - Items at or below their target price

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ContainsResponse, ToggleRequest, WishlistResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::store::{
    validate, PriceAlert, ToggleOutcome, WishlistDraft, WishlistItem, WishlistPatch,
};

/// GET /api/v1/wishlist
pub async fn list_wishlist(State(state): State<Arc<AppState>>) -> Json<WishlistResponse> {
    let items = state.store.wishlist_entries().await;
    Json(WishlistResponse {
        total: items.len(),
        items,
    })
}

/// POST /api/v1/wishlist
///
/// The book must exist; a target price must sit below its current price.
pub async fn create_wishlist_item(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<WishlistDraft>,
) -> ApiResult<(StatusCode, Json<WishlistItem>)> {
    let book = state.store.get_book(&draft.book_id).await?;
    if let Some(target) = draft.target_price {
        validate::target_price(target, book.current_price)?;
    }

    let item = state.store.create_wishlist_item(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/wishlist/:id
pub async fn get_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WishlistItem>> {
    Ok(Json(state.store.wishlist_item(&id).await?))
}

/// PATCH /api/v1/wishlist/:id
///
/// `{"targetPrice": null}` clears the target.
pub async fn update_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<WishlistPatch>,
) -> ApiResult<Json<WishlistItem>> {
    if let Some(Some(target)) = patch.target_price {
        let item = state.store.wishlist_item(&id).await?;
        let book = state.store.get_book(&item.book_id).await?;
        validate::target_price(target, book.current_price)?;
    }

    Ok(Json(state.store.update_wishlist_item(&id, &patch).await?))
}

/// DELETE /api/v1/wishlist/:id
///
/// Returns the removed item.
pub async fn delete_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WishlistItem>> {
    Ok(Json(state.store.delete_wishlist_item(&id).await?))
}

/// POST /api/v1/wishlist/toggle
///
/// 201 when the book was added, 200 when it was removed.
pub async fn toggle_wishlist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<(StatusCode, Json<ToggleOutcome>)> {
    // Removal ignores the target and works for books gone from the catalog
    if !state.store.is_in_wishlist(&req.book_id).await {
        let book = state.store.get_book(&req.book_id).await?;
        if let Some(target) = req.target_price {
            validate::target_price(target, book.current_price)?;
        }
    }

    let outcome = state.store.toggle_wishlist(&req.book_id, req.target_price).await;
    let status = if outcome.added() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

/// GET /api/v1/wishlist/contains/:book_id
pub async fn contains_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Json<ContainsResponse> {
    let in_wishlist = state.store.is_in_wishlist(&book_id).await;
    Json(ContainsResponse {
        book_id,
        in_wishlist,
    })
}

/// GET /api/v1/wishlist/alerts
pub async fn price_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<PriceAlert>> {
    Json(state.store.price_alerts().await)
}
