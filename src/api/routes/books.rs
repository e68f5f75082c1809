//! Book Routes
//!
//! Read-only catalog endpoints plus recommendations.
//!
//! - GET /api/v1/books - List, search and filter books
//! - GET /api/v1/books/deals - Books below their original price
//! - GET /api/v1/books/:id - Book detail
//! - POST /api/v1/books/browse - Browse page pipeline
//! - GET /api/v1/recommendations - Recommendations from stored preferences
//! - POST /api/v1/recommendations - Recommendations for an explicit query

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{BookListQuery, BookListResponse, BrowseResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::{Book, BookDetail, BrowseFilter, RecommendationQuery};

/// GET /api/v1/books
///
/// The most selective filter is answered by the store; the rest are applied
/// to its result.
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookListQuery>,
) -> ApiResult<Json<BookListResponse>> {
    let min = params.min.unwrap_or(0.0);
    let max = params.max.unwrap_or(f64::MAX);
    if min > max {
        return Err(ApiError::Validation(format!(
            "min ({}) is greater than max ({})",
            min, max
        )));
    }
    let has_price_filter = params.min.is_some() || params.max.is_some();

    let query = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let genre = params.genre.as_deref().map(str::trim).filter(|g| !g.is_empty());

    let mut books: Vec<Book> = match (query, genre) {
        (Some(q), _) => state.store.search(q).await,
        (None, Some(g)) => state.store.books_by_genre(g).await,
        (None, None) if has_price_filter => state.store.books_in_price_range(min, max).await,
        (None, None) => state.store.list_books().await,
    };

    if let (Some(_), Some(g)) = (query, genre) {
        books.retain(|b| b.matches_genre(g));
    }
    if has_price_filter {
        books.retain(|b| b.current_price >= min && b.current_price <= max);
    }

    Ok(Json(books.into()))
}

/// GET /api/v1/books/deals
pub async fn list_deals(State(state): State<Arc<AppState>>) -> Json<BookListResponse> {
    Json(state.store.deals().await.into())
}

/// GET /api/v1/books/:id
///
/// Book with wishlist membership, discount and cheapest retailer.
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookDetail>> {
    Ok(Json(state.store.book_detail(&id).await?))
}

/// POST /api/v1/books/browse
pub async fn browse_books(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<BrowseFilter>,
) -> ApiResult<Json<BrowseResponse>> {
    if filter.price_range.min > filter.price_range.max {
        return Err(ApiError::Validation(
            "priceRange.min is greater than priceRange.max".to_string(),
        ));
    }

    let books = state.store.browse(&filter).await;

    Ok(Json(BrowseResponse {
        total: books.len(),
        active_filters: filter.active_filter_count(),
        books,
    }))
}

/// POST /api/v1/recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(query): Json<RecommendationQuery>,
) -> Json<BookListResponse> {
    Json(state.store.recommendations(&query).await.into())
}

/// GET /api/v1/recommendations
///
/// Uses the stored favorite genres and price range.
pub async fn recommend_for_user(State(state): State<Arc<AppState>>) -> Json<BookListResponse> {
    Json(state.store.recommendations_for_user().await.into())
}
