//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON in camelCase.
//! Store types that already carry serde derives are used directly.

use serde::{Deserialize, Serialize};

use crate::store::{Book, MonthKey, StoreStats, WishlistEntry};

// ============================================
// BOOK DTOs
// ============================================

/// Query string for `GET /api/v1/books`
///
/// Filters combine: search first, then genre, then price bounds.
#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    /// Free-text search over title, author and genres
    #[serde(default)]
    pub q: Option<String>,
    /// Genre substring
    #[serde(default)]
    pub genre: Option<String>,
    /// Inclusive lower price bound
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive upper price bound
    #[serde(default)]
    pub max: Option<f64>,
}

/// List of books
#[derive(Debug, Serialize, Deserialize)]
pub struct BookListResponse {
    pub total: usize,
    pub books: Vec<Book>,
}

impl From<Vec<Book>> for BookListResponse {
    fn from(books: Vec<Book>) -> Self {
        Self {
            total: books.len(),
            books,
        }
    }
}

/// Browse page results
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    pub total: usize,
    pub active_filters: usize,
    pub books: Vec<Book>,
}

// ============================================
// WISHLIST DTOs
// ============================================

/// Wishlist items with their books
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub total: usize,
    pub items: Vec<WishlistEntry>,
}

/// Toggle request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub book_id: String,
    #[serde(default)]
    pub target_price: Option<f64>,
}

/// Wishlist membership for a book
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainsResponse {
    pub book_id: String,
    pub in_wishlist: bool,
}

// ============================================
// BUDGET DTOs
// ============================================

/// Amount body used by budget and preference updates
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: f64,
}

/// Remaining budget for a month
#[derive(Debug, Serialize)]
pub struct RemainingResponse {
    pub month: MonthKey,
    pub remaining: f64,
}

/// Query string for budget suggestions
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

// ============================================
// PREFERENCES DTOs
// ============================================

/// Replace favorite genres
#[derive(Debug, Deserialize)]
pub struct GenresRequest {
    pub genres: Vec<String>,
}

/// Onboarding status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardedResponse {
    pub is_onboarded: bool,
}

/// Final onboarding step: genres and an optional budget pick
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub favorite_genres: Vec<String>,
    #[serde(default)]
    pub monthly_budget: Option<f64>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Store status: "ok" or "empty"
    pub store: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// API version
    pub version: String,
    /// Collection sizes
    pub store_stats: StoreStats,
}
