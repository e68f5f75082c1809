//! BookWise REST API
//!
//! HTTP API layer for BookWise, built with Axum.
//!
//! # Endpoints
//!
//! ## Books
//! - `GET /api/v1/books` - List books (`q`, `genre`, `min`, `max`)
//! - `GET /api/v1/books/deals` - Discounted books
//! - `GET /api/v1/books/:id` - Book detail
//! - `POST /api/v1/books/browse` - Browse with category, facets and sort
//! - `GET /api/v1/recommendations` - Recommendations from stored preferences
//! - `POST /api/v1/recommendations` - Recommendations for a query
//!
//! ## Wishlist
//! - `GET /api/v1/wishlist` - List items with books and price status
//! - `POST /api/v1/wishlist` - Add a book
//! - `GET /api/v1/wishlist/:id` - Get an item
//! - `PATCH /api/v1/wishlist/:id` - Update an item
//! - `DELETE /api/v1/wishlist/:id` - Remove an item
//! - `POST /api/v1/wishlist/toggle` - Toggle a book
//! - `GET /api/v1/wishlist/contains/:book_id` - Membership check
//! - `GET /api/v1/wishlist/alerts` - Price alerts
//!
//! ## Budgets
//! - `GET /api/v1/budgets` - All months
//! - `GET /api/v1/budgets/current` - Current month
//! - `PUT /api/v1/budgets/:month` - Set budget amount
//! - `POST /api/v1/budgets/:month/purchases` - Record a purchase
//! - `GET /api/v1/budgets/:month/remaining` - Remaining amount
//! - `GET /api/v1/budgets/:month/summary` - Spending summary
//! - `GET /api/v1/budgets/:month/suggestions` - Affordable books
//!
//! ## Preferences
//! - `GET /api/v1/preferences` - Get preferences
//! - `PATCH /api/v1/preferences` - Partial update
//! - `PUT /api/v1/preferences/genres` - Replace genres
//! - `PUT /api/v1/preferences/budget` - Replace monthly budget
//! - `GET /api/v1/preferences/onboarded` - Onboarding status
//! - `POST /api/v1/preferences/onboarding` - Complete onboarding
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use bookwise::api::{serve, ApiConfig, AppState};
//! use bookwise::store::{BookStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(BookStore::new(StoreConfig::default())?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Book routes
        .route("/books", get(routes::books::list_books))
        .route("/books/deals", get(routes::books::list_deals))
        .route("/books/browse", post(routes::books::browse_books))
        .route("/books/:id", get(routes::books::get_book))
        .route(
            "/recommendations",
            get(routes::books::recommend_for_user).post(routes::books::recommend),
        )
        // Wishlist routes
        .route(
            "/wishlist",
            get(routes::wishlist::list_wishlist).post(routes::wishlist::create_wishlist_item),
        )
        .route("/wishlist/toggle", post(routes::wishlist::toggle_wishlist))
        .route("/wishlist/alerts", get(routes::wishlist::price_alerts))
        .route("/wishlist/contains/:book_id", get(routes::wishlist::contains_book))
        .route(
            "/wishlist/:id",
            get(routes::wishlist::get_wishlist_item)
                .patch(routes::wishlist::update_wishlist_item)
                .delete(routes::wishlist::delete_wishlist_item),
        )
        // Budget routes
        .route("/budgets", get(routes::budget::list_budgets))
        .route("/budgets/current", get(routes::budget::current_budget))
        .route("/budgets/:month", put(routes::budget::update_budget))
        .route("/budgets/:month/purchases", post(routes::budget::add_purchase))
        .route("/budgets/:month/remaining", get(routes::budget::remaining_budget))
        .route("/budgets/:month/summary", get(routes::budget::budget_summary))
        .route("/budgets/:month/suggestions", get(routes::budget::budget_suggestions))
        // Preference routes
        .route(
            "/preferences",
            get(routes::preferences::get_preferences).patch(routes::preferences::update_preferences),
        )
        .route("/preferences/genres", put(routes::preferences::update_genres))
        .route("/preferences/budget", put(routes::preferences::update_monthly_budget))
        .route("/preferences/onboarded", get(routes::preferences::is_onboarded))
        .route("/preferences/onboarding", post(routes::preferences::complete_onboarding));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("BookWise API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("BookWise API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BookStore, SeedData, StoreConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = Arc::new(BookStore::new(StoreConfig::instant()).unwrap());
        let state = AppState::new(store, ApiConfig::default());
        build_router(state)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = send(create_test_app(), "GET", "/health/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let response = send(create_test_app(), "GET", "/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_requires_catalog() {
        let store = Arc::new(BookStore::with_seed(StoreConfig::instant(), SeedData::empty()));
        let app = build_router(AppState::new(store, ApiConfig::default()));
        let response = send(app, "GET", "/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = send(create_test_app(), "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store_stats"]["bookCount"], 12);
    }

    #[tokio::test]
    async fn test_list_books_with_filters() {
        let app = create_test_app();
        let response = send(app.clone(), "GET", "/api/v1/books", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["total"], 12);

        let response = send(app.clone(), "GET", "/api/v1/books?genre=mystery&max=300", None).await;
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["books"][0]["title"], "The Silent Patient");

        let response = send(app, "GET", "/api/v1/books?min=500&max=100", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_book_detail_and_not_found() {
        let app = create_test_app();
        let response = send(app.clone(), "GET", "/api/v1/books/1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["discountPercentage"], 50);
        assert_eq!(body["inWishlist"], false);

        let response = send(app, "GET", "/api/v1/books/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "BOOK_NOT_FOUND");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_browse() {
        let response = send(
            create_test_app(),
            "POST",
            "/api/v1/books/browse",
            Some(r#"{"category": "under-300", "sortBy": "price-low"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["activeFilters"], 1);
        let prices: Vec<f64> = body["books"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["currentPrice"].as_f64().unwrap())
            .collect();
        assert!(prices.iter().all(|p| *p <= 300.0));
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_recommendations() {
        let response = send(
            create_test_app(),
            "POST",
            "/api/v1/recommendations",
            Some(r#"{"favoriteGenres": [], "priceRange": {"min": 0, "max": 300}}"#),
        )
        .await;
        let body = json_body(response).await;
        let books = body["books"].as_array().unwrap();
        assert!(!books.is_empty() && books.len() <= 10);
        assert!(books.iter().all(|b| b["currentPrice"].as_f64().unwrap() <= 300.0));
    }

    #[tokio::test]
    async fn test_wishlist_toggle_flow() {
        let app = create_test_app();

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/wishlist/toggle",
            Some(r#"{"bookId": "5"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["action"], "added");

        let response = send(app.clone(), "GET", "/api/v1/wishlist/contains/5", None).await;
        assert_eq!(json_body(response).await["inWishlist"], true);

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/wishlist/toggle",
            Some(r#"{"bookId": "5"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["action"], "removed");

        let response = send(app, "GET", "/api/v1/wishlist/contains/5", None).await;
        assert_eq!(json_body(response).await["inWishlist"], false);
    }

    #[tokio::test]
    async fn test_toggle_removes_saved_book_despite_target() {
        let app = create_test_app();

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/wishlist/toggle",
            Some(r#"{"bookId": "4", "targetPrice": 700}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["action"], "removed");

        let response = send(app.clone(), "GET", "/api/v1/wishlist/contains/4", None).await;
        assert_eq!(json_body(response).await["inWishlist"], false);

        let response = send(
            app,
            "POST",
            "/api/v1/wishlist/toggle",
            Some(r#"{"bookId": "4", "targetPrice": 700}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_wishlist_item_rules() {
        let app = create_test_app();

        // Target must be below current price (Verity is 320)
        let response = send(
            app.clone(),
            "POST",
            "/api/v1/wishlist",
            Some(r#"{"bookId": "5", "targetPrice": 400}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/wishlist",
            Some(r#"{"bookId": "5", "targetPrice": 250}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // Sapiens is already saved in the seed data
        let response = send(app.clone(), "POST", "/api/v1/wishlist", Some(r#"{"bookId": "4"}"#)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(app, "POST", "/api/v1/wishlist", Some(r#"{"bookId": "999"}"#)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wishlist_item_crud() {
        let app = create_test_app();

        let response = send(
            app.clone(),
            "PATCH",
            "/api/v1/wishlist/1",
            Some(r#"{"targetPrice": null, "priority": 5}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["targetPrice"].is_null());
        assert_eq!(body["priority"], 5);

        let response = send(app.clone(), "DELETE", "/api/v1/wishlist/1", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(app, "GET", "/api/v1/wishlist/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wishlist_alerts() {
        let response = send(create_test_app(), "GET", "/api/v1/wishlist/alerts", None).await;
        let body = json_body(response).await;
        let alerts = body.as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["book"]["title"], "Project Hail Mary");
    }

    #[tokio::test]
    async fn test_budget_purchase_flow() {
        let app = create_test_app();

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/budgets/2024-01/purchases",
            Some(r#"{"bookTitle": "Ikigai", "amount": 349}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["spentAmount"], 1098.0);
        assert_eq!(body["purchases"].as_array().unwrap().len(), 3);

        let response = send(app.clone(), "GET", "/api/v1/budgets/2024-01/remaining", None).await;
        let body = json_body(response).await;
        assert_eq!(body["month"], "2024-01");
        assert_eq!(body["remaining"], 102.0);

        let response = send(
            app,
            "POST",
            "/api/v1/budgets/2024-01/purchases",
            Some(r#"{"bookTitle": "Ikigai", "amount": 0}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_budget_month_errors() {
        let app = create_test_app();

        let response = send(app.clone(), "GET", "/api/v1/budgets/jan-2024/summary", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INVALID_MONTH");

        let response = send(app.clone(), "GET", "/api/v1/budgets/1999-12/summary", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            app,
            "PUT",
            "/api/v1/budgets/2024-03",
            Some(r#"{"amount": -5}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_budget_keeps_purchases() {
        let app = create_test_app();
        let response = send(
            app.clone(),
            "PUT",
            "/api/v1/budgets/2024-02",
            Some(r#"{"amount": 2000}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["budgetAmount"], 2000.0);
        assert_eq!(body["spentAmount"], 579.0);

        let response = send(app, "GET", "/api/v1/budgets/2024-02/suggestions?limit=3", None).await;
        assert_eq!(json_body(response).await["total"], 3);
    }

    #[tokio::test]
    async fn test_current_budget_is_stable() {
        let app = create_test_app();
        let first = json_body(send(app.clone(), "GET", "/api/v1/budgets/current", None).await).await;
        let second = json_body(send(app, "GET", "/api/v1/budgets/current", None).await).await;
        assert_eq!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn test_onboarding() {
        let app = create_test_app();

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/preferences/onboarding",
            Some(r#"{"favoriteGenres": []}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            app.clone(),
            "POST",
            "/api/v1/preferences/onboarding",
            Some(r#"{"favoriteGenres": ["Fantasy", "Romance"], "monthlyBudget": 500}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["isOnboarded"], true);
        assert_eq!(body["priceRange"]["max"], 300.0);

        let response = send(app, "GET", "/api/v1/preferences/onboarded", None).await;
        assert_eq!(json_body(response).await["isOnboarded"], true);
    }

    #[tokio::test]
    async fn test_patch_preferences() {
        let app = create_test_app();
        let response = send(
            app.clone(),
            "PATCH",
            "/api/v1/preferences",
            Some(r#"{"preferredFormats": ["Audiobook"]}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["preferredFormats"], serde_json::json!(["Audiobook"]));
        assert_eq!(body["monthlyBudget"], 1000.0);

        let response = send(app, "PUT", "/api/v1/preferences/budget", Some(r#"{"amount": 0}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let response = send(create_test_app(), "POST", "/api/v1/wishlist", Some("not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
