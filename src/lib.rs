//! # BookWise
//!
//! Book discovery and budget tracking service: a seeded catalog with
//! recommendations and deals, a wishlist with target prices, monthly reading
//! budgets with purchase history, and user preferences.
//!
//! ## Features
//!
//! - **Catalog**: Search, genre and price filters, deals, browse pipeline
//! - **Recommendations**: Genre and price-range driven, capped at ten
//! - **Budgets**: Per-month records whose spent amount is derived from purchases
//! - **Wishlist**: Toggle semantics, target prices, price alerts
//! - **Simulated latency**: Every operation behaves like a remote call
//!
//! ## Modules
//!
//! - [`store`]: In-memory session store and domain logic
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookwise::store::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = BookStore::new(StoreConfig::instant())?;
//!
//!     // Recommendations under 300
//!     let picks = store
//!         .recommendations(&RecommendationQuery::new().price_range(PriceRange::up_to(300.0)))
//!         .await;
//!     println!("{} picks", picks.len());
//!
//!     // Save a book
//!     let outcome = store.toggle_wishlist("1", Some(200.0)).await;
//!     println!("{:?}", outcome.action);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    Book, BookFormat, BookStore, BudgetRecord, MonthKey, PriceRange, Purchase, PurchaseDraft,
    StoreConfig, StoreError, StoreResult, StoreStats, UserPreferences, WishlistItem,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StoreSettings};
