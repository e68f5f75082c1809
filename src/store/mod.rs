//! BookWise Store
//!
//! This module provides the in-memory data service behind the app:
//!
//! - **types**: Core data structures (Book, BudgetRecord, WishlistItem, UserPreferences)
//! - **catalog**: Ordered book catalog with id index and filters
//! - **recommend**: Recommendation and browse pipelines
//! - **budget**: Monthly budget ledger
//! - **wishlist**: Wishlist with toggle semantics
//! - **preferences**: Partial preference updates
//! - **pricing**: Discounts, retailer comparison, target price status
//! - **validate**: Input rules applied at the API and CLI boundary
//! - **seed**: Embedded and on-disk fixtures
//! - **latency**: Simulated per-operation delay
//! - **engine**: `BookStore`, the session object orchestrating all of the above
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Read Path:
//!   Operation → Latency pause → Read lock → Filter/Join → Cloned results
//!
//! Write Path:
//!   Operation → Latency pause → Write lock → Mutate → Cloned record
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bookwise::store::{BookStore, StoreConfig, MonthKey, PurchaseDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = BookStore::new(StoreConfig::default())?;
//!
//!     // Browse
//!     let deals = store.deals().await;
//!     println!("{} books on sale", deals.len());
//!
//!     // Track spending
//!     let month = MonthKey::current();
//!     store.current_month_budget().await;
//!     store.add_purchase(month, PurchaseDraft::new("Verity", 320.0)).await?;
//!     println!("Remaining: {}", store.remaining_budget(month).await);
//!
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod latency;
pub mod preferences;
pub mod pricing;
pub mod recommend;
pub mod seed;
pub mod types;
pub mod validate;
pub mod wishlist;

// Re-export commonly used types
pub use budget::{BudgetLedger, DEFAULT_BUDGET_AMOUNT};
pub use catalog::Catalog;
pub use engine::{
    BookDetail, BookStore, BudgetSummary, IdGenerator, PriceAlert, StoreConfig, StoreStats,
    WishlistEntry, DEFAULT_SUGGESTION_LIMIT,
};
pub use error::{StoreError, StoreResult};
pub use latency::{Latency, Operation};
pub use preferences::{PreferencesPatch, ONBOARDING_PRICE_SHARE};
pub use pricing::{
    affordable_count, best_retailer_price, discount_percentage, PriceStatus, RetailerOffer,
    TYPICAL_BOOK_PRICE,
};
pub use recommend::{
    browse, recommend, BrowseCategory, BrowseFilter, RecommendationQuery, SortBy,
    MAX_RECOMMENDATIONS, UNDER_PRICE_CEILING,
};
pub use seed::SeedData;
pub use types::{
    Book, BookFormat, BudgetRecord, MonthKey, PriceRange, Purchase, PurchaseDraft,
    UserPreferences, WishlistItem,
};
pub use wishlist::{ToggleAction, ToggleOutcome, Wishlist, WishlistDraft, WishlistPatch};
