//! BookWise session store
//!
//! `BookStore` owns every collection for one application session:
//! - Catalog: ordered books with an id index
//! - Wishlist: items keyed by id, indexed by book id
//! - Budgets: records keyed by month
//! - Preferences: a single record
//!
//! Each collection sits behind its own Tokio `RwLock`. Operations that join
//! collections take read locks in a fixed order: catalog first, then the
//! other collection.

use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::store::budget::{BudgetLedger, DEFAULT_BUDGET_AMOUNT};
use crate::store::catalog::Catalog;
use crate::store::error::{StoreError, StoreResult};
use crate::store::latency::{Latency, Operation};
use crate::store::preferences::PreferencesPatch;
use crate::store::pricing::{
    affordable_count, best_retailer_price, discount_percentage, PriceStatus, RetailerOffer,
    TYPICAL_BOOK_PRICE,
};
use crate::store::recommend::{browse, recommend, BrowseFilter, RecommendationQuery};
use crate::store::seed::SeedData;
use crate::store::types::{
    Book, BudgetRecord, MonthKey, Purchase, PurchaseDraft, UserPreferences, WishlistItem,
};
use crate::store::wishlist::{ToggleOutcome, Wishlist, WishlistDraft, WishlistPatch};

/// Number of books suggested against the remaining budget by default
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Configuration for the store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Simulated per-operation latency
    pub latency: Latency,
    /// Budget given to months created on first access
    pub default_budget: f64,
    /// Directory overriding the embedded seed fixtures
    pub seed_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency: Latency::default(),
            default_budget: DEFAULT_BUDGET_AMOUNT,
            seed_dir: None,
        }
    }
}

impl StoreConfig {
    /// Default settings with latency switched off
    pub fn instant() -> Self {
        Self {
            latency: Latency::disabled(),
            ..Default::default()
        }
    }

    /// Builder: read seed fixtures from a directory
    pub fn seed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.seed_dir = Some(dir.into());
        self
    }

    /// Load the seed data this config points at
    pub fn load_seed(&self) -> StoreResult<SeedData> {
        match &self.seed_dir {
            Some(dir) => SeedData::from_dir(dir),
            None => SeedData::embedded(),
        }
    }
}

/// Timestamp-based id source
///
/// Ids are milliseconds since the epoch, bumped by one when two are requested
/// within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1).to_string()
    }
}

/// A book as shown on its detail page
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub book: Book,
    pub in_wishlist: bool,
    pub discount_percentage: u32,
    pub best_offer: Option<RetailerOffer>,
}

/// A wishlist item joined with its book
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub item: WishlistItem,
    /// None when the book is no longer in the catalog
    pub book: Option<Book>,
    pub price_status: Option<PriceStatus>,
}

/// A wishlist item whose target price has been reached
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub item: WishlistItem,
    pub book: Book,
    pub target_price: f64,
    pub current_price: f64,
}

/// Budget figures for one month
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub month: MonthKey,
    pub budget_amount: f64,
    pub spent_amount: f64,
    pub remaining: f64,
    pub percent_spent: f64,
    pub purchase_count: usize,
    /// How many typically priced books the remainder still buys
    pub books_affordable: u32,
}

impl BudgetSummary {
    fn from_record(record: &BudgetRecord) -> Self {
        let remaining = record.remaining();
        Self {
            month: record.month,
            budget_amount: record.budget_amount,
            spent_amount: record.spent_amount(),
            remaining,
            percent_spent: record.percent_spent(),
            purchase_count: record.purchases().len(),
            books_affordable: affordable_count(remaining, TYPICAL_BOOK_PRICE),
        }
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub book_count: usize,
    pub deal_count: usize,
    pub wishlist_count: usize,
    pub budget_months: usize,
    pub onboarded: bool,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "books={}, deals={}, wishlist={}, budget_months={}, onboarded={}",
            self.book_count, self.deal_count, self.wishlist_count, self.budget_months, self.onboarded
        )
    }
}

/// The session store
pub struct BookStore {
    config: StoreConfig,
    catalog: RwLock<Catalog>,
    wishlist: RwLock<Wishlist>,
    budgets: RwLock<BudgetLedger>,
    preferences: RwLock<UserPreferences>,
    ids: IdGenerator,
}

impl BookStore {
    /// Create a store seeded according to `config`
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let seed = config.load_seed()?;
        Ok(Self::with_seed(config, seed))
    }

    /// Create a store from explicit seed data
    pub fn with_seed(config: StoreConfig, seed: SeedData) -> Self {
        let catalog = Catalog::from_books(seed.books);
        let wishlist = Wishlist::from_items(seed.wishlist);
        let budgets = BudgetLedger::from_records(seed.budgets, config.default_budget);

        tracing::info!(
            books = catalog.len(),
            wishlist = wishlist.len(),
            budget_months = budgets.len(),
            "Store seeded"
        );

        Self {
            config,
            catalog: RwLock::new(catalog),
            wishlist: RwLock::new(wishlist),
            budgets: RwLock::new(budgets),
            preferences: RwLock::new(seed.preferences),
            ids: IdGenerator::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn pause(&self, op: Operation) {
        self.config.latency.pause(op).await;
    }

    // ============================================
    // CATALOG
    // ============================================

    /// All books in catalog order
    pub async fn list_books(&self) -> Vec<Book> {
        self.pause(Operation::ListBooks).await;
        self.catalog.read().await.all().to_vec()
    }

    /// A single book; `BookNotFound` if the id is unknown
    pub async fn get_book(&self, id: &str) -> StoreResult<Book> {
        self.pause(Operation::GetBook).await;
        self.catalog.read().await.require(id).cloned()
    }

    /// Books whose genres contain `genre`, case-insensitive
    pub async fn books_by_genre(&self, genre: &str) -> Vec<Book> {
        self.pause(Operation::BooksByGenre).await;
        self.catalog.read().await.by_genre(genre)
    }

    /// Books priced within [min, max]
    pub async fn books_in_price_range(&self, min: f64, max: f64) -> Vec<Book> {
        self.pause(Operation::BooksByPrice).await;
        self.catalog.read().await.in_price_range(min, max)
    }

    /// Books below their original price
    pub async fn deals(&self) -> Vec<Book> {
        self.pause(Operation::Deals).await;
        self.catalog.read().await.deals()
    }

    /// Title, author, or genre search
    pub async fn search(&self, query: &str) -> Vec<Book> {
        self.pause(Operation::Search).await;
        let results = self.catalog.read().await.search(query);
        tracing::debug!(query, results = results.len(), "Catalog search");
        results
    }

    /// Up to ten books matching the given genres and price range
    pub async fn recommendations(&self, query: &RecommendationQuery) -> Vec<Book> {
        self.pause(Operation::Recommend).await;
        let catalog = self.catalog.read().await;
        recommend(catalog.all(), query)
    }

    /// Recommendations driven by the stored preferences
    pub async fn recommendations_for_user(&self) -> Vec<Book> {
        self.pause(Operation::Recommend).await;
        let catalog = self.catalog.read().await;
        let query = {
            let prefs = self.preferences.read().await;
            RecommendationQuery {
                favorite_genres: prefs.favorite_genre_list(),
                price_range: Some(prefs.price_range),
            }
        };
        recommend(catalog.all(), &query)
    }

    /// Browse-page pipeline: search, category, facets, sort
    pub async fn browse(&self, filter: &BrowseFilter) -> Vec<Book> {
        self.pause(Operation::Browse).await;
        let catalog = self.catalog.read().await;
        browse(catalog.all(), filter)
    }

    /// Book plus wishlist membership and pricing details
    pub async fn book_detail(&self, id: &str) -> StoreResult<BookDetail> {
        self.pause(Operation::GetBook).await;
        let catalog = self.catalog.read().await;
        let book = catalog.require(id)?.clone();
        let in_wishlist = self.wishlist.read().await.contains_book(id);

        Ok(BookDetail {
            discount_percentage: discount_percentage(&book),
            best_offer: best_retailer_price(&book),
            in_wishlist,
            book,
        })
    }

    // ============================================
    // BUDGET
    // ============================================

    /// All budget records, oldest month first
    pub async fn budgets(&self) -> Vec<BudgetRecord> {
        self.pause(Operation::ListBudgets).await;
        self.budgets.read().await.all()
    }

    /// Record for the current calendar month, created on first access
    pub async fn current_month_budget(&self) -> BudgetRecord {
        self.budget_for_month(MonthKey::current()).await
    }

    /// Record for `month`, created with the default amount on first access
    pub async fn budget_for_month(&self, month: MonthKey) -> BudgetRecord {
        self.pause(Operation::CurrentBudget).await;
        let mut budgets = self.budgets.write().await;
        budgets.get_or_create(month, || self.ids.next_id()).clone()
    }

    /// Set a month's budget amount, creating the month if needed
    pub async fn update_budget(&self, month: MonthKey, amount: f64) -> BudgetRecord {
        self.pause(Operation::UpdateBudget).await;
        let mut budgets = self.budgets.write().await;
        let record = budgets.set_amount(month, amount, || self.ids.next_id()).clone();
        tracing::info!(month = %month, amount, "Budget updated");
        record
    }

    /// Record a purchase; `BudgetNotFound` if the month has no record
    pub async fn add_purchase(&self, month: MonthKey, draft: PurchaseDraft) -> StoreResult<BudgetRecord> {
        self.pause(Operation::AddPurchase).await;
        let purchase = Purchase {
            id: self.ids.next_id(),
            book_title: draft.book_title,
            amount: draft.amount,
            date: Utc::now(),
            retailer: draft.retailer,
        };
        let purchase_id = purchase.id.clone();
        let amount = purchase.amount;

        let mut budgets = self.budgets.write().await;
        let record = budgets.add_purchase(month, purchase)?.clone();

        tracing::info!(
            month = %month,
            purchase_id = %purchase_id,
            amount,
            spent = record.spent_amount(),
            "Purchase recorded"
        );
        Ok(record)
    }

    /// Remaining budget, floored at zero; the default budget for unknown months
    pub async fn remaining_budget(&self, month: MonthKey) -> f64 {
        self.pause(Operation::RemainingBudget).await;
        self.budgets.read().await.remaining(month)
    }

    /// Figures for a month; `BudgetNotFound` if it has no record
    pub async fn budget_summary(&self, month: MonthKey) -> StoreResult<BudgetSummary> {
        self.pause(Operation::BudgetSummary).await;
        let budgets = self.budgets.read().await;
        let record = budgets
            .get(month)
            .ok_or_else(|| StoreError::BudgetNotFound(month.to_string()))?;
        Ok(BudgetSummary::from_record(record))
    }

    /// Books the month's remaining budget can still pay for, in catalog order
    pub async fn budget_suggestions(&self, month: MonthKey, limit: usize) -> Vec<Book> {
        self.pause(Operation::Recommend).await;
        let catalog = self.catalog.read().await;
        let remaining = self.budgets.read().await.remaining(month);
        catalog.affordable(remaining, limit)
    }

    // ============================================
    // WISHLIST
    // ============================================

    /// All wishlist items by priority
    pub async fn wishlist(&self) -> Vec<WishlistItem> {
        self.pause(Operation::ListWishlist).await;
        self.wishlist.read().await.all()
    }

    /// Wishlist items joined with their books and price status
    pub async fn wishlist_entries(&self) -> Vec<WishlistEntry> {
        self.pause(Operation::ListWishlist).await;
        let catalog = self.catalog.read().await;
        let wishlist = self.wishlist.read().await;

        wishlist
            .all()
            .into_iter()
            .map(|item| {
                let book = catalog.get(&item.book_id).cloned();
                let price_status = book
                    .as_ref()
                    .and_then(|b| PriceStatus::evaluate(b.current_price, item.target_price));
                WishlistEntry {
                    item,
                    book,
                    price_status,
                }
            })
            .collect()
    }

    /// A single item; `WishlistItemNotFound` if the id is unknown
    pub async fn wishlist_item(&self, id: &str) -> StoreResult<WishlistItem> {
        self.pause(Operation::GetWishlistItem).await;
        self.wishlist.read().await.get(id).cloned()
    }

    /// Add a new item; `Conflict` if the book is already saved
    pub async fn create_wishlist_item(&self, draft: WishlistDraft) -> StoreResult<WishlistItem> {
        self.pause(Operation::CreateWishlistItem).await;
        let mut wishlist = self.wishlist.write().await;
        let item = wishlist.create(draft, self.ids.next_id(), Utc::now())?;
        tracing::info!(item_id = %item.id, book_id = %item.book_id, "Wishlist item created");
        Ok(item)
    }

    /// Merge a patch into an item
    pub async fn update_wishlist_item(&self, id: &str, patch: &WishlistPatch) -> StoreResult<WishlistItem> {
        self.pause(Operation::UpdateWishlistItem).await;
        let item = self.wishlist.write().await.update(id, patch)?;
        tracing::debug!(item_id = %id, "Wishlist item updated");
        Ok(item)
    }

    /// Remove an item, returning it
    pub async fn delete_wishlist_item(&self, id: &str) -> StoreResult<WishlistItem> {
        self.pause(Operation::DeleteWishlistItem).await;
        let item = self.wishlist.write().await.remove(id)?;
        tracing::info!(item_id = %id, book_id = %item.book_id, "Wishlist item deleted");
        Ok(item)
    }

    /// Whether a book is on the wishlist
    pub async fn is_in_wishlist(&self, book_id: &str) -> bool {
        self.pause(Operation::InWishlist).await;
        self.wishlist.read().await.contains_book(book_id)
    }

    /// Add the book if absent, remove it if present
    pub async fn toggle_wishlist(&self, book_id: &str, target_price: Option<f64>) -> ToggleOutcome {
        self.pause(Operation::ToggleWishlist).await;
        let mut wishlist = self.wishlist.write().await;
        let outcome = wishlist.toggle(book_id, target_price, || self.ids.next_id(), Utc::now());
        tracing::info!(
            book_id,
            action = ?outcome.action,
            item_id = %outcome.item.id,
            "Wishlist toggled"
        );
        outcome
    }

    /// Items asking for a notification whose book is at or below its target
    pub async fn price_alerts(&self) -> Vec<PriceAlert> {
        self.pause(Operation::PriceAlerts).await;
        let catalog = self.catalog.read().await;
        let wishlist = self.wishlist.read().await;

        wishlist
            .all()
            .into_iter()
            .filter(|item| item.notify_on_drop)
            .filter_map(|item| {
                let target_price = item.target_price?;
                let book = catalog.get(&item.book_id)?;
                (book.current_price <= target_price).then(|| PriceAlert {
                    target_price,
                    current_price: book.current_price,
                    book: book.clone(),
                    item,
                })
            })
            .collect()
    }

    // ============================================
    // PREFERENCES
    // ============================================

    pub async fn preferences(&self) -> UserPreferences {
        self.pause(Operation::GetPreferences).await;
        self.preferences.read().await.clone()
    }

    /// Shallow-merge a patch into the stored preferences
    pub async fn update_preferences(&self, patch: PreferencesPatch) -> UserPreferences {
        self.pause(Operation::UpdatePreferences).await;
        let mut prefs = self.preferences.write().await;
        patch.apply(&mut prefs);
        tracing::debug!("Preferences updated");
        prefs.clone()
    }

    /// Replace favorite genres
    pub async fn update_genres<I, S>(&self, genres: I) -> UserPreferences
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pause(Operation::UpdatePreferenceField).await;
        let mut prefs = self.preferences.write().await;
        prefs.favorite_genres = genres.into_iter().map(Into::into).collect();
        prefs.clone()
    }

    /// Replace the monthly budget preference
    pub async fn update_monthly_budget(&self, amount: f64) -> UserPreferences {
        self.pause(Operation::UpdatePreferenceField).await;
        let mut prefs = self.preferences.write().await;
        prefs.monthly_budget = amount;
        prefs.clone()
    }

    /// Whether onboarding has finished
    pub async fn is_onboarded(&self) -> bool {
        self.pause(Operation::IsOnboarded).await;
        self.preferences.read().await.is_onboarded
    }

    /// Mark onboarding finished
    pub async fn complete_onboarding(&self) -> UserPreferences {
        self.pause(Operation::CompleteOnboarding).await;
        let mut prefs = self.preferences.write().await;
        prefs.is_onboarded = true;
        tracing::info!(genres = prefs.favorite_genres.len(), "Onboarding completed");
        prefs.clone()
    }

    // ============================================
    // STATS
    // ============================================

    /// Collection sizes, without simulated latency
    pub async fn stats(&self) -> StoreStats {
        let catalog = self.catalog.read().await;
        let wishlist = self.wishlist.read().await;
        let budgets = self.budgets.read().await;
        let prefs = self.preferences.read().await;

        StoreStats {
            book_count: catalog.len(),
            deal_count: catalog.all().iter().filter(|b| b.is_deal()).count(),
            wishlist_count: wishlist.len(),
            budget_months: budgets.len(),
            onboarded: prefs.is_onboarded,
        }
    }
}
