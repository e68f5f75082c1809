//! Seed fixtures
//!
//! Four JSON datasets (books, budget records, wishlist items, preferences) are
//! compiled into the binary. A seed directory containing files with the same
//! names can replace them at startup; missing files fall back to the embedded
//! copy.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{Book, BudgetRecord, MonthKey, Purchase, UserPreferences, WishlistItem};

const BOOKS_JSON: &str = include_str!("../../data/books.json");
const BUDGET_JSON: &str = include_str!("../../data/budget.json");
const WISHLIST_JSON: &str = include_str!("../../data/wishlist.json");
const PREFERENCES_JSON: &str = include_str!("../../data/preferences.json");

/// File names looked up inside a seed directory
pub const BOOKS_FILE: &str = "books.json";
pub const BUDGET_FILE: &str = "budget.json";
pub const WISHLIST_FILE: &str = "wishlist.json";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Tolerance when comparing a seeded spent amount with its purchase sum
const SPENT_EPSILON: f64 = 0.005;

/// Everything a store is initialized from
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub books: Vec<Book>,
    pub budgets: Vec<BudgetRecord>,
    pub wishlist: Vec<WishlistItem>,
    pub preferences: UserPreferences,
}

/// Budget record as stored in fixtures, where spent is written out explicitly
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedBudgetRecord {
    id: String,
    month: MonthKey,
    budget_amount: f64,
    #[serde(default)]
    spent_amount: Option<f64>,
    #[serde(default)]
    purchases: Vec<SeedPurchase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedPurchase {
    id: String,
    book_title: String,
    amount: f64,
    date: DateTime<Utc>,
    #[serde(default)]
    retailer: Option<String>,
}

impl SeedBudgetRecord {
    /// Convert to a record whose spent amount is the purchase sum
    fn into_record(self) -> BudgetRecord {
        let purchases: Vec<Purchase> = self
            .purchases
            .into_iter()
            .map(|p| Purchase {
                id: p.id,
                book_title: p.book_title,
                amount: p.amount,
                date: p.date,
                retailer: p.retailer,
            })
            .collect();

        let record = BudgetRecord::new(self.id, self.month, self.budget_amount).with_purchases(purchases);

        if let Some(declared) = self.spent_amount {
            let derived = record.spent_amount();
            if (declared - derived).abs() > SPENT_EPSILON {
                tracing::warn!(
                    month = %record.month,
                    declared,
                    derived,
                    "Seeded spentAmount disagrees with purchases, using purchase sum"
                );
            }
        }

        record
    }
}

impl SeedData {
    /// An empty store: no books, no budgets, default preferences
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fixtures compiled into the binary
    pub fn embedded() -> StoreResult<Self> {
        Self::parse(BOOKS_JSON, BUDGET_JSON, WISHLIST_JSON, PREFERENCES_JSON)
    }

    /// Fixtures read from `dir`, with embedded fallbacks for missing files
    pub fn from_dir(dir: &Path) -> StoreResult<Self> {
        if !dir.is_dir() {
            return Err(StoreError::Seed(format!(
                "Seed directory {:?} does not exist",
                dir
            )));
        }

        let books = read_or(dir, BOOKS_FILE, BOOKS_JSON)?;
        let budget = read_or(dir, BUDGET_FILE, BUDGET_JSON)?;
        let wishlist = read_or(dir, WISHLIST_FILE, WISHLIST_JSON)?;
        let preferences = read_or(dir, PREFERENCES_FILE, PREFERENCES_JSON)?;

        Self::parse(&books, &budget, &wishlist, &preferences)
    }

    /// Parse the four datasets
    pub fn parse(books: &str, budget: &str, wishlist: &str, preferences: &str) -> StoreResult<Self> {
        let books: Vec<Book> = parse_named(BOOKS_FILE, books)?;
        let budgets: Vec<SeedBudgetRecord> = parse_named(BUDGET_FILE, budget)?;
        let wishlist: Vec<WishlistItem> = parse_named(WISHLIST_FILE, wishlist)?;
        let preferences: UserPreferences = parse_named(PREFERENCES_FILE, preferences)?;

        for book in &books {
            if book.current_price < 0.0 {
                return Err(StoreError::Seed(format!(
                    "Book {} has a negative current price",
                    book.id
                )));
            }
        }

        Ok(Self {
            books,
            budgets: budgets.into_iter().map(SeedBudgetRecord::into_record).collect(),
            wishlist,
            preferences,
        })
    }
}

fn read_or(dir: &Path, name: &str, fallback: &str) -> StoreResult<String> {
    let path = dir.join(name);
    if path.exists() {
        tracing::debug!("Loading seed file {:?}", path);
        Ok(std::fs::read_to_string(path)?)
    } else {
        tracing::debug!("Seed file {:?} missing, using embedded copy", path);
        Ok(fallback.to_string())
    }
}

fn parse_named<T: serde::de::DeserializeOwned>(name: &str, content: &str) -> StoreResult<T> {
    serde_json::from_str(content).map_err(|e| StoreError::Seed(format!("{}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_fixtures_parse() {
        let seed = SeedData::embedded().unwrap();
        assert_eq!(seed.books.len(), 12);
        assert_eq!(seed.budgets.len(), 2);
        assert_eq!(seed.wishlist.len(), 3);
        assert!(!seed.preferences.is_onboarded);
        assert!(seed.books.iter().all(|b| b.current_price >= 0.0));
    }

    #[test]
    fn test_spent_amount_is_derived() {
        let budget = r#"[{
            "id": "1",
            "month": "2024-01",
            "budgetAmount": 1000,
            "spentAmount": 9999,
            "purchases": [
                {"id": "p", "bookTitle": "Dune", "amount": 120.5, "date": "2024-01-02T00:00:00Z"}
            ]
        }]"#;
        let seed = SeedData::parse("[]", budget, "[]", "{}").unwrap();
        assert_eq!(seed.budgets[0].spent_amount(), 120.5);
    }

    #[test]
    fn test_negative_price_rejected() {
        let books = r#"[{"id": "1", "title": "T", "author": "A", "currentPrice": -1, "format": "Kindle"}]"#;
        let err = SeedData::parse(books, "[]", "[]", "{}").unwrap_err();
        assert!(matches!(err, StoreError::Seed(_)));
    }

    #[test]
    fn test_bad_month_rejected() {
        let budget = r#"[{"id": "1", "month": "January", "budgetAmount": 1000}]"#;
        let err = SeedData::parse("[]", budget, "[]", "{}").unwrap_err();
        assert!(err.to_string().contains("budget.json"));
    }

    #[test]
    fn test_from_dir_falls_back_per_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(BOOKS_FILE),
            r#"[{"id": "x", "title": "Only Book", "author": "Someone", "currentPrice": 100, "format": "Paperback"}]"#,
        )
        .unwrap();

        let seed = SeedData::from_dir(dir.path()).unwrap();
        assert_eq!(seed.books.len(), 1);
        assert_eq!(seed.books[0].title, "Only Book");
        // Everything else comes from the embedded fixtures
        assert_eq!(seed.budgets.len(), 2);
    }

    #[test]
    fn test_from_missing_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(SeedData::from_dir(&missing).is_err());
    }
}
