//! Core data types for the BookWise store
//!
//! This module defines the entities every store component works with:
//! - `Book`: A catalog entry with pricing across retailers
//! - `WishlistItem`: A saved reference to a book with an optional price target
//! - `BudgetRecord` and `Purchase`: Monthly spending records
//! - `UserPreferences`: The single preferences record
//! - `MonthKey` and `PriceRange`: Small value types shared by the above

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::store::error::StoreError;

/// Publish date assumed for books that do not carry one
pub const FALLBACK_PUBLISH_DATE: (i32, u32, u32) = (2024, 1, 1);

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub cover_url: String,
    /// Best price currently offered, never negative
    pub current_price: f64,
    /// List price before any discount
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    pub format: BookFormat,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub synopsis: String,
    /// Retailer name → price at that retailer
    #[serde(default)]
    pub retailer_prices: BTreeMap<String, f64>,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
}

impl Book {
    /// Create a book with required fields; the rest start empty
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        current_price: f64,
        format: BookFormat,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            cover_url: String::new(),
            current_price,
            original_price: None,
            rating: 0.0,
            genres: Vec::new(),
            format,
            language: "English".to_string(),
            synopsis: String::new(),
            retailer_prices: BTreeMap::new(),
            publish_date: None,
        }
    }

    /// Builder: set the pre-discount price
    pub fn original_price(mut self, price: f64) -> Self {
        self.original_price = Some(price);
        self
    }

    /// Builder: set rating
    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Builder: add a genre
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    /// Builder: add a retailer price
    pub fn retailer(mut self, retailer: impl Into<String>, price: f64) -> Self {
        self.retailer_prices.insert(retailer.into(), price);
        self
    }

    /// Builder: set publish date
    pub fn published(mut self, date: NaiveDate) -> Self {
        self.publish_date = Some(date);
        self
    }

    /// A deal is a book whose original price exceeds its current price
    pub fn is_deal(&self) -> bool {
        self.original_price
            .map(|original| original > self.current_price)
            .unwrap_or(false)
    }

    /// Case-insensitive substring match of `needle` against any genre
    pub fn matches_genre(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.genres
            .iter()
            .any(|g| g.to_lowercase().contains(&needle))
    }

    /// True if any genre substring-matches any of `favorites`
    pub fn matches_any_genre(&self, favorites: &[String]) -> bool {
        favorites.iter().any(|fav| self.matches_genre(fav))
    }

    /// Free-text match over title, author, or any genre
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.author.to_lowercase().contains(&query)
            || self.genres.iter().any(|g| g.to_lowercase().contains(&query))
    }

    /// Publish date used for ordering
    pub fn effective_publish_date(&self) -> NaiveDate {
        let (y, m, d) = FALLBACK_PUBLISH_DATE;
        self.publish_date
            .or_else(|| NaiveDate::from_ymd_opt(y, m, d))
            .unwrap_or_default()
    }
}

/// Physical or digital edition of a book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookFormat {
    Paperback,
    Hardcover,
    Kindle,
    Audiobook,
}

impl BookFormat {
    /// Get all formats for iteration
    pub fn all() -> &'static [BookFormat] {
        &[
            BookFormat::Paperback,
            BookFormat::Hardcover,
            BookFormat::Kindle,
            BookFormat::Audiobook,
        ]
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookFormat::Paperback => write!(f, "Paperback"),
            BookFormat::Hardcover => write!(f, "Hardcover"),
            BookFormat::Kindle => write!(f, "Kindle"),
            BookFormat::Audiobook => write!(f, "Audiobook"),
        }
    }
}

impl FromStr for BookFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paperback" => Ok(BookFormat::Paperback),
            "hardcover" => Ok(BookFormat::Hardcover),
            "kindle" | "ebook" => Ok(BookFormat::Kindle),
            "audiobook" => Ok(BookFormat::Audiobook),
            _ => Err(StoreError::Validation(format!(
                "Invalid format: {}. Use paperback, hardcover, kindle, or audiobook",
                s
            ))),
        }
    }
}

/// Inclusive price interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range from zero up to `max`
    pub fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1000.0,
        }
    }
}

/// Calendar month key, rendered as `YYYY-MM`
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a key, rejecting months outside 1-12
    pub fn new(year: i32, month: u32) -> Result<Self, StoreError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(StoreError::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given date
    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Current calendar month in local time
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoreError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// A purchase recorded against a monthly budget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub book_title: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub retailer: Option<String>,
}

/// Caller-supplied part of a purchase; id and date are assigned by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraft {
    pub book_title: String,
    pub amount: f64,
    #[serde(default)]
    pub retailer: Option<String>,
}

impl PurchaseDraft {
    pub fn new(book_title: impl Into<String>, amount: f64) -> Self {
        Self {
            book_title: book_title.into(),
            amount,
            retailer: None,
        }
    }

    /// Builder: set retailer
    pub fn retailer(mut self, retailer: impl Into<String>) -> Self {
        self.retailer = Some(retailer.into());
        self
    }
}

/// Budget for one calendar month
///
/// The spent amount is always the sum of the recorded purchases; there is no
/// way to set it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    pub id: String,
    pub month: MonthKey,
    pub budget_amount: f64,
    purchases: Vec<Purchase>,
}

impl BudgetRecord {
    pub fn new(id: impl Into<String>, month: MonthKey, budget_amount: f64) -> Self {
        Self {
            id: id.into(),
            month,
            budget_amount,
            purchases: Vec::new(),
        }
    }

    /// Rebuild a record with existing purchases (seed loading)
    pub fn with_purchases(mut self, purchases: Vec<Purchase>) -> Self {
        self.purchases = purchases;
        self
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub(crate) fn push_purchase(&mut self, purchase: Purchase) {
        self.purchases.push(purchase);
    }

    /// Sum of all purchase amounts
    pub fn spent_amount(&self) -> f64 {
        self.purchases.iter().map(|p| p.amount).sum()
    }

    /// Budget left this month, floored at zero
    pub fn remaining(&self) -> f64 {
        (self.budget_amount - self.spent_amount()).max(0.0)
    }

    /// Share of the budget already spent, in percent (may exceed 100)
    pub fn percent_spent(&self) -> f64 {
        if self.budget_amount <= 0.0 {
            return 0.0;
        }
        self.spent_amount() / self.budget_amount * 100.0
    }
}

impl Serialize for BudgetRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BudgetRecord", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("month", &self.month)?;
        state.serialize_field("budgetAmount", &self.budget_amount)?;
        state.serialize_field("spentAmount", &self.spent_amount())?;
        state.serialize_field("purchases", &self.purchases)?;
        state.end()
    }
}

/// A book saved to the wishlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    /// Reference into the catalog; the wishlist does not own the book
    pub book_id: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    pub added_date: DateTime<Utc>,
    #[serde(default = "default_notify")]
    pub notify_on_drop: bool,
    #[serde(default)]
    pub priority: u32,
}

fn default_notify() -> bool {
    true
}

/// The user's onboarding and discovery preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub favorite_genres: BTreeSet<String>,
    #[serde(default = "default_monthly_budget")]
    pub monthly_budget: f64,
    #[serde(default)]
    pub preferred_formats: BTreeSet<BookFormat>,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub is_onboarded: bool,
    #[serde(default)]
    pub notification_preferences: BTreeMap<String, bool>,
}

fn default_monthly_budget() -> f64 {
    1000.0
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            favorite_genres: BTreeSet::new(),
            monthly_budget: default_monthly_budget(),
            preferred_formats: BTreeSet::new(),
            price_range: PriceRange::default(),
            is_onboarded: false,
            notification_preferences: BTreeMap::new(),
        }
    }
}

impl UserPreferences {
    /// Favorite genres as an owned list, in sorted order
    pub fn favorite_genre_list(&self) -> Vec<String> {
        self.favorite_genres.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book::new("1", "The Silent Patient", "Alex Michaelides", 250.0, BookFormat::Paperback)
            .original_price(500.0)
            .genre("Psychological Thriller")
            .genre("Mystery")
    }

    #[test]
    fn test_deal_predicate() {
        assert!(sample_book().is_deal());

        let full_price = Book::new("2", "Atomic Habits", "James Clear", 400.0, BookFormat::Hardcover)
            .original_price(400.0);
        assert!(!full_price.is_deal());

        let no_original = Book::new("3", "Dune", "Frank Herbert", 350.0, BookFormat::Kindle);
        assert!(!no_original.is_deal());
    }

    #[test]
    fn test_query_matching_is_case_insensitive() {
        let book = sample_book();
        assert!(book.matches_query("silent"));
        assert!(book.matches_query("MICHAELIDES"));
        assert!(book.matches_query("thrill"));
        assert!(!book.matches_query("romance"));
    }

    #[test]
    fn test_genre_matching() {
        let book = sample_book();
        assert!(book.matches_genre("thriller"));
        assert!(book.matches_any_genre(&["Romance".to_string(), "myst".to_string()]));
        assert!(!book.matches_any_genre(&["Romance".to_string()]));
        assert!(!book.matches_any_genre(&[]));
    }

    #[test]
    fn test_book_json_shape() {
        let json = r#"{
            "id": "7",
            "title": "Ikigai",
            "author": "Héctor García",
            "coverUrl": "https://example.com/ikigai.jpg",
            "currentPrice": 299,
            "originalPrice": 450,
            "rating": 4.3,
            "genres": ["Self-Help"],
            "format": "Paperback",
            "language": "English",
            "synopsis": "",
            "retailerPrices": {"Amazon": 299, "Flipkart": 315}
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.current_price, 299.0);
        assert_eq!(book.retailer_prices.len(), 2);
        assert!(book.publish_date.is_none());
        assert_eq!(
            book.effective_publish_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );

        let out = serde_json::to_value(&book).unwrap();
        assert_eq!(out["currentPrice"], 299.0);
        assert_eq!(out["format"], "Paperback");
    }

    #[test]
    fn test_month_key_parse_and_display() {
        let key: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2024-03");

        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-3".parse::<MonthKey>().is_err());
        assert!("March".parse::<MonthKey>().is_err());
        assert!("2024-00".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_key_ordering() {
        let dec: MonthKey = "2023-12".parse().unwrap();
        let jan: MonthKey = "2024-01".parse().unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_month_key_serde() {
        let key = MonthKey::new(2024, 7).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07\"");
        let back: MonthKey = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<MonthKey>("\"24-7\"").is_err());
    }

    #[test]
    fn test_budget_record_derived_spent() {
        let month = MonthKey::new(2024, 5).unwrap();
        let mut record = BudgetRecord::new("b1", month, 1000.0);
        assert_eq!(record.spent_amount(), 0.0);

        record.push_purchase(Purchase {
            id: "p1".into(),
            book_title: "Dune".into(),
            amount: 350.0,
            date: Utc::now(),
            retailer: Some("Amazon".into()),
        });
        record.push_purchase(Purchase {
            id: "p2".into(),
            book_title: "Ikigai".into(),
            amount: 800.0,
            date: Utc::now(),
            retailer: None,
        });

        assert_eq!(record.spent_amount(), 1150.0);
        assert_eq!(record.remaining(), 0.0);
        assert!((record.percent_spent() - 115.0).abs() < 1e-9);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["spentAmount"], 1150.0);
        assert_eq!(json["month"], "2024-05");
        assert_eq!(json["purchases"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_price_range_inclusive() {
        let range = PriceRange::new(100.0, 300.0);
        assert!(range.contains(100.0));
        assert!(range.contains(300.0));
        assert!(!range.contains(300.01));
        assert!(!range.contains(99.99));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("KINDLE".parse::<BookFormat>().unwrap(), BookFormat::Kindle);
        assert_eq!("ebook".parse::<BookFormat>().unwrap(), BookFormat::Kindle);
        assert!("scroll".parse::<BookFormat>().is_err());
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs: UserPreferences = serde_json::from_str("{}").unwrap();
        assert!(!prefs.is_onboarded);
        assert_eq!(prefs.monthly_budget, 1000.0);
        assert_eq!(prefs.price_range, PriceRange::default());
    }
}
