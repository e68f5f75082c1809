//! Recommendation and browse filters over the catalog
//!
//! Both are pure functions over a slice of books so they can run against a
//! catalog snapshot without holding any lock.
//!
//! # Recommendation
//!
//! ```text
//! books ─▶ favorite genres (any-of substring, skipped if empty)
//!       ─▶ price range (inclusive, skipped if absent)
//!       ─▶ first 10 in catalog order
//! ```
//!
//! # Browse
//!
//! ```text
//! books ─▶ search ─▶ category ─▶ genres ─▶ price ─▶ formats ─▶ rating ─▶ sort
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::store::types::{Book, BookFormat, PriceRange};

/// Maximum number of books a recommendation returns
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Price ceiling for the "under 300" category
pub const UNDER_PRICE_CEILING: f64 = 300.0;

/// Inputs to the recommendation filter
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
}

impl RecommendationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a favorite genre
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.favorite_genres.push(genre.into());
        self
    }

    /// Builder: restrict to a price range
    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }
}

/// Narrow the catalog to at most ten books matching the query
///
/// No ranking: results keep catalog order.
pub fn recommend(books: &[Book], query: &RecommendationQuery) -> Vec<Book> {
    books
        .iter()
        .filter(|b| query.favorite_genres.is_empty() || b.matches_any_genre(&query.favorite_genres))
        .filter(|b| {
            query
                .price_range
                .map(|range| range.contains(b.current_price))
                .unwrap_or(true)
        })
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect()
}

/// Preset shelves on the browse page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BrowseCategory {
    #[default]
    AllBooks,
    Deals,
    #[serde(rename = "under-300")]
    Under300,
    NewReleases,
    Trending,
    Romance,
    Mystery,
    SelfHelp,
}

impl BrowseCategory {
    /// Apply the preset to an already filtered list
    fn apply(self, mut books: Vec<Book>) -> Vec<Book> {
        match self {
            BrowseCategory::AllBooks => books,
            BrowseCategory::Deals => books.into_iter().filter(Book::is_deal).collect(),
            BrowseCategory::Under300 => books
                .into_iter()
                .filter(|b| b.current_price <= UNDER_PRICE_CEILING)
                .collect(),
            BrowseCategory::NewReleases => {
                books.sort_by(newest_first);
                books
            }
            BrowseCategory::Trending => {
                books.sort_by(highest_rated_first);
                books
            }
            BrowseCategory::Romance => keep_genre(books, "romance"),
            BrowseCategory::Mystery => keep_genre(books, "mystery"),
            BrowseCategory::SelfHelp => keep_genre(books, "self-help"),
        }
    }
}

/// Result ordering on the browse page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Keep catalog order
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

/// Everything the browse page can narrow the catalog by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowseFilter {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: BrowseCategory,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub formats: Vec<BookFormat>,
    /// Minimum rating; 0 disables the filter
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl Default for BrowseFilter {
    fn default() -> Self {
        Self {
            query: None,
            category: BrowseCategory::AllBooks,
            genres: Vec::new(),
            price_range: PriceRange::default(),
            formats: Vec::new(),
            rating: 0.0,
            sort_by: SortBy::Relevance,
        }
    }
}

impl BrowseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: free-text query
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Builder: category preset
    pub fn category(mut self, category: BrowseCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder: add a genre facet
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    /// Builder: price range
    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    /// Builder: add a format facet
    pub fn format(mut self, format: BookFormat) -> Self {
        self.formats.push(format);
        self
    }

    /// Builder: minimum rating
    pub fn min_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Builder: sort order
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Number of facets that differ from their neutral value
    ///
    /// Price range and category are not counted.
    pub fn active_filter_count(&self) -> usize {
        self.genres.len()
            + self.formats.len()
            + usize::from(self.rating > 0.0)
            + usize::from(self.sort_by != SortBy::Relevance)
    }
}

/// Run the full browse pipeline
pub fn browse(books: &[Book], filter: &BrowseFilter) -> Vec<Book> {
    let mut results: Vec<Book> = match filter.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => books.iter().filter(|b| b.matches_query(q)).cloned().collect(),
        _ => books.to_vec(),
    };

    results = filter.category.apply(results);

    if !filter.genres.is_empty() {
        results.retain(|b| b.matches_any_genre(&filter.genres));
    }

    results.retain(|b| filter.price_range.contains(b.current_price));

    if !filter.formats.is_empty() {
        results.retain(|b| filter.formats.contains(&b.format));
    }

    if filter.rating > 0.0 {
        results.retain(|b| b.rating >= filter.rating);
    }

    match filter.sort_by {
        SortBy::Relevance => {}
        SortBy::PriceLow => results.sort_by(|a, b| cmp_f64(a.current_price, b.current_price)),
        SortBy::PriceHigh => results.sort_by(|a, b| cmp_f64(b.current_price, a.current_price)),
        SortBy::Rating => results.sort_by(highest_rated_first),
        SortBy::Newest => results.sort_by(newest_first),
    }

    results
}

fn keep_genre(books: Vec<Book>, genre: &str) -> Vec<Book> {
    books.into_iter().filter(|b| b.matches_genre(genre)).collect()
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn highest_rated_first(a: &Book, b: &Book) -> Ordering {
    cmp_f64(b.rating, a.rating)
}

fn newest_first(a: &Book, b: &Book) -> Ordering {
    b.effective_publish_date().cmp(&a.effective_publish_date())
}
