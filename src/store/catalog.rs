//! Catalog - the ordered set of books
//!
//! Books keep their seed order (recommendations and "relevance" browsing rely
//! on it) and an id → position index gives O(1) lookup.

use std::collections::HashMap;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::Book;

/// In-memory book catalog
#[derive(Debug, Default)]
pub struct Catalog {
    /// Books in catalog order
    books: Vec<Book>,
    /// Book id to position in `books`
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from books in order; later duplicates of an id are dropped
    pub fn from_books(books: Vec<Book>) -> Self {
        let mut catalog = Self::new();
        for book in books {
            if catalog.by_id.contains_key(&book.id) {
                tracing::warn!(book_id = %book.id, "Duplicate book id in catalog, skipping");
                continue;
            }
            catalog.insert(book);
        }
        catalog
    }

    /// Append a book, or replace the existing entry with the same id in place
    pub fn insert(&mut self, book: Book) {
        match self.by_id.get(&book.id) {
            Some(&pos) => self.books[pos] = book,
            None => {
                self.by_id.insert(book.id.clone(), self.books.len());
                self.books.push(book);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All books in catalog order
    pub fn all(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.by_id.get(id).map(|&pos| &self.books[pos])
    }

    /// Get a book by id, failing with `BookNotFound`
    pub fn require(&self, id: &str) -> StoreResult<&Book> {
        self.get(id)
            .ok_or_else(|| StoreError::BookNotFound(id.to_string()))
    }

    /// Books with any genre containing `genre` (case-insensitive)
    pub fn by_genre(&self, genre: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.matches_genre(genre))
            .cloned()
            .collect()
    }

    /// Books priced within [min, max]
    pub fn in_price_range(&self, min: f64, max: f64) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.current_price >= min && b.current_price <= max)
            .cloned()
            .collect()
    }

    /// Books currently below their original price
    pub fn deals(&self) -> Vec<Book> {
        self.books.iter().filter(|b| b.is_deal()).cloned().collect()
    }

    /// Case-insensitive match on title, author, or genre
    pub fn search(&self, query: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.matches_query(query))
            .cloned()
            .collect()
    }

    /// Books at or below a price ceiling, in catalog order
    pub fn affordable(&self, ceiling: f64, limit: usize) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.current_price <= ceiling)
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::BookFormat;

    fn test_catalog() -> Catalog {
        Catalog::from_books(vec![
            Book::new("1", "The Silent Patient", "Alex Michaelides", 250.0, BookFormat::Paperback)
                .original_price(500.0)
                .genre("Mystery")
                .genre("Thriller"),
            Book::new("2", "Atomic Habits", "James Clear", 499.0, BookFormat::Hardcover)
                .genre("Self-Help"),
            Book::new("3", "It Ends with Us", "Colleen Hoover", 299.0, BookFormat::Paperback)
                .original_price(399.0)
                .genre("Romance"),
            Book::new("4", "Sapiens", "Yuval Noah Harari", 650.0, BookFormat::Hardcover)
                .original_price(600.0)
                .genre("Non-fiction"),
        ])
    }

    #[test]
    fn test_lookup() {
        let catalog = test_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.require("2").unwrap().title, "Atomic Habits");
        assert!(matches!(
            catalog.require("99"),
            Err(StoreError::BookNotFound(id)) if id == "99"
        ));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::from_books(vec![
            Book::new("1", "First", "A", 100.0, BookFormat::Kindle),
            Book::new("1", "Second", "B", 200.0, BookFormat::Kindle),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.require("1").unwrap().title, "First");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut catalog = test_catalog();
        catalog.insert(Book::new("2", "Atomic Habits", "James Clear", 399.0, BookFormat::Kindle));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.all()[1].current_price, 399.0);
    }

    #[test]
    fn test_genre_filter() {
        let catalog = test_catalog();
        let ids: Vec<_> = catalog.by_genre("ROM").into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["3"]);
        assert!(catalog.by_genre("poetry").is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let catalog = test_catalog();
        let ids: Vec<_> = catalog
            .in_price_range(250.0, 499.0)
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_deals() {
        let catalog = test_catalog();
        let ids: Vec<_> = catalog.deals().into_iter().map(|b| b.id).collect();
        // Sapiens has an original price below its current one
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_search_finds_every_title() {
        let catalog = test_catalog();
        for book in catalog.all() {
            let results = catalog.search(&book.title);
            assert!(results.iter().any(|b| b.id == book.id), "missing {}", book.title);
        }
    }

    #[test]
    fn test_search_fields() {
        let catalog = test_catalog();
        assert_eq!(catalog.search("harari").len(), 1);
        assert_eq!(catalog.search("thriller").len(), 1);
        assert_eq!(catalog.search("").len(), 4);
    }

    #[test]
    fn test_affordable_respects_limit() {
        let catalog = test_catalog();
        let books = catalog.affordable(500.0, 2);
        let ids: Vec<_> = books.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
