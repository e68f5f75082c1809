//! Store error types
//!
//! Defines all errors that can occur in the in-memory store layer.

use thiserror::Error;

/// Errors that can occur in the book store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No book with the requested id
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// No wishlist item with the requested id
    #[error("Wishlist item not found: {0}")]
    WishlistItemNotFound(String),

    /// No budget record for the requested month
    #[error("Budget not found for month {0}")]
    BudgetNotFound(String),

    /// Operation would break a uniqueness rule
    #[error("Conflict: {0}")]
    Conflict(String),

    /// User input rejected by a boundary rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Month key is not of the form YYYY-MM
    #[error("Invalid month key: {0}")]
    InvalidMonth(String),

    /// Seed fixture could not be parsed
    #[error("Seed data error: {0}")]
    Seed(String),

    /// I/O operation failed (reading seed files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for the lookup-by-id/key family of errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::BookNotFound(_)
                | StoreError::WishlistItemNotFound(_)
                | StoreError::BudgetNotFound(_)
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Seed(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::BookNotFound("42".to_string());
        assert_eq!(err.to_string(), "Book not found: 42");

        let err = StoreError::BudgetNotFound("2024-03".to_string());
        assert_eq!(err.to_string(), "Budget not found for month 2024-03");
    }

    #[test]
    fn test_not_found_family() {
        assert!(StoreError::BookNotFound("1".into()).is_not_found());
        assert!(StoreError::WishlistItemNotFound("1".into()).is_not_found());
        assert!(StoreError::BudgetNotFound("2024-01".into()).is_not_found());
        assert!(!StoreError::Conflict("dup".into()).is_not_found());
        assert!(!StoreError::Validation("bad".into()).is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let store_err: StoreError = json_err.into();
        assert!(matches!(store_err, StoreError::Seed(_)));
    }
}
