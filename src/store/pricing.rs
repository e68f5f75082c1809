//! Price arithmetic shared by the catalog, wishlist and budget views

use serde::Serialize;

use crate::store::types::Book;

/// Reference price used for "how many more books" estimates
pub const TYPICAL_BOOK_PRICE: f64 = 300.0;

/// Percent off the original price, rounded; 0 when the book is not a deal
pub fn discount_percentage(book: &Book) -> u32 {
    match book.original_price {
        Some(original) if original > book.current_price => {
            ((original - book.current_price) / original * 100.0).round() as u32
        }
        _ => 0,
    }
}

/// Cheapest retailer offer for a book
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RetailerOffer {
    pub retailer: String,
    pub price: f64,
}

/// Lowest retailer price; ties go to the retailer that sorts first
pub fn best_retailer_price(book: &Book) -> Option<RetailerOffer> {
    book.retailer_prices
        .iter()
        .fold(None, |best: Option<(&String, f64)>, (retailer, &price)| match best {
            Some((_, best_price)) if best_price <= price => best,
            _ => Some((retailer, price)),
        })
        .map(|(retailer, price)| RetailerOffer {
            retailer: retailer.clone(),
            price,
        })
}

/// How many books at `unit_price` the remaining budget still covers
pub fn affordable_count(remaining: f64, unit_price: f64) -> u32 {
    if unit_price <= 0.0 || remaining <= 0.0 {
        return 0;
    }
    (remaining / unit_price).floor() as u32
}

/// Where a wishlisted book's price sits relative to its target
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PriceStatus {
    /// Current price is at or below the target
    TargetMet,
    /// Current price is still above the target
    #[serde(rename_all = "camelCase")]
    AboveTarget { difference: f64, percentage: u32 },
}

impl PriceStatus {
    /// Compare a current price with an optional target
    pub fn evaluate(current: f64, target: Option<f64>) -> Option<Self> {
        let target = target?;
        if current <= target {
            return Some(PriceStatus::TargetMet);
        }

        let difference = current - target;
        let percentage = (difference / current * 100.0).round() as u32;
        Some(PriceStatus::AboveTarget {
            difference,
            percentage,
        })
    }

    pub fn is_met(&self) -> bool {
        matches!(self, PriceStatus::TargetMet)
    }

    /// Short message suitable for display
    pub fn message(&self) -> String {
        match self {
            PriceStatus::TargetMet => "Target price reached!".to_string(),
            PriceStatus::AboveTarget {
                difference,
                percentage,
            } => format!("₹{} above target ({}%)", difference, percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::BookFormat;

    #[test]
    fn test_discount_percentage() {
        let book = Book::new("1", "A", "B", 250.0, BookFormat::Paperback).original_price(500.0);
        assert_eq!(discount_percentage(&book), 50);

        let book = Book::new("2", "A", "B", 299.0, BookFormat::Paperback).original_price(399.0);
        assert_eq!(discount_percentage(&book), 25);

        let book = Book::new("3", "A", "B", 650.0, BookFormat::Paperback).original_price(600.0);
        assert_eq!(discount_percentage(&book), 0);

        let book = Book::new("4", "A", "B", 650.0, BookFormat::Paperback);
        assert_eq!(discount_percentage(&book), 0);
    }

    #[test]
    fn test_best_retailer_price() {
        let book = Book::new("1", "A", "B", 250.0, BookFormat::Paperback)
            .retailer("Flipkart", 265.0)
            .retailer("Amazon", 250.0)
            .retailer("Crossword", 250.0);
        let best = best_retailer_price(&book).unwrap();
        assert_eq!(best.retailer, "Amazon");
        assert_eq!(best.price, 250.0);

        let bare = Book::new("2", "A", "B", 250.0, BookFormat::Paperback);
        assert!(best_retailer_price(&bare).is_none());
    }

    #[test]
    fn test_affordable_count() {
        assert_eq!(affordable_count(1000.0, TYPICAL_BOOK_PRICE), 3);
        assert_eq!(affordable_count(299.0, TYPICAL_BOOK_PRICE), 0);
        assert_eq!(affordable_count(0.0, TYPICAL_BOOK_PRICE), 0);
        assert_eq!(affordable_count(500.0, 0.0), 0);
    }

    #[test]
    fn test_price_status() {
        assert_eq!(PriceStatus::evaluate(300.0, None), None);
        assert_eq!(PriceStatus::evaluate(300.0, Some(300.0)), Some(PriceStatus::TargetMet));

        let status = PriceStatus::evaluate(400.0, Some(300.0)).unwrap();
        assert_eq!(
            status,
            PriceStatus::AboveTarget {
                difference: 100.0,
                percentage: 25
            }
        );
        assert!(!status.is_met());
        assert_eq!(status.message(), "₹100 above target (25%)");
    }

    #[test]
    fn test_price_status_json() {
        let json = serde_json::to_value(PriceStatus::TargetMet).unwrap();
        assert_eq!(json["status"], "target-met");

        let json = serde_json::to_value(PriceStatus::AboveTarget {
            difference: 50.0,
            percentage: 10,
        })
        .unwrap();
        assert_eq!(json["status"], "above-target");
        assert_eq!(json["difference"], 50.0);
    }
}
