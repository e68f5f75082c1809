//! API Routes
//!
//! Route handlers organized by functionality.

pub mod books;
pub mod budget;
pub mod health;
pub mod preferences;
pub mod wishlist;
