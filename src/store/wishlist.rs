//! Wishlist - saved books with optional price targets
//!
//! Items are keyed by id, with a secondary book id index that enforces at
//! most one item per book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::WishlistItem;

/// Caller-supplied fields for a new wishlist item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistDraft {
    pub book_id: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default = "default_true")]
    pub notify_on_drop: bool,
}

fn default_true() -> bool {
    true
}

impl WishlistDraft {
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            target_price: None,
            notify_on_drop: true,
        }
    }

    /// Builder: set target price
    pub fn target_price(mut self, price: f64) -> Self {
        self.target_price = Some(price);
        self
    }
}

/// Partial update for a wishlist item; absent fields are left unchanged
///
/// `target_price: Some(None)` clears the target.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistPatch {
    #[serde(default, deserialize_with = "present")]
    pub target_price: Option<Option<f64>>,
    #[serde(default)]
    pub notify_on_drop: Option<bool>,
    #[serde(default)]
    pub priority: Option<u32>,
}

/// Distinguish an explicit `null` from a missing field
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl WishlistPatch {
    fn apply(&self, item: &mut WishlistItem) {
        if let Some(target) = self.target_price {
            item.target_price = target;
        }
        if let Some(notify) = self.notify_on_drop {
            item.notify_on_drop = notify;
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
    }
}

/// What a toggle did
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
}

/// Result of toggling a book on the wishlist
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub item: WishlistItem,
}

impl ToggleOutcome {
    pub fn added(&self) -> bool {
        self.action == ToggleAction::Added
    }
}

/// In-memory wishlist
#[derive(Debug, Default)]
pub struct Wishlist {
    items: HashMap<String, WishlistItem>,
    /// Book id to item id
    by_book: HashMap<String, String>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing items; a second item for the same book or with a
    /// repeated id is dropped
    pub fn from_items(items: Vec<WishlistItem>) -> Self {
        let mut wishlist = Self::new();
        for item in items {
            if wishlist.items.contains_key(&item.id) {
                tracing::warn!(id = %item.id, book_id = %item.book_id, "Duplicate wishlist id in seed data, skipping");
                continue;
            }
            if wishlist.by_book.contains_key(&item.book_id) {
                tracing::warn!(book_id = %item.book_id, "Duplicate wishlist book in seed data, skipping");
                continue;
            }
            wishlist.by_book.insert(item.book_id.clone(), item.id.clone());
            wishlist.items.insert(item.id.clone(), item);
        }
        wishlist
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items ordered by priority, then date added
    pub fn all(&self) -> Vec<WishlistItem> {
        let mut items: Vec<WishlistItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.added_date.cmp(&b.added_date))
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    pub fn get(&self, id: &str) -> StoreResult<&WishlistItem> {
        self.items
            .get(id)
            .ok_or_else(|| StoreError::WishlistItemNotFound(id.to_string()))
    }

    pub fn contains_book(&self, book_id: &str) -> bool {
        self.by_book.contains_key(book_id)
    }

    pub fn item_for_book(&self, book_id: &str) -> Option<&WishlistItem> {
        self.by_book.get(book_id).and_then(|id| self.items.get(id))
    }

    /// Add a new item; fails with `Conflict` if the book is already saved
    pub fn create(&mut self, draft: WishlistDraft, id: String, now: DateTime<Utc>) -> StoreResult<WishlistItem> {
        if self.contains_book(&draft.book_id) {
            return Err(StoreError::Conflict(format!(
                "Book {} is already on the wishlist",
                draft.book_id
            )));
        }
        Ok(self.insert_new(draft, id, now))
    }

    fn insert_new(&mut self, draft: WishlistDraft, id: String, now: DateTime<Utc>) -> WishlistItem {
        let item = WishlistItem {
            id: id.clone(),
            book_id: draft.book_id,
            target_price: draft.target_price,
            added_date: now,
            notify_on_drop: draft.notify_on_drop,
            priority: self.items.len() as u32 + 1,
        };
        self.by_book.insert(item.book_id.clone(), id.clone());
        self.items.insert(id, item.clone());
        item
    }

    /// Merge a patch into an existing item
    pub fn update(&mut self, id: &str, patch: &WishlistPatch) -> StoreResult<WishlistItem> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::WishlistItemNotFound(id.to_string()))?;
        patch.apply(item);
        Ok(item.clone())
    }

    /// Remove an item by id, returning it
    pub fn remove(&mut self, id: &str) -> StoreResult<WishlistItem> {
        let item = self
            .items
            .remove(id)
            .ok_or_else(|| StoreError::WishlistItemNotFound(id.to_string()))?;
        self.by_book.remove(&item.book_id);
        Ok(item)
    }

    /// Add the book if absent, remove it if present
    ///
    /// `make_id` is only called when an item is added.
    pub fn toggle(
        &mut self,
        book_id: &str,
        target_price: Option<f64>,
        make_id: impl FnOnce() -> String,
        now: DateTime<Utc>,
    ) -> ToggleOutcome {
        if let Some(item_id) = self.by_book.get(book_id).cloned() {
            if let Ok(item) = self.remove(&item_id) {
                return ToggleOutcome {
                    action: ToggleAction::Removed,
                    item,
                };
            }
        }

        let draft = WishlistDraft {
            book_id: book_id.to_string(),
            target_price,
            notify_on_drop: true,
        };
        let item = self.insert_new(draft, make_id(), now);
        ToggleOutcome {
            action: ToggleAction::Added,
            item,
        }
    }
}
