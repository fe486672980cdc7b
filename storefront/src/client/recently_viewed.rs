// storefront/src/client/recently_viewed.rs

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::storage::{KeyValueStore, StorageError};
use crate::models::Product;

pub const STORAGE_KEY: &str = "recently_viewed";
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// The product summary kept for the "recently viewed" carousel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewedProduct {
  pub id: Uuid,
  pub title: String,
  pub price_cents: i64,
  pub image: Option<String>,
}

impl From<&Product> for ViewedProduct {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      title: product.title.clone(),
      price_cents: product.price_cents,
      image: product.cover_image().map(str::to_string),
    }
  }
}

/// Most-recent-first list of viewed products, capped at `max_items`.
pub struct RecentlyViewed<S: KeyValueStore> {
  storage: S,
  max_items: usize,
}

impl<S: KeyValueStore> RecentlyViewed<S> {
  pub fn new(storage: S) -> Self {
    Self::with_capacity(storage, DEFAULT_MAX_ITEMS)
  }

  pub fn with_capacity(storage: S, max_items: usize) -> Self {
    Self {
      storage,
      max_items: max_items.max(1),
    }
  }

  pub fn max_items(&self) -> usize {
    self.max_items
  }

  /// Moves `product` to the front, dropping any older entry for the same id
  /// and anything past `max_items`.
  pub fn record(&self, product: ViewedProduct) -> Result<(), StorageError> {
    let mut items = self.load();
    items.retain(|item| item.id != product.id);
    items.insert(0, product);
    items.truncate(self.max_items);
    self.storage.set(STORAGE_KEY, serde_json::to_string(&items)?)
  }

  /// Up to `limit` items, most recently viewed first.
  pub fn get(&self, limit: usize) -> Vec<ViewedProduct> {
    let mut items = self.load();
    items.truncate(limit);
    items
  }

  pub fn clear(&self) -> Result<(), StorageError> {
    self.storage.remove(STORAGE_KEY)
  }

  // Unreadable or corrupt storage reads as empty; the next record overwrites it.
  fn load(&self) -> Vec<ViewedProduct> {
    let raw = match self.storage.get(STORAGE_KEY) {
      Ok(Some(raw)) => raw,
      Ok(None) => return Vec::new(),
      Err(e) => {
        warn!(error = %e, "Failed to read recently viewed products.");
        return Vec::new();
      }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
      warn!(error = %e, "Discarding corrupt recently viewed data.");
      Vec::new()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::storage::MemoryStorage;

  fn viewed(title: &str) -> ViewedProduct {
    ViewedProduct {
      id: Uuid::new_v4(),
      title: title.to_string(),
      price_cents: 1000,
      image: None,
    }
  }

  fn titles(items: &[ViewedProduct]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
  }

  #[test]
  fn get_returns_exactly_limit_items_newest_first() {
    let tracker = RecentlyViewed::new(MemoryStorage::new());
    for title in ["a", "b", "c", "d", "e", "f", "g", "h"] {
      tracker.record(viewed(title)).unwrap();
    }
    let recent = tracker.get(6);
    assert_eq!(recent.len(), 6);
    assert_eq!(titles(&recent), vec!["h", "g", "f", "e", "d", "c"]);
  }

  #[test]
  fn get_with_fewer_items_returns_all() {
    let tracker = RecentlyViewed::new(MemoryStorage::new());
    tracker.record(viewed("only")).unwrap();
    assert_eq!(tracker.get(6).len(), 1);
    assert!(tracker.get(0).is_empty());
  }

  #[test]
  fn viewing_again_moves_item_to_front_without_duplicates() {
    let tracker = RecentlyViewed::new(MemoryStorage::new());
    let first = viewed("first");
    tracker.record(first.clone()).unwrap();
    tracker.record(viewed("second")).unwrap();
    tracker.record(first).unwrap();
    assert_eq!(titles(&tracker.get(10)), vec!["first", "second"]);
  }

  #[test]
  fn list_is_truncated_at_capacity() {
    let tracker = RecentlyViewed::with_capacity(MemoryStorage::new(), 3);
    for title in ["a", "b", "c", "d", "e"] {
      tracker.record(viewed(title)).unwrap();
    }
    assert_eq!(titles(&tracker.get(10)), vec!["e", "d", "c"]);
  }

  #[test]
  fn corrupt_storage_reads_as_empty_and_recovers() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "not json".into()).unwrap();
    let tracker = RecentlyViewed::new(storage);
    assert!(tracker.get(6).is_empty());
    tracker.record(viewed("fresh")).unwrap();
    assert_eq!(titles(&tracker.get(6)), vec!["fresh"]);
  }

  #[test]
  fn clear_empties_the_list() {
    let tracker = RecentlyViewed::new(MemoryStorage::new());
    tracker.record(viewed("a")).unwrap();
    tracker.clear().unwrap();
    assert!(tracker.get(6).is_empty());
  }
}
