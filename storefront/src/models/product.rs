// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Product {
  pub id: Uuid,
  pub title: String,
  pub description: Option<String>, // Description can be optional
  pub price_cents: i64,
  pub images: Vec<String>,
  pub category_id: Option<Uuid>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

impl Product {
  pub fn cover_image(&self) -> Option<&str> {
    self.images.first().map(String::as_str)
  }
}

pub const DEFAULT_PRODUCT_LIMIT: i64 = 50;
pub const MAX_PRODUCT_LIMIT: i64 = 100;

/// Filters for listing the active catalogue. Results are newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
  pub category_id: Option<Uuid>,
  pub search: Option<String>,
  pub limit: i64,
  pub offset: i64,
}

impl Default for ProductQuery {
  fn default() -> Self {
    Self {
      category_id: None,
      search: None,
      limit: DEFAULT_PRODUCT_LIMIT,
      offset: 0,
    }
  }
}

impl ProductQuery {
  /// Clamps `limit` into `1..=MAX_PRODUCT_LIMIT` and `offset` to be non-negative.
  pub fn normalized(mut self) -> Self {
    self.limit = self.limit.clamp(1, MAX_PRODUCT_LIMIT);
    self.offset = self.offset.max(0);
    self.search = self.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    self
  }

  pub fn matches(&self, product: &Product) -> bool {
    if !product.is_active {
      return false;
    }
    if let Some(category_id) = self.category_id {
      if product.category_id != Some(category_id) {
        return false;
      }
    }
    match &self.search {
      Some(needle) => product.title.to_lowercase().contains(&needle.to_lowercase()),
      None => true,
    }
  }
}
