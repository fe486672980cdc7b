// storefront/src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub sort_order: i32,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

/// A category as returned by `GET /api/categories?includeProducts=true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryWithCount {
  #[serde(flatten)]
  pub category: Category,
  pub product_count: i64,
}
