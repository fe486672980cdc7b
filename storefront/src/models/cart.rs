// storefront/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Cart {
  pub id: Uuid,
  pub telegram_user_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
  // Bumped in the same transaction as every item mutation.
  pub updated_at: DateTime<Utc>,
}

/// Upper bound on the quantity of a single cart line, enforced on add and update.
pub const MAX_LINE_QUANTITY: i32 = 999;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CartItem {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub created_at: DateTime<Utc>,
}

/// A cart item joined with the product fields the cart screen shows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CartLine {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub title: String,
  pub price_cents: i64,
  pub image: Option<String>,
}

impl CartLine {
  pub fn line_total_cents(&self) -> i64 {
    self.price_cents * i64::from(self.quantity)
  }
}
