// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, SqlxType, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Order {
  pub id: Uuid,
  pub telegram_user_id: Option<Uuid>,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub customer_name: String,
  pub phone: String,
  pub address: Option<String>,
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Line items are immutable snapshots of the product at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub title: String,
  pub quantity: i32,
  pub price_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

/// Row shape of the debug listing: an order plus how many line items it has.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct OrderSummary {
  pub id: Uuid,
  pub telegram_user_id: Option<Uuid>,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub created_at: DateTime<Utc>,
  pub item_count: i64,
}

/// Contact details collected on the checkout screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutDetails {
  pub customer_name: String,
  pub phone: String,
  #[serde(default)]
  pub address: Option<String>,
  #[serde(default)]
  pub comment: Option<String>,
}

impl CheckoutDetails {
  /// Trims every field, turning blank optionals into `None`.
  /// Returns the name of the first required field that is blank.
  pub fn normalized(self) -> Result<Self, &'static str> {
    let customer_name = self.customer_name.trim().to_string();
    let phone = self.phone.trim().to_string();
    if customer_name.is_empty() {
      return Err("customer_name");
    }
    if phone.is_empty() {
      return Err("phone");
    }
    let tidy = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Ok(Self {
      customer_name,
      phone,
      address: tidy(self.address),
      comment: tidy(self.comment),
    })
  }
}
