// storefront/src/db/mod.rs

//! The table-level operations the API handlers run. Every handler talks to a
//! `dyn Store`; `PgStore` is the production backend and `MemoryStore` mirrors
//! its semantics in process.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{
  Cart, CartItem, CartLine, Category, CheckoutDetails, OrderSummary, OrderWithItems, Product, ProductQuery,
  TelegramProfile, TelegramUser, MAX_LINE_QUANTITY,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// How many orders the debug listing returns.
pub const DEBUG_ORDER_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
  pub active_only: bool,
}

#[async_trait]
pub trait Store: Send + Sync {
  // --- Catalogue ---

  /// Categories ordered by `sort_order` ascending.
  async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>>;
  /// Number of active products referencing the category.
  async fn count_active_products(&self, category_id: Uuid) -> Result<i64>;
  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;
  /// Returns the product regardless of `is_active`; callers decide visibility.
  async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>>;

  // --- Users ---

  async fn upsert_telegram_user(&self, profile: &TelegramProfile) -> Result<TelegramUser>;
  async fn find_telegram_user(&self, telegram_id: i64) -> Result<Option<TelegramUser>>;

  // --- Cart ---

  async fn cart_for_user(&self, user_id: Uuid) -> Result<Cart>;
  async fn get_cart(&self, cart_id: Uuid) -> Result<Option<Cart>>;
  async fn list_cart_lines(&self, cart_id: Uuid) -> Result<Vec<CartLine>>;
  async fn find_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>>;
  /// Adds `quantity` to the existing line for the product, or inserts a new one.
  /// Fails with a validation error when the merged quantity would exceed `MAX_LINE_QUANTITY`.
  async fn add_cart_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem>;
  /// `None` when no such item exists in the given cart.
  async fn set_cart_item_quantity(&self, cart_id: Uuid, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>>;
  /// Deletes the item and bumps its cart's `updated_at` atomically.
  /// `None` (and no mutation) when the item does not exist.
  async fn remove_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>>;

  // --- Wishlist ---

  async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<Product>>;
  async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<()>;
  /// `false` when the product was not in the wishlist.
  async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<bool>;

  // --- Orders ---

  /// Turns the cart into a pending order and empties it, in one transaction.
  async fn place_order(&self, user_id: Uuid, cart_id: Uuid, details: &CheckoutDetails) -> Result<OrderWithItems>;
  async fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>>;
  async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<OrderWithItems>>;
  async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderSummary>>;
  async fn count_orders(&self) -> Result<i64>;
}

/// A cart line as seen at checkout time, with the product's current state.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CheckoutLine {
  pub product_id: Uuid,
  pub title: String,
  pub quantity: i32,
  pub price_cents: i64,
  pub is_active: bool,
}

/// Validates the lines a checkout would turn into order items and returns the order total.
pub(crate) fn price_checkout(lines: &[CheckoutLine]) -> Result<i64> {
  if lines.is_empty() {
    return Err(AppError::Validation("Cart is empty".to_string()));
  }
  if let Some(gone) = lines.iter().find(|line| !line.is_active) {
    return Err(AppError::Validation(format!("Product '{}' is no longer available", gone.title)));
  }
  Ok(lines.iter().map(|line| line.price_cents * i64::from(line.quantity)).sum())
}

/// Raised when adding to an existing line would push it past `MAX_LINE_QUANTITY`.
pub(crate) fn line_quantity_exceeded() -> AppError {
  AppError::Validation(format!("A cart line cannot hold more than {} units", MAX_LINE_QUANTITY))
}

/// Escapes `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
pub(crate) fn escape_like(input: &str) -> String {
  let mut escaped = String::with_capacity(input.len());
  for ch in input.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(title: &str, quantity: i32, price_cents: i64, is_active: bool) -> CheckoutLine {
    CheckoutLine {
      product_id: Uuid::new_v4(),
      title: title.to_string(),
      quantity,
      price_cents,
      is_active,
    }
  }

  #[test]
  fn total_is_quantity_times_price() {
    let total = price_checkout(&[line("Mug", 2, 1250, true), line("Tee", 1, 1999, true)]).unwrap();
    assert_eq!(total, 4499);
  }

  #[test]
  fn empty_cart_is_rejected() {
    assert!(matches!(price_checkout(&[]), Err(AppError::Validation(m)) if m == "Cart is empty"));
  }

  #[test]
  fn inactive_product_blocks_checkout() {
    let err = price_checkout(&[line("Mug", 1, 100, true), line("Retired cap", 1, 100, false)]).unwrap_err();
    assert!(matches!(err, AppError::Validation(m) if m.contains("Retired cap")));
  }

  #[test]
  fn like_metacharacters_are_escaped() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_like("plain"), "plain");
  }
}
