// storefront/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod cart_handlers;
pub mod category_handlers;
pub mod debug_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod theme_handlers;
pub mod wishlist_handlers;

/// Query flags are only enabled by the exact string `true`.
pub(crate) fn query_flag(value: &Option<String>) -> bool {
  value.as_deref() == Some("true")
}
