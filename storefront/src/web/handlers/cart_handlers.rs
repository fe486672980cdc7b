// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::MAX_LINE_QUANTITY;
use crate::state::AppState;
use crate::web::extractors::TelegramIdentity;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemRequestPayload {
  pub item_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct RemoveCartItemQuery {
  #[serde(rename = "itemId")]
  pub item_id: Option<String>,
}

fn ensure_line_quantity(quantity: i32) -> Result<(), AppError> {
  if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
    warn!("Invalid quantity ({}) provided.", quantity);
    return Err(AppError::Validation(format!(
      "Quantity must be between 1 and {}.",
      MAX_LINE_QUANTITY
    )));
  }
  Ok(())
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(app_state), fields(telegram_id = identity.telegram_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let user = identity.resolve(&app_state).await?;
  let cart = app_state.store.cart_for_user(user.id).await?;
  let items = app_state.store.list_cart_lines(cart.id).await?;

  let total_cents: i64 = items.iter().map(|line| line.line_total_cents()).sum();
  let item_count: i64 = items.iter().map(|line| i64::from(line.quantity)).sum();

  Ok(HttpResponse::Ok().json(json!({
      "cart": cart,
      "items": items,
      "total_cents": total_cents,
      "item_count": item_count,
  })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload),
    fields(telegram_id = identity.telegram_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  ensure_line_quantity(payload.quantity)?;

  let user = identity.resolve(&app_state).await?;
  match app_state.store.get_product(payload.product_id).await? {
    Some(product) if product.is_active => {}
    _ => {
      warn!("Product {} not found or inactive.", payload.product_id);
      return Err(AppError::NotFound(format!(
        "Product with ID {} not found.",
        payload.product_id
      )));
    }
  }

  let cart = app_state.store.cart_for_user(user.id).await?;
  let item = app_state
    .store
    .add_cart_item(cart.id, payload.product_id, payload.quantity)
    .await?;

  info!(
    "Add to cart successful. Item ID: {}, Product ID: {}, New Quantity: {}",
    item.id, item.product_id, item.quantity
  );

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "item": item,
  })))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, req_payload),
    fields(telegram_id = identity.telegram_id, item_id = %req_payload.item_id, quantity = %req_payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<UpdateCartItemRequestPayload>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  ensure_line_quantity(payload.quantity)?;

  let user = identity.resolve(&app_state).await?;
  let cart = app_state.store.cart_for_user(user.id).await?;
  let item = app_state
    .store
    .set_cart_item_quantity(cart.id, payload.item_id, payload.quantity)
    .await?
    .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

  info!("Cart item {} quantity set to {}.", item.id, item.quantity);
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "item": item,
  })))
}

/// `DELETE /api/cart/remove?itemId=`. The item delete and the cart's
/// `updated_at` bump happen in one store call.
#[instrument(name = "handler::remove_from_cart", skip(app_state, query))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  query: web::Query<RemoveCartItemQuery>,
) -> Result<HttpResponse, AppError> {
  let raw_item_id = query
    .item_id
    .as_deref()
    .map(str::trim)
    .filter(|id| !id.is_empty())
    .ok_or_else(|| AppError::Validation("itemId is required".to_string()))?;
  let item_id = Uuid::parse_str(raw_item_id)
    .map_err(|_| AppError::Validation("itemId must be a valid UUID".to_string()))?;

  match app_state.store.remove_cart_item(item_id).await? {
    Some(removed) => {
      info!(item_id = %removed.id, cart_id = %removed.cart_id, "Cart item removed.");
      Ok(HttpResponse::Ok().json(json!({
          "success": true,
          "message": "Item removed from cart",
      })))
    }
    None => {
      warn!(%item_id, "Cart item not found for removal.");
      Err(AppError::NotFound("Cart item not found".to_string()))
    }
  }
}
