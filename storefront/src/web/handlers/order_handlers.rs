// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CheckoutDetails;
use crate::state::AppState;
use crate::web::extractors::TelegramIdentity;

/// Checkout: turns the caller's cart into a pending order.
#[instrument(name = "handler::place_order", skip(app_state, req_payload), fields(telegram_id = identity.telegram_id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutDetails>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let details = req_payload
    .into_inner()
    .normalized()
    .map_err(|field| AppError::Validation(format!("{} is required", field)))?;

  let user = identity.resolve(&app_state).await?;
  let cart = app_state.store.cart_for_user(user.id).await?;
  let order = app_state.store.place_order(user.id, cart.id, &details).await?;

  info!(
    order_id = %order.order.id,
    total_cents = order.order.total_cents,
    items = order.items.len(),
    "Checkout completed."
  );
  Ok(HttpResponse::Created().json(json!({ "order": order })))
}

#[instrument(name = "handler::list_orders", skip(app_state), fields(telegram_id = identity.telegram_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let user = identity.resolve(&app_state).await?;
  let orders = app_state.store.list_orders(user.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, path),
    fields(telegram_id = identity.telegram_id, order_id = %path.as_ref())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let user = identity.resolve(&app_state).await?;
  match app_state.store.get_order(user.id, order_id).await? {
    Some(order) => Ok(HttpResponse::Ok().json(json!({ "order": order }))),
    None => {
      warn!("Order {} not found for user {}.", order_id, user.id);
      Err(AppError::NotFound(format!("Order with ID {} not found.", order_id)))
    }
  }
}
