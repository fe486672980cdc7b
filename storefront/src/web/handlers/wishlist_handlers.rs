// storefront/src/web/handlers/wishlist_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::TelegramIdentity;

#[derive(Deserialize, Debug)]
pub struct AddToWishlistRequestPayload {
  pub product_id: Uuid,
}

#[instrument(name = "handler::list_wishlist", skip(app_state), fields(telegram_id = identity.telegram_id))]
pub async fn list_wishlist_handler(
  app_state: web::Data<AppState>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let user = identity.resolve(&app_state).await?;
  let items = app_state.store.list_wishlist(user.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

#[instrument(
    name = "handler::add_to_wishlist",
    skip(app_state, req_payload),
    fields(telegram_id = identity.telegram_id, product_id = %req_payload.product_id)
)]
pub async fn add_to_wishlist_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToWishlistRequestPayload>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let user = identity.resolve(&app_state).await?;
  let product_id = req_payload.product_id;
  match app_state.store.get_product(product_id).await? {
    Some(product) if product.is_active => {}
    _ => return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
  }

  app_state.store.add_to_wishlist(user.id, product_id).await?;
  info!("Product {} added to wishlist.", product_id);
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[instrument(
    name = "handler::remove_from_wishlist",
    skip(app_state, path),
    fields(telegram_id = identity.telegram_id, product_id = %path.as_ref())
)]
pub async fn remove_from_wishlist_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let user = identity.resolve(&app_state).await?;
  if !app_state.store.remove_from_wishlist(user.id, product_id).await? {
    return Err(AppError::NotFound("Product is not in the wishlist".to_string()));
  }
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
