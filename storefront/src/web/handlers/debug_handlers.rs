// storefront/src/web/handlers/debug_handlers.rs

//! Operator endpoints. They report what the server sees without exposing
//! any configured secret.

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::db::DEBUG_ORDER_LIMIT;
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::debug_orders", skip(app_state))]
pub async fn debug_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let (orders, total) = tokio::try_join!(
    app_state.store.recent_orders(DEBUG_ORDER_LIMIT),
    app_state.store.count_orders()
  )?;
  info!(returned = orders.len(), total, "Debug order listing.");
  Ok(HttpResponse::Ok().json(json!({
      "orders": orders,
      "total": total,
  })))
}

#[instrument(name = "handler::debug_telegram", skip(app_state))]
pub async fn debug_telegram_handler(app_state: web::Data<AppState>) -> HttpResponse {
  let config = &app_state.config;
  HttpResponse::Ok().json(json!({
      "bot_token_configured": config.telegram_bot_token.is_some(),
      "database_url_configured": config.database_url.is_some(),
      "anon_key_configured": config.anon_key.is_some(),
      "service_role_key_configured": config.service_role_key.is_some(),
      "webapp_url": config.webapp_url,
  }))
}
