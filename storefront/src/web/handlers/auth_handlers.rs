// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::TelegramProfile;
use crate::state::AppState;
use crate::web::extractors::TelegramIdentity;

/// Registers (or refreshes) the Telegram user the Mini App was opened by.
#[instrument(
    name = "handler::telegram_sign_in",
    skip(app_state, req_payload),
    fields(telegram_id = req_payload.telegram_id)
)]
pub async fn telegram_sign_in_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<TelegramProfile>,
) -> Result<HttpResponse, AppError> {
  let profile = req_payload.into_inner();
  if profile.telegram_id <= 0 {
    return Err(AppError::Validation("telegram_id must be a positive integer".to_string()));
  }

  let user = app_state.store.upsert_telegram_user(&profile).await?;
  info!(user_id = %user.id, "Telegram user signed in.");

  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[instrument(name = "handler::me", skip(app_state), fields(telegram_id = identity.telegram_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  identity: TelegramIdentity,
) -> Result<HttpResponse, AppError> {
  let user = identity.resolve(&app_state).await?;
  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
