// storefront/src/web/extractors.rs

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use tracing::warn;

use crate::errors::{AppError, Result};
use crate::models::TelegramUser;
use crate::state::AppState;

/// Header the Mini App sends with the signed-in Telegram user's id.
pub const TELEGRAM_USER_HEADER: &str = "X-Telegram-User-Id";

/// The caller's Telegram id, taken from `X-Telegram-User-Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelegramIdentity {
  pub telegram_id: i64,
}

impl TelegramIdentity {
  fn parse(req: &HttpRequest) -> Result<Self> {
    let raw = req
      .headers()
      .get(TELEGRAM_USER_HEADER)
      .and_then(|value| value.to_str().ok())
      .map(str::trim)
      .ok_or_else(|| AppError::Auth(format!("Missing {} header", TELEGRAM_USER_HEADER)))?;
    match raw.parse::<i64>() {
      Ok(telegram_id) if telegram_id > 0 => Ok(TelegramIdentity { telegram_id }),
      _ => {
        warn!(header_value = raw, "TelegramIdentity extractor: invalid header.");
        Err(AppError::Auth(format!("Invalid {} header", TELEGRAM_USER_HEADER)))
      }
    }
  }

  /// Looks up the registered user behind this identity.
  pub async fn resolve(&self, app_state: &AppState) -> Result<TelegramUser> {
    app_state
      .store
      .find_telegram_user(self.telegram_id)
      .await?
      .ok_or_else(|| AppError::Auth("Unknown Telegram user. Sign in first.".to_string()))
  }
}

impl FromRequest for TelegramIdentity {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    futures_util::future::ready(Self::parse(req))
  }
}
