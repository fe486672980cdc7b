// storefront/src/models/telegram_user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TelegramUser {
  pub id: Uuid,
  pub telegram_id: i64,
  pub username: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub language_code: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Profile fields the Mini App receives from Telegram and posts on sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TelegramProfile {
  pub telegram_id: i64,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub first_name: Option<String>,
  #[serde(default)]
  pub last_name: Option<String>,
  #[serde(default)]
  pub language_code: Option<String>,
}
