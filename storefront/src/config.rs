// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Which `Store` implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "pg" => Ok(StoreBackend::Postgres),
      "memory" | "mem" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!("Unknown STORE backend '{}'", other))),
    }
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store: StoreBackend,
  pub database_url: Option<String>,
  pub database_max_connections: u32,

  // Only ever reported as present/absent.
  pub anon_key: Option<String>,
  pub service_role_key: Option<String>,
  pub telegram_bot_token: Option<String>,

  pub webapp_url: Option<String>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable lookup. Empty values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or("SERVER_PORT", get("SERVER_PORT"), 8080u16)?;
    let store = match get("STORE") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Postgres,
    };
    let database_url = get("DATABASE_URL");
    if store == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORE=postgres)".to_string(),
      ));
    }
    let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 10u32)?;
    if database_max_connections == 0 {
      return Err(AppError::Config("DATABASE_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    let config = Self {
      server_host,
      server_port,
      store,
      database_url,
      database_max_connections,
      anon_key: get("SUPABASE_ANON_KEY"),
      service_role_key: get("SUPABASE_SERVICE_ROLE_KEY"),
      telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
      webapp_url: get("WEBAPP_URL"),
    };

    tracing::info!(config = ?config, "Application configuration loaded successfully.");
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: fmt::Display,
{
  match raw {
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
    None => Ok(default),
  }
}

fn redacted(value: &Option<String>) -> &'static str {
  if value.is_some() {
    "[REDACTED]"
  } else {
    "<unset>"
  }
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("store", &self.store)
      .field("database_url", &redacted(&self.database_url))
      .field("database_max_connections", &self.database_max_connections)
      .field("anon_key", &redacted(&self.anon_key))
      .field("service_role_key", &redacted(&self.service_role_key))
      .field("telegram_bot_token", &redacted(&self.telegram_bot_token))
      .field("webapp_url", &self.webapp_url)
      .finish()
  }
}
