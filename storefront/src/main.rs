// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;

use storefront::config::{AppConfig, StoreBackend};
use storefront::db::{MemoryStore, PgStore, Store};
use storefront::state::AppState;
use storefront::{telemetry, web};

async fn build_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
  match (config.store, config.database_url.as_deref()) {
    (StoreBackend::Postgres, Some(url)) => {
      let store = PgStore::connect(url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
      Ok(Arc::new(store))
    }
    // AppConfig::from_lookup rejects this combination already.
    (StoreBackend::Postgres, None) => anyhow::bail!("DATABASE_URL is not set"),
    (StoreBackend::Memory, _) => {
      tracing::warn!("Using the in-memory store with a demo catalogue; data is lost on exit.");
      Ok(Arc::new(MemoryStore::with_demo_catalog()))
    }
  }
}

#[actix_web::main]
async fn main() -> Result<()> {
  telemetry::init();
  tracing::info!("Starting storefront server...");

  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  let store = build_store(&app_config).await?;

  let server_address = app_config.bind_address();
  let app_state = AppState::new(store, app_config);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;
  Ok(())
}
