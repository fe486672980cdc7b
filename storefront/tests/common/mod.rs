// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Once};
use uuid::Uuid;

use storefront::config::AppConfig;
use storefront::db::{MemoryStore, Store};
use storefront::models::{Category, Product, TelegramProfile, TelegramUser};
use storefront::state::AppState;

pub use storefront::web::extractors::TELEGRAM_USER_HEADER as USER_HEADER;

/// Builds the `/api` service over the given `AppState`.
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .configure(storefront::web::configure_app_routes),
    )
    .await
  };
}

static TRACING: Once = Once::new();

pub fn setup_tracing() {
  TRACING.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::new("storefront=debug"))
      .with_test_writer()
      .try_init();
  });
}

pub fn test_config(extra: &[(&str, &str)]) -> AppConfig {
  let mut vars: HashMap<String, String> = HashMap::new();
  vars.insert("STORE".into(), "memory".into());
  for (k, v) in extra {
    vars.insert(k.to_string(), v.to_string());
  }
  AppConfig::from_lookup(move |name| vars.get(name).cloned()).expect("test config")
}

pub fn category(name: &str, sort_order: i32, is_active: bool) -> Category {
  Category {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: None,
    image_url: None,
    sort_order,
    is_active,
    created_at: Utc::now(),
  }
}

pub fn product(title: &str, price_cents: i64, category_id: Option<Uuid>, is_active: bool, age_minutes: i64) -> Product {
  Product {
    id: Uuid::new_v4(),
    title: title.to_string(),
    description: None,
    price_cents,
    images: vec![format!("https://cdn.example/{}.jpg", title.to_lowercase().replace(' ', "-"))],
    category_id,
    is_active,
    created_at: Utc::now() - Duration::minutes(age_minutes),
  }
}

pub struct Fixture {
  pub store: Arc<MemoryStore>,
  pub state: AppState,
  pub archive: Category,
  pub accessories: Category,
  pub apparel: Category,
  pub hoodie: Product,
  pub tee: Product,
  pub retired_cap: Product,
  pub tote: Product,
}

/// Categories: Archive (inactive, sort 0), Accessories (sort 1), Apparel (sort 2), Empty (sort 3).
/// Apparel holds two active products and one inactive one; Accessories holds one.
pub fn seeded() -> Fixture {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());

  let apparel = category("Apparel", 2, true);
  let archive = category("Archive", 0, false);
  let accessories = category("Accessories", 1, true);
  let empty = category("Empty", 3, true);
  for c in [&apparel, &archive, &accessories, &empty] {
    store.insert_category(c.clone());
  }

  let hoodie = product("Logo hoodie", 5900, Some(apparel.id), true, 30);
  let tee = product("Everyday tee", 2400, Some(apparel.id), true, 20);
  let retired_cap = product("Retired cap", 1500, Some(apparel.id), false, 10);
  let tote = product("Canvas tote", 1800, Some(accessories.id), true, 5);
  for p in [&hoodie, &tee, &retired_cap, &tote] {
    store.insert_product(p.clone());
  }

  let state = AppState::new(store.clone() as Arc<dyn Store>, test_config(&[]));
  Fixture {
    store,
    state,
    archive,
    accessories,
    apparel,
    hoodie,
    tee,
    retired_cap,
    tote,
  }
}

pub async fn sign_in(fixture: &Fixture, telegram_id: i64) -> TelegramUser {
  fixture
    .store
    .upsert_telegram_user(&TelegramProfile {
      telegram_id,
      username: Some(format!("user{}", telegram_id)),
      ..Default::default()
    })
    .await
    .expect("upsert user")
}
