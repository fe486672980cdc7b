// tests/postgres_tests.rs
//! Runs `PgStore` against the database named by `DATABASE_URL`. Every test
//! returns early when the variable is unset.
mod common;

use serial_test::serial;
use uuid::Uuid;

use storefront::db::{PgStore, Store};
use storefront::models::{CheckoutDetails, TelegramProfile, TelegramUser, MAX_LINE_QUANTITY};
use storefront::AppError;

async fn pg_store() -> Option<PgStore> {
  common::setup_tracing();
  let url = match std::env::var("DATABASE_URL") {
    Ok(url) if !url.trim().is_empty() => url,
    _ => {
      eprintln!("DATABASE_URL is not set; skipping Postgres test");
      return None;
    }
  };
  Some(PgStore::connect(&url, 2).await.expect("connect to DATABASE_URL"))
}

async fn insert_product(store: &PgStore, title: &str, price_cents: i64, is_active: bool) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO products (id, title, price_cents, images, is_active) VALUES ($1, $2, $3, $4, $5)")
    .bind(id)
    .bind(title)
    .bind(price_cents)
    .bind(vec![format!("https://cdn.example/{}.jpg", id)])
    .bind(is_active)
    .execute(store.pool())
    .await
    .expect("insert product");
  id
}

async fn new_user(store: &PgStore) -> TelegramUser {
  // Distinct per run so repeated runs against the same database never collide.
  let telegram_id = (Uuid::new_v4().as_u128() % 1_000_000_000_000) as i64 + 1;
  store
    .upsert_telegram_user(&TelegramProfile {
      telegram_id,
      ..Default::default()
    })
    .await
    .expect("upsert user")
}

fn details() -> CheckoutDetails {
  CheckoutDetails {
    customer_name: "Ada Lovelace".into(),
    phone: "+44 20 0000 0000".into(),
    address: None,
    comment: None,
  }
}

#[actix_web::test]
#[serial(postgres)]
async fn remove_cart_item_deletes_and_touches_only_when_present() {
  let Some(store) = pg_store().await else { return };
  let user = new_user(&store).await;
  let cart = store.cart_for_user(user.id).await.unwrap();
  let product = insert_product(&store, "Pg mug", 1200, true).await;
  let item = store.add_cart_item(cart.id, product, 2).await.unwrap();
  let stamp_after_add = store.get_cart(cart.id).await.unwrap().unwrap().updated_at;

  assert!(store.remove_cart_item(Uuid::new_v4()).await.unwrap().is_none());
  let untouched = store.get_cart(cart.id).await.unwrap().unwrap().updated_at;
  assert_eq!(untouched, stamp_after_add);

  let removed = store.remove_cart_item(item.id).await.unwrap().expect("item removed");
  assert_eq!(removed.id, item.id);
  assert!(store.find_cart_item(item.id).await.unwrap().is_none());
  let touched = store.get_cart(cart.id).await.unwrap().unwrap().updated_at;
  assert!(touched >= stamp_after_add);
}

#[actix_web::test]
#[serial(postgres)]
async fn place_order_snapshots_lines_and_empties_the_cart() {
  let Some(store) = pg_store().await else { return };
  let user = new_user(&store).await;
  let cart = store.cart_for_user(user.id).await.unwrap();

  let err = store.place_order(user.id, cart.id, &details()).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(m) if m == "Cart is empty"));

  let kettle = insert_product(&store, "Pg kettle", 4500, true).await;
  let spoon = insert_product(&store, "Pg spoon", 300, true).await;
  store.add_cart_item(cart.id, kettle, 1).await.unwrap();
  store.add_cart_item(cart.id, spoon, 4).await.unwrap();

  let placed = store.place_order(user.id, cart.id, &details()).await.unwrap();
  assert_eq!(placed.order.total_cents, 4500 + 4 * 300);
  let titles: Vec<_> = placed.items.iter().map(|i| i.title.as_str()).collect();
  assert_eq!(titles, vec!["Pg kettle", "Pg spoon"]);
  assert!(store.list_cart_lines(cart.id).await.unwrap().is_empty());

  let fetched = store.get_order(user.id, placed.order.id).await.unwrap().expect("order");
  assert_eq!(fetched, placed);
  let stranger = new_user(&store).await;
  assert!(store.get_order(stranger.id, placed.order.id).await.unwrap().is_none());
}

#[actix_web::test]
#[serial(postgres)]
async fn place_order_refuses_inactive_products() {
  let Some(store) = pg_store().await else { return };
  let user = new_user(&store).await;
  let cart = store.cart_for_user(user.id).await.unwrap();
  let retired = insert_product(&store, "Pg retired", 100, false).await;
  store.add_cart_item(cart.id, retired, 1).await.unwrap();

  let err = store.place_order(user.id, cart.id, &details()).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(m) if m.contains("Pg retired")));
  assert_eq!(store.list_cart_lines(cart.id).await.unwrap().len(), 1);
}

#[actix_web::test]
#[serial(postgres)]
async fn add_cart_item_rejects_a_merge_past_the_line_limit() {
  let Some(store) = pg_store().await else { return };
  let user = new_user(&store).await;
  let cart = store.cart_for_user(user.id).await.unwrap();
  let product = insert_product(&store, "Pg plate", 900, true).await;

  store.add_cart_item(cart.id, product, MAX_LINE_QUANTITY).await.unwrap();
  let err = store.add_cart_item(cart.id, product, 1).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
  let err = store.add_cart_item(cart.id, product, i32::MAX).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));

  let lines = store.list_cart_lines(cart.id).await.unwrap();
  assert_eq!(lines[0].quantity, MAX_LINE_QUANTITY);
}
