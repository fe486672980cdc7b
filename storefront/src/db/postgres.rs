// storefront/src/db/postgres.rs

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{escape_like, line_quantity_exceeded, price_checkout, CategoryFilter, CheckoutLine, Store};
use crate::errors::Result;
use crate::models::{
  Cart, CartItem, CartLine, Category, CheckoutDetails, Order, OrderItem, OrderSummary, OrderWithItems, Product,
  ProductQuery, TelegramProfile, TelegramUser, MAX_LINE_QUANTITY,
};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const CATEGORY_COLUMNS: &str = "id, name, description, image_url, sort_order, is_active, created_at";
const PRODUCT_COLUMNS: &str = "id, title, description, price_cents, images, category_id, is_active, created_at";
const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, created_at";
const ORDER_COLUMNS: &str =
  "id, telegram_user_id, status, total_cents, customer_name, phone, address, comment, created_at";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, title, quantity, price_cents";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Connects, then applies any pending migrations.
  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Successfully connected to the database.");
    MIGRATOR.run(&pool).await?;
    info!("Database migrations applied.");
    Ok(Self { pool })
  }

  pub fn from_pool(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  async fn items_for_orders(&self, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<OrderItem>>> {
    let items: Vec<OrderItem> = sqlx::query_as(&format!(
      "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, position"
    ))
    .bind(order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in items {
      grouped.entry(item.order_id).or_default().push(item);
    }
    Ok(grouped)
  }

  async fn attach_items(&self, orders: Vec<Order>) -> Result<Vec<OrderWithItems>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut grouped = self.items_for_orders(&ids).await?;
    Ok(
      orders
        .into_iter()
        .map(|order| {
          let items = grouped.remove(&order.id).unwrap_or_default();
          OrderWithItems { order, items }
        })
        .collect(),
    )
  }
}

#[async_trait]
impl Store for PgStore {
  #[instrument(skip(self))]
  async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CATEGORY_COLUMNS} FROM categories"));
    if filter.active_only {
      qb.push(" WHERE is_active = TRUE");
    }
    qb.push(" ORDER BY sort_order ASC");
    Ok(qb.build_query_as::<Category>().fetch_all(&self.pool).await?)
  }

  #[instrument(skip(self))]
  async fn count_active_products(&self, category_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
      "SELECT COUNT(*) FROM products WHERE category_id = $1 AND is_active = TRUE",
    )
    .bind(category_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(count)
  }

  #[instrument(skip(self))]
  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    let mut qb =
      QueryBuilder::<Postgres>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = TRUE"));
    if let Some(category_id) = query.category_id {
      qb.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(search) = &query.search {
      qb.push(" AND title ILIKE ").push_bind(format!("%{}%", escape_like(search)));
    }
    qb.push(" ORDER BY created_at DESC, id LIMIT ")
      .push_bind(query.limit)
      .push(" OFFSET ")
      .push_bind(query.offset);
    Ok(qb.build_query_as::<Product>().fetch_all(&self.pool).await?)
  }

  #[instrument(skip(self))]
  async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(skip(self), fields(telegram_id = profile.telegram_id))]
  async fn upsert_telegram_user(&self, profile: &TelegramProfile) -> Result<TelegramUser> {
    let user = sqlx::query_as(
      r#"
      INSERT INTO telegram_users (id, telegram_id, username, first_name, last_name, language_code)
      VALUES ($1, $2, $3, $4, $5, $6)
      ON CONFLICT (telegram_id) DO UPDATE SET
        username = EXCLUDED.username,
        first_name = EXCLUDED.first_name,
        last_name = EXCLUDED.last_name,
        language_code = EXCLUDED.language_code,
        updated_at = NOW()
      RETURNING id, telegram_id, username, first_name, last_name, language_code, created_at, updated_at
      "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile.telegram_id)
    .bind(&profile.username)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.language_code)
    .fetch_one(&self.pool)
    .await?;
    Ok(user)
  }

  #[instrument(skip(self))]
  async fn find_telegram_user(&self, telegram_id: i64) -> Result<Option<TelegramUser>> {
    let user = sqlx::query_as(
      "SELECT id, telegram_id, username, first_name, last_name, language_code, created_at, updated_at \
       FROM telegram_users WHERE telegram_id = $1",
    )
    .bind(telegram_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  #[instrument(skip(self))]
  async fn cart_for_user(&self, user_id: Uuid) -> Result<Cart> {
    // The no-op update makes RETURNING yield the existing row on conflict.
    let cart = sqlx::query_as(
      r#"
      INSERT INTO carts (id, telegram_user_id) VALUES ($1, $2)
      ON CONFLICT (telegram_user_id) DO UPDATE SET telegram_user_id = EXCLUDED.telegram_user_id
      RETURNING id, telegram_user_id, created_at, updated_at
      "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(cart)
  }

  #[instrument(skip(self))]
  async fn get_cart(&self, cart_id: Uuid) -> Result<Option<Cart>> {
    let cart = sqlx::query_as("SELECT id, telegram_user_id, created_at, updated_at FROM carts WHERE id = $1")
      .bind(cart_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  #[instrument(skip(self))]
  async fn list_cart_lines(&self, cart_id: Uuid) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as(
      r#"
      SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, p.title, p.price_cents, p.images[1] AS image
      FROM cart_items ci
      JOIN products p ON p.id = ci.product_id
      WHERE ci.cart_id = $1
      ORDER BY ci.created_at, ci.id
      "#,
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  #[instrument(skip(self))]
  async fn find_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>> {
    let item = sqlx::query_as(&format!("SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE id = $1"))
      .bind(item_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(item)
  }

  #[instrument(skip(self))]
  async fn add_cart_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
    if quantity > MAX_LINE_QUANTITY {
      return Err(line_quantity_exceeded());
    }
    let mut tx = self.pool.begin().await?;
    // The sum is widened to BIGINT so it cannot overflow before the bound check;
    // a conflicting row that fails the WHERE yields no row at all.
    let item: Option<CartItem> = sqlx::query_as(&format!(
      r#"
      INSERT INTO cart_items (id, cart_id, product_id, quantity) VALUES ($1, $2, $3, $4)
      ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
      WHERE cart_items.quantity::BIGINT + EXCLUDED.quantity::BIGINT <= $5
      RETURNING {CART_ITEM_COLUMNS}
      "#
    ))
    .bind(Uuid::new_v4())
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .bind(i64::from(MAX_LINE_QUANTITY))
    .fetch_optional(&mut *tx)
    .await?;
    let Some(item) = item else {
      return Err(line_quantity_exceeded());
    };
    touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(item)
  }

  #[instrument(skip(self))]
  async fn set_cart_item_quantity(&self, cart_id: Uuid, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
    let mut tx = self.pool.begin().await?;
    let item: Option<CartItem> = sqlx::query_as(&format!(
      "UPDATE cart_items SET quantity = $1 WHERE id = $2 AND cart_id = $3 RETURNING {CART_ITEM_COLUMNS}"
    ))
    .bind(quantity)
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(item) = item else {
      return Ok(None);
    };
    touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(Some(item))
  }

  #[instrument(skip(self))]
  async fn remove_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>> {
    let mut tx = self.pool.begin().await?;
    let removed: Option<CartItem> = sqlx::query_as(&format!(
      "DELETE FROM cart_items WHERE id = $1 RETURNING {CART_ITEM_COLUMNS}"
    ))
    .bind(item_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(item) = removed else {
      return Ok(None);
    };
    touch_cart(&mut tx, item.cart_id).await?;
    tx.commit().await?;
    Ok(Some(item))
  }

  #[instrument(skip(self))]
  async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<Product>> {
    let products = sqlx::query_as(
      r#"
      SELECT p.id, p.title, p.description, p.price_cents, p.images, p.category_id, p.is_active, p.created_at
      FROM wishlist_items w
      JOIN products p ON p.id = w.product_id
      WHERE w.telegram_user_id = $1 AND p.is_active = TRUE
      ORDER BY w.created_at DESC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  #[instrument(skip(self))]
  async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<()> {
    sqlx::query(
      "INSERT INTO wishlist_items (telegram_user_id, product_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(product_id)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  #[instrument(skip(self))]
  async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE telegram_user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(skip(self, details))]
  async fn place_order(&self, user_id: Uuid, cart_id: Uuid, details: &CheckoutDetails) -> Result<OrderWithItems> {
    let mut tx = self.pool.begin().await?;

    let lines: Vec<CheckoutLine> = sqlx::query_as(
      r#"
      SELECT ci.product_id, p.title, ci.quantity, p.price_cents, p.is_active
      FROM cart_items ci
      JOIN products p ON p.id = ci.product_id
      WHERE ci.cart_id = $1
      ORDER BY ci.created_at, ci.id
      FOR UPDATE OF ci
      "#,
    )
    .bind(cart_id)
    .fetch_all(&mut *tx)
    .await?;
    let total_cents = price_checkout(&lines)?;

    let order: Order = sqlx::query_as(&format!(
      r#"
      INSERT INTO orders (id, telegram_user_id, status, total_cents, customer_name, phone, address, comment)
      VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7)
      RETURNING {ORDER_COLUMNS}
      "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(total_cents)
    .bind(&details.customer_name)
    .bind(&details.phone)
    .bind(&details.address)
    .bind(&details.comment)
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (position, line) in lines.iter().enumerate() {
      let item: OrderItem = sqlx::query_as(&format!(
        r#"
        INSERT INTO order_items (id, order_id, product_id, title, quantity, price_cents, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {ORDER_ITEM_COLUMNS}
        "#
      ))
      .bind(Uuid::new_v4())
      .bind(order.id)
      .bind(line.product_id)
      .bind(&line.title)
      .bind(line.quantity)
      .bind(line.price_cents)
      .bind(position as i32)
      .fetch_one(&mut *tx)
      .await?;
      items.push(item);
    }

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;
    touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;

    info!(order_id = %order.id, total_cents, "Order placed.");
    Ok(OrderWithItems { order, items })
  }

  #[instrument(skip(self))]
  async fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
    let orders: Vec<Order> = sqlx::query_as(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE telegram_user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    self.attach_items(orders).await
  }

  #[instrument(skip(self))]
  async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<OrderWithItems>> {
    let order: Option<Order> = sqlx::query_as(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND telegram_user_id = $2"
    ))
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    match order {
      Some(order) => Ok(self.attach_items(vec![order]).await?.pop()),
      None => Ok(None),
    }
  }

  #[instrument(skip(self))]
  async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderSummary>> {
    let orders = sqlx::query_as(
      r#"
      SELECT o.id, o.telegram_user_id, o.status, o.total_cents, o.created_at, COUNT(oi.id) AS item_count
      FROM orders o
      LEFT JOIN order_items oi ON oi.order_id = o.id
      GROUP BY o.id
      ORDER BY o.created_at DESC
      LIMIT $1
      "#,
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }

  #[instrument(skip(self))]
  async fn count_orders(&self) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }
}

async fn touch_cart(tx: &mut sqlx::Transaction<'_, Postgres>, cart_id: Uuid) -> Result<()> {
  sqlx::query("UPDATE carts SET updated_at = NOW() WHERE id = $1")
    .bind(cart_id)
    .execute(&mut **tx)
    .await?;
  Ok(())
}
