// storefront/src/db/memory.rs

//! In-process `Store` with the same semantics as the Postgres backend.
//! Each operation takes the table lock once, so multi-step mutations are atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use super::{line_quantity_exceeded, price_checkout, CategoryFilter, CheckoutLine, Store};
use crate::errors::Result;
use crate::models::{
  Cart, CartItem, CartLine, Category, CheckoutDetails, Order, OrderItem, OrderStatus, OrderSummary, OrderWithItems,
  Product, ProductQuery, TelegramProfile, TelegramUser, MAX_LINE_QUANTITY,
};

#[derive(Debug, Default)]
struct Tables {
  categories: Vec<Category>,
  products: Vec<Product>,
  users: Vec<TelegramUser>,
  carts: Vec<Cart>,
  cart_items: Vec<CartItem>,
  // (user, product, added_at)
  wishlist: Vec<(Uuid, Uuid, DateTime<Utc>)>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
}

impl Tables {
  fn product(&self, id: Uuid) -> Option<&Product> {
    self.products.iter().find(|p| p.id == id)
  }

  fn touch_cart(&mut self, cart_id: Uuid) {
    if let Some(cart) = self.carts.iter_mut().find(|c| c.id == cart_id) {
      cart.updated_at = Utc::now();
    }
  }

  fn with_items(&self, order: &Order) -> OrderWithItems {
    OrderWithItems {
      order: order.clone(),
      items: self.order_items.iter().filter(|i| i.order_id == order.id).cloned().collect(),
    }
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
  calls: AtomicUsize,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_category(&self, category: Category) {
    self.tables.write().categories.push(category);
  }

  pub fn insert_product(&self, product: Product) {
    self.tables.write().products.push(product);
  }

  /// Number of `Store` calls served so far.
  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  fn record_call(&self) {
    self.calls.fetch_add(1, Ordering::SeqCst);
  }

  /// A small catalogue for local runs with `STORE=memory`.
  pub fn with_demo_catalog() -> Self {
    let store = Self::new();
    let now = Utc::now();
    let categories = [("Apparel", 1, true), ("Accessories", 2, true), ("Archive", 3, false)];
    let mut ids = Vec::new();
    for (name, sort_order, is_active) in categories {
      let id = Uuid::new_v4();
      ids.push(id);
      store.insert_category(Category {
        id,
        name: name.to_string(),
        description: None,
        image_url: None,
        sort_order,
        is_active,
        created_at: now,
      });
    }
    let products = [
      ("Logo hoodie", 5900, 0),
      ("Everyday tee", 2400, 0),
      ("Canvas tote", 1800, 1),
      ("Enamel mug", 1500, 1),
    ];
    for (title, price_cents, category) in products {
      store.insert_product(Product {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        price_cents,
        images: vec![],
        category_id: Some(ids[category]),
        is_active: true,
        created_at: now,
      });
    }
    store
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
    self.record_call();
    let tables = self.tables.read();
    let mut categories: Vec<Category> = tables
      .categories
      .iter()
      .filter(|c| !filter.active_only || c.is_active)
      .cloned()
      .collect();
    categories.sort_by_key(|c| c.sort_order);
    Ok(categories)
  }

  async fn count_active_products(&self, category_id: Uuid) -> Result<i64> {
    self.record_call();
    let tables = self.tables.read();
    let count = tables
      .products
      .iter()
      .filter(|p| p.is_active && p.category_id == Some(category_id))
      .count();
    Ok(count as i64)
  }

  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    self.record_call();
    let tables = self.tables.read();
    let mut products: Vec<Product> = tables.products.iter().filter(|p| query.matches(p)).cloned().collect();
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    Ok(
      products
        .into_iter()
        .skip(query.offset.max(0) as usize)
        .take(query.limit.max(0) as usize)
        .collect(),
    )
  }

  async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    self.record_call();
    Ok(self.tables.read().product(product_id).cloned())
  }

  async fn upsert_telegram_user(&self, profile: &TelegramProfile) -> Result<TelegramUser> {
    self.record_call();
    let mut tables = self.tables.write();
    let now = Utc::now();
    if let Some(user) = tables.users.iter_mut().find(|u| u.telegram_id == profile.telegram_id) {
      user.username = profile.username.clone();
      user.first_name = profile.first_name.clone();
      user.last_name = profile.last_name.clone();
      user.language_code = profile.language_code.clone();
      user.updated_at = now;
      return Ok(user.clone());
    }
    let user = TelegramUser {
      id: Uuid::new_v4(),
      telegram_id: profile.telegram_id,
      username: profile.username.clone(),
      first_name: profile.first_name.clone(),
      last_name: profile.last_name.clone(),
      language_code: profile.language_code.clone(),
      created_at: now,
      updated_at: now,
    };
    tables.users.push(user.clone());
    Ok(user)
  }

  async fn find_telegram_user(&self, telegram_id: i64) -> Result<Option<TelegramUser>> {
    self.record_call();
    Ok(self.tables.read().users.iter().find(|u| u.telegram_id == telegram_id).cloned())
  }

  async fn cart_for_user(&self, user_id: Uuid) -> Result<Cart> {
    self.record_call();
    let mut tables = self.tables.write();
    if let Some(cart) = tables.carts.iter().find(|c| c.telegram_user_id == Some(user_id)) {
      return Ok(cart.clone());
    }
    let now = Utc::now();
    let cart = Cart {
      id: Uuid::new_v4(),
      telegram_user_id: Some(user_id),
      created_at: now,
      updated_at: now,
    };
    tables.carts.push(cart.clone());
    Ok(cart)
  }

  async fn get_cart(&self, cart_id: Uuid) -> Result<Option<Cart>> {
    self.record_call();
    Ok(self.tables.read().carts.iter().find(|c| c.id == cart_id).cloned())
  }

  async fn list_cart_lines(&self, cart_id: Uuid) -> Result<Vec<CartLine>> {
    self.record_call();
    let tables = self.tables.read();
    let lines = tables
      .cart_items
      .iter()
      .filter(|i| i.cart_id == cart_id)
      .filter_map(|item| {
        let product = tables.product(item.product_id)?;
        Some(CartLine {
          id: item.id,
          cart_id: item.cart_id,
          product_id: item.product_id,
          quantity: item.quantity,
          title: product.title.clone(),
          price_cents: product.price_cents,
          image: product.cover_image().map(str::to_string),
        })
      })
      .collect();
    Ok(lines)
  }

  async fn find_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>> {
    self.record_call();
    Ok(self.tables.read().cart_items.iter().find(|i| i.id == item_id).cloned())
  }

  async fn add_cart_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
    self.record_call();
    if quantity > MAX_LINE_QUANTITY {
      return Err(line_quantity_exceeded());
    }
    let mut tables = self.tables.write();
    let existing = tables
      .cart_items
      .iter_mut()
      .find(|i| i.cart_id == cart_id && i.product_id == product_id);
    let item = match existing {
      Some(item) => {
        item.quantity = item
          .quantity
          .checked_add(quantity)
          .filter(|q| *q <= MAX_LINE_QUANTITY)
          .ok_or_else(line_quantity_exceeded)?;
        item.clone()
      }
      None => {
        let item = CartItem {
          id: Uuid::new_v4(),
          cart_id,
          product_id,
          quantity,
          created_at: Utc::now(),
        };
        tables.cart_items.push(item.clone());
        item
      }
    };
    tables.touch_cart(cart_id);
    Ok(item)
  }

  async fn set_cart_item_quantity(&self, cart_id: Uuid, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
    self.record_call();
    let mut tables = self.tables.write();
    let Some(item) = tables
      .cart_items
      .iter_mut()
      .find(|i| i.id == item_id && i.cart_id == cart_id)
    else {
      return Ok(None);
    };
    item.quantity = quantity;
    let item = item.clone();
    tables.touch_cart(cart_id);
    Ok(Some(item))
  }

  async fn remove_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>> {
    self.record_call();
    let mut tables = self.tables.write();
    let Some(index) = tables.cart_items.iter().position(|i| i.id == item_id) else {
      return Ok(None);
    };
    let item = tables.cart_items.remove(index);
    tables.touch_cart(item.cart_id);
    Ok(Some(item))
  }

  async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<Product>> {
    self.record_call();
    let tables = self.tables.read();
    let mut entries: Vec<&(Uuid, Uuid, DateTime<Utc>)> =
      tables.wishlist.iter().filter(|(user, _, _)| *user == user_id).collect();
    // Stable sort keeps insertion order for equal timestamps; reverse for newest first.
    entries.sort_by_key(|(_, _, added_at)| *added_at);
    entries.reverse();
    Ok(
      entries
        .into_iter()
        .filter_map(|(_, product_id, _)| tables.product(*product_id))
        .filter(|p| p.is_active)
        .cloned()
        .collect(),
    )
  }

  async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<()> {
    self.record_call();
    let mut tables = self.tables.write();
    if !tables.wishlist.iter().any(|(u, p, _)| *u == user_id && *p == product_id) {
      tables.wishlist.push((user_id, product_id, Utc::now()));
    }
    Ok(())
  }

  async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
    self.record_call();
    let mut tables = self.tables.write();
    let before = tables.wishlist.len();
    tables.wishlist.retain(|(u, p, _)| !(*u == user_id && *p == product_id));
    Ok(tables.wishlist.len() != before)
  }

  async fn place_order(&self, user_id: Uuid, cart_id: Uuid, details: &CheckoutDetails) -> Result<OrderWithItems> {
    self.record_call();
    let mut tables = self.tables.write();

    let lines: Vec<CheckoutLine> = tables
      .cart_items
      .iter()
      .filter(|i| i.cart_id == cart_id)
      .filter_map(|item| {
        let product = tables.product(item.product_id)?;
        Some(CheckoutLine {
          product_id: item.product_id,
          title: product.title.clone(),
          quantity: item.quantity,
          price_cents: product.price_cents,
          is_active: product.is_active,
        })
      })
      .collect();
    let total_cents = price_checkout(&lines)?;

    let order = Order {
      id: Uuid::new_v4(),
      telegram_user_id: Some(user_id),
      status: OrderStatus::Pending,
      total_cents,
      customer_name: details.customer_name.clone(),
      phone: details.phone.clone(),
      address: details.address.clone(),
      comment: details.comment.clone(),
      created_at: Utc::now(),
    };
    let items: Vec<OrderItem> = lines
      .into_iter()
      .map(|line| OrderItem {
        id: Uuid::new_v4(),
        order_id: order.id,
        product_id: line.product_id,
        title: line.title,
        quantity: line.quantity,
        price_cents: line.price_cents,
      })
      .collect();

    tables.orders.push(order.clone());
    tables.order_items.extend(items.iter().cloned());
    tables.cart_items.retain(|i| i.cart_id != cart_id);
    tables.touch_cart(cart_id);
    Ok(OrderWithItems { order, items })
  }

  async fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
    self.record_call();
    let tables = self.tables.read();
    let mut orders: Vec<&Order> = tables.orders.iter().filter(|o| o.telegram_user_id == Some(user_id)).collect();
    orders.sort_by_key(|o| o.created_at);
    orders.reverse();
    Ok(orders.into_iter().map(|o| tables.with_items(o)).collect())
  }

  async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<OrderWithItems>> {
    self.record_call();
    let tables = self.tables.read();
    Ok(
      tables
        .orders
        .iter()
        .find(|o| o.id == order_id && o.telegram_user_id == Some(user_id))
        .map(|o| tables.with_items(o)),
    )
  }

  async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderSummary>> {
    self.record_call();
    let tables = self.tables.read();
    let mut orders: Vec<&Order> = tables.orders.iter().collect();
    orders.sort_by_key(|o| o.created_at);
    orders.reverse();
    Ok(
      orders
        .into_iter()
        .take(limit.max(0) as usize)
        .map(|o| OrderSummary {
          id: o.id,
          telegram_user_id: o.telegram_user_id,
          status: o.status,
          total_cents: o.total_cents,
          created_at: o.created_at,
          item_count: tables.order_items.iter().filter(|i| i.order_id == o.id).count() as i64,
        })
        .collect(),
    )
  }

  async fn count_orders(&self) -> Result<i64> {
    self.record_call();
    Ok(self.tables.read().orders.len() as i64)
  }
}
