// storefront/src/client/state.rs

//! Shared client state for the cart, wishlist and signed-in user. Every
//! mutation goes to the server first; local state only changes from a
//! successful response.

use tracing::debug;
use uuid::Uuid;

use super::api::{ApiClient, CartView, ClientResult};
use super::telegram::{ImpactStyle, NotificationType, TelegramBridge};
use crate::models::{Cart, CartLine, CheckoutDetails, OrderWithItems, Product, TelegramProfile, TelegramUser};

/// Records the outcome of an operation in `error`: the failure message, or
/// cleared on success.
fn track<T>(error: &mut Option<String>, result: ClientResult<T>) -> ClientResult<T> {
  match &result {
    Ok(_) => *error = None,
    Err(e) => {
      debug!(error = %e, "Client operation failed.");
      *error = Some(e.to_string());
    }
  }
  result
}

// --- Cart ---

pub struct CartState {
  api: ApiClient,
  bridge: TelegramBridge,
  cart: Option<Cart>,
  items: Vec<CartLine>,
  error: Option<String>,
}

impl CartState {
  pub fn new(api: ApiClient) -> Self {
    Self {
      api,
      bridge: TelegramBridge::detached(),
      cart: None,
      items: Vec::new(),
      error: None,
    }
  }

  pub fn with_bridge(mut self, bridge: TelegramBridge) -> Self {
    self.bridge = bridge;
    self
  }

  pub fn cart(&self) -> Option<&Cart> {
    self.cart.as_ref()
  }

  pub fn items(&self) -> &[CartLine] {
    &self.items
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn total_cents(&self) -> i64 {
    self.items.iter().map(CartLine::line_total_cents).sum()
  }

  pub fn item_count(&self) -> i64 {
    self.items.iter().map(|line| i64::from(line.quantity)).sum()
  }

  pub fn contains(&self, product_id: Uuid) -> bool {
    self.items.iter().any(|line| line.product_id == product_id)
  }

  fn apply(&mut self, view: CartView) {
    self.cart = Some(view.cart);
    self.items = view.items;
  }

  pub async fn refresh(&mut self) -> ClientResult<()> {
    let result = self.api.cart().await.map(|view| self.apply(view));
    track(&mut self.error, result)
  }

  /// Adds to the cart, then reloads it so titles and prices come from the server.
  pub async fn add(&mut self, product_id: Uuid, quantity: i32) -> ClientResult<()> {
    let result = match self.api.add_to_cart(product_id, quantity).await {
      Ok(_) => self.api.cart().await.map(|view| self.apply(view)),
      Err(e) => Err(e),
    };
    match &result {
      Ok(()) => self.bridge.impact(ImpactStyle::Light),
      Err(_) => self.bridge.notify(NotificationType::Error),
    }
    track(&mut self.error, result)
  }

  pub async fn update_quantity(&mut self, item_id: Uuid, quantity: i32) -> ClientResult<()> {
    let result = self.api.update_cart_item(item_id, quantity).await.map(|item| {
      if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
        line.quantity = item.quantity;
      }
    });
    if result.is_ok() {
      self.bridge.selection_changed();
    }
    track(&mut self.error, result)
  }

  pub async fn remove(&mut self, item_id: Uuid) -> ClientResult<()> {
    let result = self
      .api
      .remove_cart_item(item_id)
      .await
      .map(|_| self.items.retain(|line| line.id != item_id));
    track(&mut self.error, result)
  }

  /// Places an order from the current cart. The server empties the cart, and so does this.
  pub async fn checkout(&mut self, details: &CheckoutDetails) -> ClientResult<OrderWithItems> {
    let result = self.api.place_order(details).await;
    match &result {
      Ok(_) => {
        self.items.clear();
        self.bridge.notify(NotificationType::Success);
      }
      Err(_) => self.bridge.notify(NotificationType::Error),
    }
    track(&mut self.error, result)
  }
}

// --- Wishlist ---

pub struct WishlistState {
  api: ApiClient,
  items: Vec<Product>,
  error: Option<String>,
}

impl WishlistState {
  pub fn new(api: ApiClient) -> Self {
    Self {
      api,
      items: Vec::new(),
      error: None,
    }
  }

  pub fn items(&self) -> &[Product] {
    &self.items
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn contains(&self, product_id: Uuid) -> bool {
    self.items.iter().any(|p| p.id == product_id)
  }

  pub async fn refresh(&mut self) -> ClientResult<()> {
    let result = self.api.wishlist().await.map(|items| self.items = items);
    track(&mut self.error, result)
  }

  pub async fn add(&mut self, product_id: Uuid) -> ClientResult<()> {
    let result = match self.api.add_to_wishlist(product_id).await {
      Ok(()) => self.api.wishlist().await.map(|items| self.items = items),
      Err(e) => Err(e),
    };
    track(&mut self.error, result)
  }

  pub async fn remove(&mut self, product_id: Uuid) -> ClientResult<()> {
    let result = self
      .api
      .remove_from_wishlist(product_id)
      .await
      .map(|()| self.items.retain(|p| p.id != product_id));
    track(&mut self.error, result)
  }

  /// Adds the product if absent, removes it otherwise. Returns whether it is now wishlisted.
  pub async fn toggle(&mut self, product_id: Uuid) -> ClientResult<bool> {
    if self.contains(product_id) {
      self.remove(product_id).await.map(|()| false)
    } else {
      self.add(product_id).await.map(|()| true)
    }
  }
}

// --- Auth ---

pub struct AuthState {
  api: ApiClient,
  user: Option<TelegramUser>,
  error: Option<String>,
}

impl AuthState {
  pub fn new(api: ApiClient) -> Self {
    Self {
      api,
      user: None,
      error: None,
    }
  }

  pub fn user(&self) -> Option<&TelegramUser> {
    self.user.as_ref()
  }

  pub fn is_signed_in(&self) -> bool {
    self.user.is_some()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Registers the profile and makes every clone of the `ApiClient` act as this user.
  pub async fn sign_in(&mut self, profile: &TelegramProfile) -> ClientResult<()> {
    let result = self.api.sign_in(profile).await.map(|user| {
      self.api.set_identity(Some(user.telegram_id));
      self.user = Some(user);
    });
    track(&mut self.error, result)
  }

  /// Reloads the user for an identity that is already set on the client.
  pub async fn restore(&mut self) -> ClientResult<()> {
    let result = self.api.me().await.map(|user| self.user = Some(user));
    if result.is_err() {
      self.user = None;
    }
    track(&mut self.error, result)
  }

  pub fn sign_out(&mut self) {
    self.api.set_identity(None);
    self.user = None;
    self.error = None;
  }
}
