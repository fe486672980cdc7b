// storefront/src/client/api.rs

//! The service layer: one generic request helper every client-side caller goes through.

use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
  Cart, CartItem, CartLine, Category, CategoryWithCount, CheckoutDetails, OrderWithItems, Product, TelegramProfile,
  TelegramUser,
};
use crate::web::extractors::TELEGRAM_USER_HEADER;

pub const API_PREFIX: &str = "/api";
/// Used when a failed response carries no `error` message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("{0}")]
  Http(#[from] reqwest::Error),

  #[error("{message}")]
  Api { status: u16, message: String },

  #[error("Unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),
}

impl ClientError {
  pub fn status(&self) -> Option<u16> {
    match self {
      ClientError::Api { status, .. } => Some(*status),
      ClientError::Http(e) => e.status().map(|s| s.as_u16()),
      ClientError::Decode(_) => None,
    }
  }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
  error: Option<String>,
}

// --- Response envelopes ---

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CartView {
  pub cart: Cart,
  pub items: Vec<CartLine>,
  pub total_cents: i64,
  pub item_count: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoveResponse {
  pub success: bool,
  pub message: String,
}

#[derive(Deserialize)]
struct CategoriesEnvelope<T> {
  categories: Vec<T>,
}

#[derive(Deserialize)]
struct ProductsEnvelope {
  products: Vec<Product>,
}

#[derive(Deserialize)]
struct ProductEnvelope {
  product: Product,
}

#[derive(Deserialize)]
struct UserEnvelope {
  user: TelegramUser,
}

#[derive(Deserialize)]
struct ItemEnvelope {
  item: CartItem,
}

#[derive(Deserialize)]
struct WishlistEnvelope {
  items: Vec<Product>,
}

#[derive(Deserialize)]
struct OrderEnvelope {
  order: OrderWithItems,
}

#[derive(Deserialize)]
struct OrdersEnvelope {
  orders: Vec<OrderWithItems>,
}

#[derive(Deserialize)]
struct SuccessEnvelope {
  #[allow(dead_code)]
  success: bool,
}

#[derive(Clone)]
pub struct ApiClient {
  http: Client,
  base_url: String,
  // Shared by every clone so signing in once applies to all state holders.
  identity: Arc<RwLock<Option<i64>>>,
}

impl ApiClient {
  pub fn new(base_url: &str) -> ClientResult<Self> {
    let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
      identity: Arc::new(RwLock::new(None)),
    })
  }

  pub fn set_identity(&self, telegram_id: Option<i64>) {
    *self.identity.write() = telegram_id;
  }

  pub fn identity(&self) -> Option<i64> {
    *self.identity.read()
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}{}{}", self.base_url, API_PREFIX, path)
  }

  /// Sends a JSON request to `{base}/api{path}` and decodes the JSON reply.
  /// Non-2xx replies become `ClientError::Api` carrying the server's `error` message.
  pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let url = self.url(path);
    debug!(%method, %url, "API request");

    let mut builder = self.http.request(method, &url).header(CONTENT_TYPE, "application/json");
    if let Some(telegram_id) = self.identity() {
      builder = builder.header(TELEGRAM_USER_HEADER, telegram_id.to_string());
    }
    if let Some(body) = body {
      builder = builder.json(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
      let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
      warn!(status = status.as_u16(), %url, %message, "API request failed");
      return Err(ClientError::Api {
        status: status.as_u16(),
        message,
      });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }

  pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
    self.request::<T, ()>(Method::GET, path, None).await
  }

  pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
    self.request(Method::POST, path, Some(body)).await
  }

  pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
    self.request(Method::PATCH, path, Some(body)).await
  }

  pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
    self.request::<T, ()>(Method::DELETE, path, None).await
  }

  // --- Catalogue ---

  pub async fn categories(&self, active_only: bool) -> ClientResult<Vec<Category>> {
    let envelope: CategoriesEnvelope<Category> = self.get(&format!("/categories?activeOnly={}", active_only)).await?;
    Ok(envelope.categories)
  }

  pub async fn categories_with_counts(&self, active_only: bool) -> ClientResult<Vec<CategoryWithCount>> {
    let envelope: CategoriesEnvelope<CategoryWithCount> = self
      .get(&format!("/categories?includeProducts=true&activeOnly={}", active_only))
      .await?;
    Ok(envelope.categories)
  }

  pub async fn products(&self, category_id: Option<Uuid>, limit: Option<i64>) -> ClientResult<Vec<Product>> {
    let mut params = vec![];
    if let Some(id) = category_id {
      params.push(format!("categoryId={}", id));
    }
    if let Some(limit) = limit {
      params.push(format!("limit={}", limit));
    }
    let path = if params.is_empty() {
      "/products".to_string()
    } else {
      format!("/products?{}", params.join("&"))
    };
    let envelope: ProductsEnvelope = self.get(&path).await?;
    Ok(envelope.products)
  }

  pub async fn product(&self, product_id: Uuid) -> ClientResult<Product> {
    let envelope: ProductEnvelope = self.get(&format!("/products/{}", product_id)).await?;
    Ok(envelope.product)
  }

  // --- Auth ---

  pub async fn sign_in(&self, profile: &TelegramProfile) -> ClientResult<TelegramUser> {
    let envelope: UserEnvelope = self.post("/auth/telegram", profile).await?;
    Ok(envelope.user)
  }

  pub async fn me(&self) -> ClientResult<TelegramUser> {
    let envelope: UserEnvelope = self.get("/auth/me").await?;
    Ok(envelope.user)
  }

  // --- Cart ---

  pub async fn cart(&self) -> ClientResult<CartView> {
    self.get("/cart").await
  }

  pub async fn add_to_cart(&self, product_id: Uuid, quantity: i32) -> ClientResult<CartItem> {
    let body = serde_json::json!({ "product_id": product_id, "quantity": quantity });
    let envelope: ItemEnvelope = self.post("/cart/add", &body).await?;
    Ok(envelope.item)
  }

  pub async fn update_cart_item(&self, item_id: Uuid, quantity: i32) -> ClientResult<CartItem> {
    let body = serde_json::json!({ "item_id": item_id, "quantity": quantity });
    let envelope: ItemEnvelope = self.patch("/cart/update", &body).await?;
    Ok(envelope.item)
  }

  pub async fn remove_cart_item(&self, item_id: Uuid) -> ClientResult<RemoveResponse> {
    self.delete(&format!("/cart/remove?itemId={}", item_id)).await
  }

  // --- Wishlist ---

  pub async fn wishlist(&self) -> ClientResult<Vec<Product>> {
    let envelope: WishlistEnvelope = self.get("/wishlist").await?;
    Ok(envelope.items)
  }

  pub async fn add_to_wishlist(&self, product_id: Uuid) -> ClientResult<()> {
    let body = serde_json::json!({ "product_id": product_id });
    let _: SuccessEnvelope = self.post("/wishlist", &body).await?;
    Ok(())
  }

  pub async fn remove_from_wishlist(&self, product_id: Uuid) -> ClientResult<()> {
    let _: SuccessEnvelope = self.delete(&format!("/wishlist/{}", product_id)).await?;
    Ok(())
  }

  // --- Orders ---

  pub async fn place_order(&self, details: &CheckoutDetails) -> ClientResult<OrderWithItems> {
    let envelope: OrderEnvelope = self.post("/orders", details).await?;
    Ok(envelope.order)
  }

  pub async fn orders(&self) -> ClientResult<Vec<OrderWithItems>> {
    let envelope: OrdersEnvelope = self.get("/orders").await?;
    Ok(envelope.orders)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn urls_get_the_api_prefix_once() {
    let client = ApiClient::new("http://shop.local/").unwrap();
    assert_eq!(client.url("/categories"), "http://shop.local/api/categories");
  }

  #[test]
  fn identity_is_shared_between_clones() {
    let client = ApiClient::new("http://shop.local").unwrap();
    let clone = client.clone();
    client.set_identity(Some(77));
    assert_eq!(clone.identity(), Some(77));
    clone.set_identity(None);
    assert_eq!(client.identity(), None);
  }

  #[test]
  fn api_errors_display_the_server_message() {
    let err = ClientError::Api {
      status: 404,
      message: "Cart item not found".into(),
    };
    assert_eq!(err.to_string(), "Cart item not found");
    assert_eq!(err.status(), Some(404));
  }
}
