// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::DEFAULT_PRODUCT_LIMIT;
use crate::models::ProductQuery;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  #[serde(rename = "categoryId")]
  pub category_id: Option<Uuid>,
  pub search: Option<String>,
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let params = query_params.into_inner();
  let query = ProductQuery {
    category_id: params.category_id,
    search: params.search,
    limit: params.limit.unwrap_or(DEFAULT_PRODUCT_LIMIT),
    offset: params.offset.unwrap_or(0),
  }
  .normalized();

  let products = app_state.store.list_products(&query).await?;
  info!("Successfully fetched {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.store.get_product(product_id).await? {
    Some(product) if product.is_active => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    _ => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}
