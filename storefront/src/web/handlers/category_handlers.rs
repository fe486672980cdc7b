// storefront/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use futures_util::future::try_join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::query_flag;
use crate::db::CategoryFilter;
use crate::errors::AppError;
use crate::models::CategoryWithCount;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListCategoriesQuery {
  #[serde(rename = "includeProducts")]
  pub include_products: Option<String>,
  #[serde(rename = "activeOnly")]
  pub active_only: Option<String>,
}

#[instrument(name = "handler::list_categories", skip(app_state, query))]
pub async fn list_categories_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListCategoriesQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = CategoryFilter {
    active_only: query_flag(&query.active_only),
  };
  let include_products = query_flag(&query.include_products);

  let categories = app_state.store.list_categories(filter).await?;
  info!(
    count = categories.len(),
    active_only = filter.active_only,
    include_products,
    "Fetched categories."
  );

  if !include_products {
    return Ok(HttpResponse::Ok().json(json!({ "categories": categories })));
  }

  // Counts are independent of each other; issue them together.
  let store = &app_state.store;
  let counts = try_join_all(categories.iter().map(|c| store.count_active_products(c.id))).await?;
  let with_counts: Vec<CategoryWithCount> = categories
    .into_iter()
    .zip(counts)
    .map(|(category, product_count)| CategoryWithCount {
      category,
      product_count,
    })
    .collect();

  Ok(HttpResponse::Ok().json(json!({ "categories": with_counts })))
}
