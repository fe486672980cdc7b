// storefront/src/web/routes.rs

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{
  auth_handlers, cart_handlers, category_handlers, debug_handlers, order_handlers, product_handlers, theme_handlers,
  wishlist_handlers,
};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn method_not_allowed_handler() -> Result<HttpResponse, AppError> {
  Err(AppError::MethodNotAllowed)
}

// Extractor failures use the same `{ "error": ... }` body as handler errors.
fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(err.to_string()).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(err.to_string()).into()
}

/// A resource that answers unsupported methods with a JSON 405.
fn resource(path: &str) -> actix_web::Resource {
  web::resource(path).default_service(web::route().to(method_not_allowed_handler))
}

/// Called in `main.rs` (and by the integration tests) to mount the `/api` routes.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .app_data(web::JsonConfig::default().error_handler(json_error))
      .app_data(web::QueryConfig::default().error_handler(query_error))
      .app_data(web::PathConfig::default().error_handler(path_error))
      .service(resource("/health").route(web::get().to(health_check_handler)))
      .service(resource("/theme").route(web::get().to(theme_handlers::theme_handler)))
      // Catalogue
      .service(resource("/categories").route(web::get().to(category_handlers::list_categories_handler)))
      .service(resource("/products").route(web::get().to(product_handlers::list_products_handler)))
      .service(resource("/products/{product_id}").route(web::get().to(product_handlers::get_product_handler)))
      // Authentication
      .service(resource("/auth/telegram").route(web::post().to(auth_handlers::telegram_sign_in_handler)))
      .service(resource("/auth/me").route(web::get().to(auth_handlers::me_handler)))
      // Cart
      .service(resource("/cart").route(web::get().to(cart_handlers::get_cart_handler)))
      .service(resource("/cart/add").route(web::post().to(cart_handlers::add_to_cart_handler)))
      .service(resource("/cart/update").route(web::patch().to(cart_handlers::update_cart_item_handler)))
      .service(resource("/cart/remove").route(web::delete().to(cart_handlers::remove_from_cart_handler)))
      // Wishlist
      .service(
        resource("/wishlist")
          .route(web::get().to(wishlist_handlers::list_wishlist_handler))
          .route(web::post().to(wishlist_handlers::add_to_wishlist_handler)),
      )
      .service(
        resource("/wishlist/{product_id}").route(web::delete().to(wishlist_handlers::remove_from_wishlist_handler)),
      )
      // Orders
      .service(
        resource("/orders")
          .route(web::get().to(order_handlers::list_orders_handler))
          .route(web::post().to(order_handlers::place_order_handler)),
      )
      .service(resource("/orders/{order_id}").route(web::get().to(order_handlers::get_order_handler)))
      // Debug
      .service(resource("/debug-orders").route(web::get().to(debug_handlers::debug_orders_handler)))
      .service(resource("/debug/telegram").route(web::get().to(debug_handlers::debug_telegram_handler))),
  );
}
