// storefront/src/web/handlers/theme_handlers.rs

use actix_web::HttpResponse;

use crate::theme::ThemeTokens;

pub async fn theme_handler() -> HttpResponse {
  HttpResponse::Ok().json(ThemeTokens::default_theme())
}
