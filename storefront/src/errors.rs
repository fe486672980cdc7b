// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Method Not Allowed")]
  MethodNotAllowed,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// The message sent to the client. Server-side failures never leak their detail.
  pub fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) => m.clone(),
      AppError::MethodNotAllowed => "Method not allowed".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Sqlx(_) | AppError::Migrate(_) => "Database operation failed".to_string(),
      AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    HttpResponse::build(status).json(json!({ "error": self.public_message() }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.error_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[actix_web::test]
  async fn validation_errors_keep_their_message() {
    let (status, body) = body_of(AppError::Validation("itemId is required".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "itemId is required");
  }

  #[actix_web::test]
  async fn database_errors_are_generic_500s() {
    let (status, body) = body_of(AppError::Sqlx(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database operation failed");
  }

  #[actix_web::test]
  async fn method_not_allowed_maps_to_405() {
    let (status, body) = body_of(AppError::MethodNotAllowed).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
  }
}
