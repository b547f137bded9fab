// src/errors.rs

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

  // Request is well-formed but the entity state forbids the operation,
  // e.g. placing an order on an empty cart.
  #[error("Invalid State: {0}")]
  State(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in code that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      // We already have `From<sqlx::Error>`, but this handles if it was wrapped in anyhow
      if let Ok(sqlx_err) = err.downcast::<sqlx::Error>() {
        return AppError::Sqlx(sqlx_err);
      }
      return AppError::Internal("Database error lost during conversion.".to_string());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::State(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;

  #[test]
  fn status_codes_follow_the_error_taxonomy() {
    let cases = [
      (AppError::Validation("missing field".into()), StatusCode::BAD_REQUEST),
      (AppError::Auth("bad token".into()), StatusCode::UNAUTHORIZED),
      (AppError::NotFound("no such product".into()), StatusCode::NOT_FOUND),
      (AppError::State("cart is empty".into()), StatusCode::BAD_REQUEST),
      (AppError::Config("missing var".into()), StatusCode::INTERNAL_SERVER_ERROR),
      (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, expected) in cases {
      assert_eq!(err.error_response().status(), expected, "wrong status for {err}");
    }
  }

  #[test]
  fn sqlx_errors_do_not_leak_detail() {
    let err = AppError::Sqlx(sqlx::Error::RowNotFound);
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn anyhow_errors_become_internal() {
    let err: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(err, AppError::Internal(ref m) if m.contains("something odd")));
  }
}
