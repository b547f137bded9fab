// src/web/extractors.rs

//! Request-level authentication. Token parsing and lookup happen exactly
//! once, here; handlers receive a resolved identity and never touch the
//! Authorization header themselves.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;

const TOKEN_SCHEME: &str = "Token";

/// Identity resolved from the `Authorization: Token <key>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub username: String,
  // Kept so logout can invalidate the exact credential that was presented.
  pub token_key: String,
}

/// Pulls the opaque key out of an `Authorization` header value.
pub fn token_from_header(value: &str) -> Option<&str> {
  let rest = value.strip_prefix(TOKEN_SCHEME)?;
  let key = rest.strip_prefix(' ')?.trim();
  if key.is_empty() {
    None
  } else {
    Some(key)
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let header_value = req
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned);

    Box::pin(async move {
      let state =
        state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let raw = header_value.ok_or_else(|| {
        warn!("Request to a protected endpoint without credentials.");
        AppError::Auth("Authentication credentials were not provided.".to_string())
      })?;
      let key = token_from_header(&raw)
        .ok_or_else(|| AppError::Auth("Invalid Authorization header. Expected 'Token <key>'.".to_string()))?
        .to_owned();

      let user = auth_service::resolve_token(&state.db_pool, &key).await?;
      Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        token_key: key,
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_the_token_scheme() {
    assert_eq!(token_from_header("Token abc123"), Some("abc123"));
  }

  #[test]
  fn trims_stray_whitespace_around_the_key() {
    assert_eq!(token_from_header("Token  abc123 "), Some("abc123"));
  }

  #[test]
  fn rejects_other_schemes_and_empty_keys() {
    assert_eq!(token_from_header("Bearer abc123"), None);
    assert_eq!(token_from_header("Token"), None);
    assert_eq!(token_from_header("Token "), None);
    assert_eq!(token_from_header("token abc123"), None); // scheme is case-sensitive
  }
}
