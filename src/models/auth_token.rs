// src/models/auth_token.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Opaque bearer token mapping a credential key to a user identity.
/// The key itself is the only secret; it is never logged in full.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
  pub key: String,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}
