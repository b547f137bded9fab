// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal, // Serialized as a string, never a JSON float
  pub image: Option<String>, // Opaque reference to a stored asset, if any
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
