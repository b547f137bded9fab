// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable record of a completed checkout. `total_amount` is computed once
/// at placement from the line-item snapshots and never recomputed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
}
