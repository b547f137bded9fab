// src/services/order_service.rs

//! The order engine: converts a user's cart into an immutable order with
//! line-item price snapshots, atomically, and clears the cart. Also the
//! read-only history projection over placed orders.

use crate::errors::{AppError, Result};
use crate::models::Order;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

/// One cart line as loaded inside the checkout transaction, carrying the
/// product's price at this instant.
#[derive(Debug, Clone, FromRow)]
pub struct CheckoutLine {
  pub product_id: Uuid,
  pub quantity: i32,
  pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemView {
  pub product_name: String,
  pub quantity: i32,
  pub price: Decimal,
  pub item_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
  pub order_id: Uuid,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
  pub items: Vec<OrderItemView>,
}

pub fn order_total(lines: &[CheckoutLine]) -> Decimal {
  lines
    .iter()
    .fold(Decimal::ZERO, |acc, line| acc + line.unit_price * Decimal::from(line.quantity))
}

/// Places an order from the user's current cart.
///
/// Everything happens inside one transaction: the order row, one order item
/// per cart line (snapshotting the current product price), and the cart
/// deletion all commit together or not at all. An empty cart fails before
/// any write with a state error and leaves no trace.
#[instrument(name = "order_service::place_order", skip(pool), fields(user_id = %user_id))]
pub async fn place_order(pool: &PgPool, user_id: Uuid) -> Result<Order> {
  let mut tx = pool.begin().await?;

  // Lock the cart rows so a concurrent add/update/checkout for the same user
  // serializes against this transaction instead of mutating a half-consumed
  // cart.
  let lines: Vec<CheckoutLine> = sqlx::query_as(
    "SELECT ci.product_id, ci.quantity, p.price AS unit_price \
     FROM cart_items ci JOIN products p ON p.id = ci.product_id \
     WHERE ci.user_id = $1 ORDER BY ci.added_at ASC \
     FOR UPDATE OF ci",
  )
  .bind(user_id)
  .fetch_all(&mut *tx)
  .await?;

  if lines.is_empty() {
    // Dropping the transaction rolls it back; nothing was written.
    return Err(AppError::State("Cart is empty.".to_string()));
  }

  let total_amount = order_total(&lines);

  let order: Order = sqlx::query_as(
    "INSERT INTO orders (id, user_id, total_amount) VALUES ($1, $2, $3) \
     RETURNING id, user_id, total_amount, created_at",
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(total_amount)
  .fetch_one(&mut *tx)
  .await?;

  for line in &lines {
    sqlx::query(
      "INSERT INTO order_items (id, order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(line.unit_price)
    .execute(&mut *tx)
    .await?;
  }

  sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  info!(order_id = %order.id, total_amount = %order.total_amount, "Order placed.");
  Ok(order)
}

#[derive(Debug, FromRow)]
struct HistoryItemRow {
  product_name: String,
  quantity: i32,
  price: Decimal,
}

/// Lists the user's orders, most recent first, each expanded with its items.
#[instrument(name = "order_service::order_history", skip(pool), fields(user_id = %user_id))]
pub async fn order_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<OrderView>> {
  let orders: Vec<Order> = sqlx::query_as(
    "SELECT id, user_id, total_amount, created_at FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let mut views = Vec::with_capacity(orders.len());
  for order in orders {
    let item_rows: Vec<HistoryItemRow> = sqlx::query_as(
      "SELECT p.name AS product_name, oi.quantity, oi.price \
       FROM order_items oi JOIN products p ON p.id = oi.product_id \
       WHERE oi.order_id = $1",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    let items = item_rows
      .into_iter()
      .map(|row| OrderItemView {
        item_total: row.price * Decimal::from(row.quantity),
        product_name: row.product_name,
        quantity: row.quantity,
        price: row.price,
      })
      .collect();

    views.push(OrderView {
      order_id: order.id,
      total_amount: order.total_amount,
      created_at: order.created_at,
      items,
    });
  }

  Ok(views)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn checkout_line(unit_price: Decimal, quantity: i32) -> CheckoutLine {
    CheckoutLine {
      product_id: Uuid::new_v4(),
      quantity,
      unit_price,
    }
  }

  #[test]
  fn order_total_matches_the_worked_example() {
    // [(p1, $10, qty 2), (p2, $5, qty 1)] totals $25.
    let lines = vec![
      checkout_line(Decimal::new(1000, 2), 2),
      checkout_line(Decimal::new(500, 2), 1),
    ];
    assert_eq!(order_total(&lines), Decimal::new(2500, 2));
  }

  #[test]
  fn order_total_of_no_lines_is_zero() {
    assert_eq!(order_total(&[]), Decimal::ZERO);
  }

  #[test]
  fn order_total_is_exact_for_awkward_prices() {
    // 19.99 * 3 = 59.97 exactly.
    let lines = vec![checkout_line(Decimal::new(1999, 2), 3)];
    assert_eq!(order_total(&lines), Decimal::new(5997, 2));
  }
}
