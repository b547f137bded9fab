// src/services/cart_service.rs

//! Per-user cart: a keyed mapping from (user, product) to a line item.
//! Repeat adds merge by incrementing quantity; updates are absolute sets.

use crate::errors::{AppError, Result};
use crate::models::CartItem;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A cart line as shown to the client: joined with the product it points at.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub item_total: Decimal,
  pub image: Option<String>,
}

/// Result of an absolute quantity update.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
  /// Quantity was set to the given positive value.
  Updated { quantity: i32, item_total: Decimal },
  /// A non-positive quantity removed the line entirely.
  Removed,
}

pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
  price * Decimal::from(quantity)
}

pub fn grand_total(lines: &[CartLine]) -> Decimal {
  lines.iter().fold(Decimal::ZERO, |acc, line| acc + line.item_total)
}

/// Adds `quantity` of a product to the user's cart. If the (user, product)
/// line already exists its quantity is incremented, not replaced.
#[instrument(
    name = "cart_service::add_item",
    skip(pool),
    fields(user_id = %user_id, product_id = %product_id, quantity = quantity)
)]
pub async fn add_item(pool: &PgPool, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
  if quantity <= 0 {
    warn!("Invalid quantity ({}) provided. Must be positive.", quantity);
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }

  let product_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
    .bind(product_id)
    .fetch_one(pool)
    .await?;
  if !product_exists {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }

  // Single-statement upsert keeps the read-modify-write atomic under
  // concurrent adds for the same (user, product) pair.
  let item: CartItem = sqlx::query_as(
    "INSERT INTO cart_items (id, user_id, product_id, quantity) VALUES ($1, $2, $3, $4) \
     ON CONFLICT (user_id, product_id) DO UPDATE \
     SET quantity = cart_items.quantity + EXCLUDED.quantity \
     RETURNING id, user_id, product_id, quantity, added_at",
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_one(pool)
  .await?;

  info!(cart_item_id = %item.id, new_quantity = item.quantity, "Cart item added/updated.");
  Ok(item)
}

#[derive(Debug, FromRow)]
struct CartRow {
  id: Uuid,
  product_id: Uuid,
  quantity: i32,
  // NULL when the product reference no longer resolves.
  product_name: Option<String>,
  price: Option<Decimal>,
  image: Option<String>,
}

/// Returns the user's cart lines plus the grand total. A line whose product
/// no longer resolves is logged and skipped rather than failing the whole
/// response; with the schema's referential integrity such rows should never
/// occur, which is why the skip is loud.
#[instrument(name = "cart_service::view_cart", skip(pool), fields(user_id = %user_id))]
pub async fn view_cart(pool: &PgPool, user_id: Uuid) -> Result<(Vec<CartLine>, Decimal)> {
  let rows: Vec<CartRow> = sqlx::query_as(
    "SELECT ci.id, ci.product_id, ci.quantity, p.name AS product_name, p.price, p.image \
     FROM cart_items ci LEFT JOIN products p ON p.id = ci.product_id \
     WHERE ci.user_id = $1 ORDER BY ci.added_at ASC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let mut lines = Vec::with_capacity(rows.len());
  for row in rows {
    match (row.product_name, row.price) {
      (Some(product_name), Some(price)) => {
        lines.push(CartLine {
          id: row.id,
          product_id: row.product_id,
          item_total: line_total(price, row.quantity),
          product_name,
          price,
          quantity: row.quantity,
          image: row.image,
        });
      }
      _ => {
        warn!(
          cart_item_id = %row.id,
          product_id = %row.product_id,
          "Skipping cart line with unresolvable product reference."
        );
      }
    }
  }

  let total = grand_total(&lines);
  Ok((lines, total))
}

/// Deletes a cart line, but only if it belongs to `user_id`. A line owned by
/// someone else is indistinguishable from a missing one.
#[instrument(name = "cart_service::remove_item", skip(pool), fields(user_id = %user_id, item_id = %item_id))]
pub async fn remove_item(pool: &PgPool, user_id: Uuid, item_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
    .bind(item_id)
    .bind(user_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Cart item {} not found.", item_id)));
  }
  info!("Cart item removed.");
  Ok(())
}

/// Sets the quantity of the (user, product) line to an exact value. A
/// non-positive quantity removes the line instead.
#[instrument(
    name = "cart_service::update_quantity",
    skip(pool),
    fields(user_id = %user_id, product_id = %product_id, quantity = quantity)
)]
pub async fn update_quantity(pool: &PgPool, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<UpdateOutcome> {
  if quantity <= 0 {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound("Product not in cart.".to_string()));
    }
    info!("Cart line removed via zero-quantity update.");
    return Ok(UpdateOutcome::Removed);
  }

  let updated: Option<(i32, Decimal)> = sqlx::query_as(
    "UPDATE cart_items ci SET quantity = $3 \
     FROM products p \
     WHERE ci.user_id = $1 AND ci.product_id = $2 AND p.id = ci.product_id \
     RETURNING ci.quantity, p.price",
  )
  .bind(user_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_optional(pool)
  .await?;

  match updated {
    Some((new_quantity, price)) => Ok(UpdateOutcome::Updated {
      quantity: new_quantity,
      item_total: line_total(price, new_quantity),
    }),
    None => Err(AppError::NotFound("Product not in cart.".to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price: Decimal, quantity: i32) -> CartLine {
    CartLine {
      id: Uuid::new_v4(),
      product_id: Uuid::new_v4(),
      product_name: "item".to_string(),
      price,
      quantity,
      item_total: line_total(price, quantity),
      image: None,
    }
  }

  #[test]
  fn line_total_multiplies_exactly() {
    assert_eq!(line_total(Decimal::new(1050, 2), 3), Decimal::new(3150, 2)); // 10.50 * 3
  }

  #[test]
  fn grand_total_matches_the_worked_example() {
    // Two of a $10 product plus one of a $5 product.
    let lines = vec![line(Decimal::new(1000, 2), 2), line(Decimal::new(500, 2), 1)];
    assert_eq!(grand_total(&lines), Decimal::new(2500, 2));
  }

  #[test]
  fn grand_total_of_empty_cart_is_zero() {
    assert_eq!(grand_total(&[]), Decimal::ZERO);
  }

  #[test]
  fn totals_keep_decimal_precision() {
    // 0.10 * 3 must be exactly 0.30, not a float approximation.
    assert_eq!(line_total(Decimal::new(10, 2), 3), Decimal::new(30, 2));
  }
}
