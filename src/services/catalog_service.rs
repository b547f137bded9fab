// src/services/catalog_service.rs

use crate::errors::{AppError, Result};
use crate::models::Product;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name: String,
  pub price: Decimal,
  pub description: String,
  pub image: Option<String>,
}

/// Field validation for product creation; the catalog has no update path, so
/// this is the only gate a product record ever passes.
pub fn validate_new_product(input: &NewProduct) -> Result<()> {
  if input.name.trim().is_empty() {
    return Err(AppError::Validation("Name, price, and description are required.".to_string()));
  }
  if input.description.trim().is_empty() {
    return Err(AppError::Validation("Name, price, and description are required.".to_string()));
  }
  if input.price < Decimal::ZERO {
    return Err(AppError::Validation("Price must not be negative.".to_string()));
  }
  Ok(())
}

#[instrument(name = "catalog_service::create_product", skip(pool, input), fields(product_name = %input.name))]
pub async fn create_product(pool: &PgPool, input: NewProduct) -> Result<Product> {
  validate_new_product(&input)?;

  let product: Product = sqlx::query_as(
    "INSERT INTO products (id, name, description, price, image) VALUES ($1, $2, $3, $4, $5) \
     RETURNING id, name, description, price, image, created_at, updated_at",
  )
  .bind(Uuid::new_v4())
  .bind(input.name.trim())
  .bind(input.description.trim())
  .bind(input.price)
  .bind(&input.image)
  .fetch_one(pool)
  .await?;

  info!(product_id = %product.id, "Product created.");
  Ok(product)
}

#[instrument(name = "catalog_service::list_products", skip(pool))]
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>> {
  let products: Vec<Product> = sqlx::query_as(
    "SELECT id, name, description, price, image, created_at, updated_at FROM products ORDER BY name ASC",
  )
  .fetch_all(pool)
  .await?;
  Ok(products)
}

#[instrument(name = "catalog_service::get_product", skip(pool), fields(product_id = %product_id))]
pub async fn get_product(pool: &PgPool, product_id: Uuid) -> Result<Product> {
  let product_opt: Option<Product> = sqlx::query_as(
    "SELECT id, name, description, price, image, created_at, updated_at FROM products WHERE id = $1",
  )
  .bind(product_id)
  .fetch_optional(pool)
  .await?;

  product_opt.ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample(name: &str, price: Decimal, description: &str) -> NewProduct {
    NewProduct {
      name: name.to_string(),
      price,
      description: description.to_string(),
      image: None,
    }
  }

  #[test]
  fn accepts_a_well_formed_product() {
    assert!(validate_new_product(&sample("Mug", Decimal::new(1299, 2), "A mug.")).is_ok());
  }

  #[test]
  fn accepts_a_free_product() {
    assert!(validate_new_product(&sample("Flyer", Decimal::ZERO, "Free flyer.")).is_ok());
  }

  #[test]
  fn rejects_blank_name_or_description() {
    assert!(matches!(
      validate_new_product(&sample("  ", Decimal::ONE, "desc")),
      Err(AppError::Validation(_))
    ));
    assert!(matches!(
      validate_new_product(&sample("Mug", Decimal::ONE, "")),
      Err(AppError::Validation(_))
    ));
  }

  #[test]
  fn rejects_negative_price() {
    assert!(matches!(
      validate_new_product(&sample("Mug", Decimal::new(-1, 0), "desc")),
      Err(AppError::Validation(_))
    ));
  }
}
