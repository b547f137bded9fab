// src/db.rs

//! Store bootstrap: embedded migrations and optional demo seed data.

use crate::errors::{AppError, Result};
use crate::services::catalog_service::{self, NewProduct};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

/// Applies the embedded migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
  sqlx::migrate!("./migrations")
    .run(pool)
    .await
    .map_err(|e| AppError::Config(format!("Database migration failed: {}", e)))?;
  info!("Database migrations applied.");
  Ok(())
}

/// Seeds a handful of demo products on an empty catalog. Controlled by the
/// `SEED_DB` configuration flag; a non-empty catalog is left untouched.
pub async fn seed_demo_products(pool: &PgPool) -> Result<()> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
    .fetch_one(pool)
    .await?;
  if count > 0 {
    info!("Products already present; skipping demo seed.");
    return Ok(());
  }

  let demo = [
    ("Espresso Beans 1kg", Decimal::new(1850, 2), "Dark roast arabica blend."),
    ("Pour-Over Kettle", Decimal::new(4999, 2), "Gooseneck kettle, 1 litre."),
    ("Ceramic Mug", Decimal::new(1250, 2), "Stoneware mug, 330 ml."),
  ];
  for (name, price, description) in demo {
    catalog_service::create_product(
      pool,
      NewProduct {
        name: name.to_string(),
        price,
        description: description.to_string(),
        image: None,
      },
    )
    .await?;
  }
  info!("Seeded {} demo products.", demo.len());
  Ok(())
}
