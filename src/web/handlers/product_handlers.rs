// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::catalog_service::{self, NewProduct};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CreateProductRequestPayload {
  pub name: String,
  pub price: Decimal, // Accepts "19.99" (preferred) as well as a bare number
  pub description: String,
  pub image: Option<String>,
}

#[instrument(
    name = "handler::create_product",
    skip(app_state, req_payload),
    fields(product_name = %req_payload.name)
)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateProductRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let product = catalog_service::create_product(
    &app_state.db_pool,
    NewProduct {
      name: payload.name,
      price: payload.price,
      description: payload.description,
      image: payload.image,
    },
  )
  .await?;

  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog_service::list_products(&app_state.db_pool).await?;
  info!("Successfully fetched {} products.", products.len());

  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = catalog_service::get_product(&app_state.db_pool, product_id).await?;

  Ok(HttpResponse::Ok().json(product))
}
