// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::cart_service::{self, UpdateOutcome};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  // Defaults to 1 when omitted.
  pub quantity: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemRequestPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let quantity = req_payload.quantity.unwrap_or(1);
  let item =
    cart_service::add_item(&app_state.db_pool, auth_user.user_id, req_payload.product_id, quantity).await?;

  info!(
    "Add to cart successful for user: {}. Item ID: {}, New Quantity: {}",
    auth_user.user_id, item.id, item.quantity
  );

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "cart_item": item,
  })))
}

#[instrument(
    name = "handler::view_cart",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (items, total) = cart_service::view_cart(&app_state.db_pool, auth_user.user_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "items": items,
      "total": total,
  })))
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %path.as_ref())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  cart_service::remove_item(&app_state.db_pool, auth_user.user_id, item_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %path.as_ref(), quantity = req_payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateCartItemRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let outcome =
    cart_service::update_quantity(&app_state.db_pool, auth_user.user_id, product_id, req_payload.quantity).await?;

  match outcome {
    UpdateOutcome::Updated { quantity, item_total } => Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "product_id": product_id,
        "quantity": quantity,
        "item_total": item_total,
    }))),
    UpdateOutcome::Removed => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
  }
}
