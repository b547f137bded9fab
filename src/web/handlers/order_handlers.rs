// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(
    name = "handler::place_order",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  info!("Order placement attempt by user: {}", auth_user.user_id);

  let order = order_service::place_order(&app_state.db_pool, auth_user.user_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "order_id": order.id,
      "total_amount": order.total_amount,
  })))
}

#[instrument(
    name = "handler::order_history",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn order_history_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::order_history(&app_state.db_pool, auth_user.user_id).await?;

  Ok(HttpResponse::Ok().json(orders))
}
