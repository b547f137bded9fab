// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize; // For request payloads
use serde_json::json; // For JSON responses
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub email: String,
  pub username: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub username: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email, req_username = %req_payload.username)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Registration attempt for username: {}", req_payload.username);

  let (user, token) = auth_service::register_user(
    &app_state.db_pool,
    &req_payload.email,
    &req_payload.username,
    &req_payload.password,
  )
  .await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "User registered successfully.",
      "user": user,
      "token": token,
  })))
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_username = %req_payload.username)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Login attempt for username: {}", req_payload.username);

  let (user, token) = auth_service::login_user(&app_state.db_pool, &req_payload.username, &req_payload.password).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Login successful.",
      "user": user,
      "token": token,
  })))
}

#[instrument(
    name = "handler::logout",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::logout_user(&app_state.db_pool, &auth_user.token_key).await?;
  info!("User {} logged out.", auth_user.user_id);

  Ok(HttpResponse::Ok().json(json!({
      "message": "Logged out successfully.",
  })))
}
