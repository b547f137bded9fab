// src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;

// Simple health check handler. In a real deployment this might also probe
// DB connectivity.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// JSON body configuration shared by the server and the integration tests:
/// malformed bodies, missing fields, and unsupported content types all map
/// to the validation taxonomy (400) instead of actix's defaults.
pub fn json_error_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .content_type_required(true)
    .error_handler(|err, _req| AppError::Validation(format!("Invalid request body: {}", err)).into())
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route(
            "/register",
            web::post().to(crate::web::handlers::auth_handlers::register_handler),
          )
          .route(
            "/login",
            web::post().to(crate::web::handlers::auth_handlers::login_handler),
          )
          .route(
            "/logout",
            web::post().to(crate::web::handlers::auth_handlers::logout_handler),
          ),
      )
      // Catalog Routes
      .service(
        web::scope("/products")
          .route(
            "",
            web::get().to(crate::web::handlers::product_handlers::list_products_handler),
          )
          .route(
            "/create",
            web::post().to(crate::web::handlers::product_handlers::create_product_handler),
          )
          .route(
            "/{product_id}",
            web::get().to(crate::web::handlers::product_handlers::get_product_handler),
          ),
      )
      // Cart Routes (all behind the AuthenticatedUser extractor)
      .service(
        web::scope("/cart")
          .route("", web::get().to(crate::web::handlers::cart_handlers::view_cart_handler))
          .route(
            "/add",
            web::post().to(crate::web::handlers::cart_handlers::add_to_cart_handler),
          )
          .route(
            "/remove/{item_id}",
            web::delete().to(crate::web::handlers::cart_handlers::remove_cart_item_handler),
          )
          .route(
            "/update/{product_id}",
            web::put().to(crate::web::handlers::cart_handlers::update_cart_item_handler),
          ),
      )
      // Order Routes
      .service(
        web::scope("/orders")
          .route(
            "/place",
            web::post().to(crate::web::handlers::order_handlers::place_order_handler),
          )
          .route(
            "/history",
            web::get().to(crate::web::handlers::order_handlers::order_history_handler),
          ),
      ),
  );
}
