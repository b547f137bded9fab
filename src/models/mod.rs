// src/models/mod.rs

//! Contains data structures representing database entities.

// Declare child modules for each model
pub mod auth_token;
pub mod cart_item;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use auth_token::AuthToken;
pub use cart_item::CartItem;
pub use order::Order;
pub use order_item::OrderItem;
pub use product::Product;
pub use user::User;
