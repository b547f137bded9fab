// src/lib.rs

//! A small e-commerce backend: token-authenticated users, a product
//! catalog, per-user carts, and atomic order placement over PostgreSQL.
//!
//! The binary entry point lives in `main.rs`; everything else is exposed
//! here so the integration tests can drive the same app wiring.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
