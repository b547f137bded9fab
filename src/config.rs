// src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Optional: for seeding demo products on startup
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      seed_db,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn clear_env() {
    for var in ["SERVER_HOST", "SERVER_PORT", "DATABASE_URL", "SEED_DB"] {
      env::remove_var(var);
    }
  }

  #[test]
  #[serial]
  fn from_env_requires_database_url() {
    clear_env();
    let result = AppConfig::from_env();
    assert!(matches!(result, Err(AppError::Config(ref m)) if m.contains("DATABASE_URL")));
  }

  #[test]
  #[serial]
  fn from_env_applies_defaults() {
    clear_env();
    env::set_var("DATABASE_URL", "postgres://localhost/storefront_test");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.server_port, 8080);
    assert!(!config.seed_db);
    clear_env();
  }

  #[test]
  #[serial]
  fn from_env_rejects_bad_port() {
    clear_env();
    env::set_var("DATABASE_URL", "postgres://localhost/storefront_test");
    env::set_var("SERVER_PORT", "not-a-port");
    let result = AppConfig::from_env();
    assert!(matches!(result, Err(AppError::Config(ref m)) if m.contains("SERVER_PORT")));
    clear_env();
  }
}
