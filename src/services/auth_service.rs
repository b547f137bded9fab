// src/services/auth_service.rs

//! Credential handling: password hashing and verification, opaque bearer
//! tokens, and the register/login/logout operations built on them.

use crate::errors::{AppError, Result};
use crate::models::{AuthToken, User};
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,   // The main trait for hashing
    PasswordVerifier, // The main trait for verifying
    SaltString,
  },
  Argon2, // The Argon2 algorithm instance
};
use rand_core::RngCore;
use sqlx::PgPool;
use std::fmt::Write as _;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const TOKEN_KEY_BYTES: usize = 20; // 40 hex chars on the wire
const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a plain-text password using Argon2.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  debug!("Attempting to hash password.");
  if password.is_empty() {
    error!("Password hashing failed: Password cannot be empty.");
    return Err(AppError::Validation(
      "Password cannot be empty for hashing.".to_string(),
    ));
  }

  let salt = SaltString::generate(&mut OsRng); // Cryptographically secure random salt
  let argon2_hasher = Argon2::default(); // Default Argon2 parameters (recommended)

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => {
      debug!("Password hashed successfully.");
      Ok(password_hash_obj.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!(
        "Password hashing process failed: {}",
        argon_err
      )))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch; errors are
/// reserved for malformed stored hashes or internal verifier failures.
#[instrument(name = "auth_service::verify_password", skip(hashed_password_str, provided_password), err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool> {
  if hashed_password_str.is_empty() {
    error!("Password verification failed: Stored hash string is empty.");
    return Err(AppError::Auth("Invalid stored password format (empty).".to_string()));
  }
  if provided_password.is_empty() {
    return Err(AppError::Auth(
      "Provided password for verification cannot be empty.".to_string(),
    ));
  }

  let parsed_hash = match PasswordHash::new(hashed_password_str) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!(
        "Invalid stored password hash format: {}",
        parse_err
      )));
    }
  };

  let argon2_verifier = Argon2::default();

  match argon2_verifier.verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Generates a fresh opaque token key: 20 random bytes, hex-encoded.
pub fn generate_token_key() -> String {
  let mut bytes = [0u8; TOKEN_KEY_BYTES];
  OsRng.fill_bytes(&mut bytes);
  let mut key = String::with_capacity(TOKEN_KEY_BYTES * 2);
  for byte in bytes {
    let _ = write!(key, "{:02x}", byte);
  }
  key
}

/// Validates registration input before any store work happens.
pub fn validate_registration(email: &str, username: &str, password: &str) -> Result<()> {
  if email.is_empty() || !email.contains('@') {
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  if username.trim().is_empty() {
    return Err(AppError::Validation("Username is required.".to_string()));
  }
  if password.len() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      MIN_PASSWORD_LEN
    )));
  }
  Ok(())
}

/// Creates a user and issues their first token.
#[instrument(name = "auth_service::register_user", skip(pool, password), fields(req_email = %email, req_username = %username))]
pub async fn register_user(pool: &PgPool, email: &str, username: &str, password: &str) -> Result<(User, String)> {
  validate_registration(email, username, password)?;

  let taken: bool =
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)")
      .bind(email)
      .bind(username)
      .fetch_one(pool)
      .await?;
  if taken {
    warn!("Attempt to register with an existing email or username.");
    return Err(AppError::Validation(
      "An account with this email or username already exists.".to_string(),
    ));
  }

  let password_hash = hash_password(password)?;

  let user: User = sqlx::query_as(
    "INSERT INTO users (id, email, username, password_hash) VALUES ($1, $2, $3, $4) \
     RETURNING id, email, username, password_hash, created_at, updated_at",
  )
  .bind(Uuid::new_v4())
  .bind(email)
  .bind(username)
  .bind(&password_hash)
  .fetch_one(pool)
  .await
  .map_err(|e| match e {
    // The EXISTS check above races with concurrent registrations; the unique
    // constraint is the authority.
    sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
      AppError::Validation("An account with this email or username already exists.".to_string())
    }
    other => AppError::Sqlx(other),
  })?;

  let token = issue_token(pool, user.id).await?;
  info!(user_id = %user.id, "User registered.");
  Ok((user, token))
}

/// Verifies credentials and returns the user plus their bearer token.
/// The token is get-or-create: a repeat login reuses the existing key.
#[instrument(name = "auth_service::login_user", skip(pool, password), fields(req_username = %username))]
pub async fn login_user(pool: &PgPool, username: &str, password: &str) -> Result<(User, String)> {
  if username.is_empty() || password.is_empty() {
    return Err(AppError::Validation("Username and password are required.".to_string()));
  }

  let user_opt: Option<User> = sqlx::query_as(
    "SELECT id, email, username, password_hash, created_at, updated_at FROM users WHERE username = $1",
  )
  .bind(username)
  .fetch_optional(pool)
  .await?;

  // Same message for an unknown user and a wrong password.
  let user = match user_opt {
    Some(user) => user,
    None => {
      warn!("Login attempt for unknown username.");
      return Err(AppError::Auth("Invalid username or password.".to_string()));
    }
  };

  if !verify_password(&user.password_hash, password)? {
    warn!(user_id = %user.id, "Login attempt with wrong password.");
    return Err(AppError::Auth("Invalid username or password.".to_string()));
  }

  let token = issue_token(pool, user.id).await?;
  info!(user_id = %user.id, "Login successful.");
  Ok((user, token))
}

/// Invalidates the presented token.
#[instrument(name = "auth_service::logout_user", skip(pool, token_key))]
pub async fn logout_user(pool: &PgPool, token_key: &str) -> Result<()> {
  sqlx::query("DELETE FROM auth_tokens WHERE key = $1")
    .bind(token_key)
    .execute(pool)
    .await?;
  Ok(())
}

/// Maps a presented token key back to its user, or fails with an auth error.
#[instrument(name = "auth_service::resolve_token", skip(pool, token_key))]
pub async fn resolve_token(pool: &PgPool, token_key: &str) -> Result<User> {
  let user_opt: Option<User> = sqlx::query_as(
    "SELECT u.id, u.email, u.username, u.password_hash, u.created_at, u.updated_at \
     FROM users u JOIN auth_tokens t ON t.user_id = u.id WHERE t.key = $1",
  )
  .bind(token_key)
  .fetch_optional(pool)
  .await?;

  user_opt.ok_or_else(|| {
    warn!("Request presented an unknown or expired token.");
    AppError::Auth("Invalid token.".to_string())
  })
}

async fn issue_token(pool: &PgPool, user_id: Uuid) -> Result<String> {
  // On conflict the no-op update lets RETURNING hand back the existing row.
  let token: AuthToken = sqlx::query_as(
    "INSERT INTO auth_tokens (key, user_id) VALUES ($1, $2) \
     ON CONFLICT (user_id) DO UPDATE SET key = auth_tokens.key \
     RETURNING key, user_id, created_at",
  )
  .bind(generate_token_key())
  .bind(user_id)
  .fetch_one(pool)
  .await?;
  Ok(token.key)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_roundtrip() {
    let hash = hash_password("correct horse battery").unwrap();
    assert!(verify_password(&hash, "correct horse battery").unwrap());
    assert!(!verify_password(&hash, "wrong password").unwrap());
  }

  #[test]
  fn empty_password_is_rejected() {
    assert!(matches!(hash_password(""), Err(AppError::Validation(_))));
  }

  #[test]
  fn malformed_stored_hash_is_an_internal_error() {
    assert!(matches!(
      verify_password("not-an-argon2-hash", "whatever"),
      Err(AppError::Internal(_))
    ));
  }

  #[test]
  fn token_keys_are_40_hex_chars_and_distinct() {
    let a = generate_token_key();
    let b = generate_token_key();
    assert_eq!(a.len(), 40);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
  }

  #[test]
  fn registration_validation_rules() {
    assert!(validate_registration("a@example.com", "alice", "longenough").is_ok());
    assert!(matches!(
      validate_registration("not-an-email", "alice", "longenough"),
      Err(AppError::Validation(_))
    ));
    assert!(matches!(
      validate_registration("a@example.com", "  ", "longenough"),
      Err(AppError::Validation(_))
    ));
    assert!(matches!(
      validate_registration("a@example.com", "alice", "short"),
      Err(AppError::Validation(_))
    ));
  }
}
