// storefront/src/backend/password.rs

//! Argon2 password hashing for the in-memory auth service.

use crate::errors::{StoreError, StoreResult};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument};

#[instrument(name = "password::hash_password", skip(password), err(Display))]
pub(crate) fn hash_password(password: &str) -> StoreResult<String> {
  if password.is_empty() {
    return Err(StoreError::InvalidInput("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      StoreError::Internal(format!("Password hashing failed: {}", argon_err))
    })
}

/// Returns `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
#[instrument(name = "password::verify_password", skip_all, err(Display))]
pub(crate) fn verify_password(stored_hash: &str, provided: &str) -> StoreResult<bool> {
  if provided.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Stored password hash could not be parsed.");
    StoreError::Internal(format!("Invalid stored password hash: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password mismatch.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 verification failed unexpectedly.");
      Err(StoreError::Internal(format!("Password verification failed: {}", other)))
    }
  }
}
