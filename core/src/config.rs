// storefront/src/config.rs

use crate::backend::UnconfiguredBackend;
use dotenvy::dotenv;
use std::env;
use tracing::warn;

pub const BACKEND_URL_VAR: &str = "STOREFRONT_BACKEND_URL";
pub const BACKEND_ANON_KEY_VAR: &str = "STOREFRONT_BACKEND_ANON_KEY";

/// Connection settings for the hosted database/auth service.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
  pub url: Option<String>,
  pub anon_key: Option<String>,
}

impl std::fmt::Debug for BackendConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BackendConfig")
      .field("url", &self.url)
      .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
      .finish()
  }
}

impl BackendConfig {
  /// Reads the settings from the environment, loading `.env` first if present.
  /// Blank values count as missing.
  pub fn from_env() -> Self {
    dotenv().ok();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|value| !value.trim().is_empty());
    Self {
      url: get_env(BACKEND_URL_VAR),
      anon_key: get_env(BACKEND_ANON_KEY_VAR),
    }
  }

  /// Names of the variables still missing, in a stable order.
  pub fn missing_vars(&self) -> Vec<String> {
    let mut missing = Vec::new();
    if self.url.is_none() {
      missing.push(BACKEND_URL_VAR.to_string());
    }
    if self.anon_key.is_none() {
      missing.push(BACKEND_ANON_KEY_VAR.to_string());
    }
    missing
  }

  pub fn is_configured(&self) -> bool {
    self.missing_vars().is_empty()
  }

  /// A fail-fast backend naming the missing variables, or `None` when the
  /// configuration is complete.
  pub fn unconfigured_backend(&self) -> Option<UnconfiguredBackend> {
    let missing = self.missing_vars();
    if missing.is_empty() {
      return None;
    }
    warn!(?missing, "Backend is not configured; every data-access call will fail.");
    Some(UnconfiguredBackend::new(missing))
  }
}
