// storefront-demo/src/config.rs

use crate::errors::{DemoError, Result};
use dotenvy::dotenv;
use std::env;
use storefront::BackendConfig;

#[derive(Clone)]
pub struct AppConfig {
  pub backend: BackendConfig,
  pub seed_per_category: usize,
  pub demo_email: String,
  pub demo_password: String,
  pub admin_email: String,
  pub admin_password: String,
  pub log_json: bool,
}

impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("backend", &self.backend)
      .field("seed_per_category", &self.seed_per_category)
      .field("demo_email", &self.demo_email)
      .field("admin_email", &self.admin_email)
      .field("log_json", &self.log_json)
      .finish_non_exhaustive()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str, default: &str| env::var(var_name).unwrap_or_else(|_| default.to_string());

    let seed_per_category = get_env("STOREFRONT_SEED_PER_CATEGORY", "8")
      .trim()
      .parse::<usize>()
      .map_err(|e| DemoError::Config(format!("Invalid STOREFRONT_SEED_PER_CATEGORY: {}", e)))?;
    let log_json = get_env("STOREFRONT_LOG_JSON", "false")
      .trim()
      .parse::<bool>()
      .map_err(|e| DemoError::Config(format!("Invalid STOREFRONT_LOG_JSON value: {}", e)))?;

    Ok(Self {
      backend: BackendConfig::from_env(),
      seed_per_category,
      demo_email: get_env("STOREFRONT_DEMO_EMAIL", "shopper@example.com"),
      demo_password: get_env("STOREFRONT_DEMO_PASSWORD", "shopper-pass"),
      admin_email: get_env("STOREFRONT_ADMIN_EMAIL", "admin@example.com"),
      admin_password: get_env("STOREFRONT_ADMIN_PASSWORD", "admin-pass"),
      log_json,
    })
  }
}
