// storefront-demo/src/errors.rs

use storefront::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Storefront Error: {source}")]
  Store {
    #[from]
    source: StoreError,
  },

  #[error("Serialization Error: {0}")]
  Json(#[from] serde_json::Error),

  /// The scripted session reached a state it did not expect.
  #[error("Unexpected outcome at '{step}': {detail}")]
  Scenario { step: &'static str, detail: String },
}

impl DemoError {
  pub fn scenario(step: &'static str, detail: impl std::fmt::Debug) -> Self {
    DemoError::Scenario {
      step,
      detail: format!("{:?}", detail),
    }
  }
}

pub type Result<T, E = DemoError> = std::result::Result<T, E>;
