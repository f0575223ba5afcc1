// storefront/src/errors.rs

use crate::checkout::validation::ValidationErrors;
use crate::pipeline::PipelineError;
use thiserror::Error;

/// Application error shared by every flow and by the data-access seam.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Validation Error: {0}")]
  Validation(ValidationErrors),

  #[error("Invalid Input: {0}")]
  InvalidInput(String),

  /// Not shown inline; the caller navigates to the login page instead.
  #[error("Authentication required (continue at '{return_to}')")]
  AuthRequired { return_to: String },

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Order Submission Failed: {0}")]
  Submission(String),

  #[error("Backend service is not configured (missing: {})", .missing.join(", "))]
  NotConfigured { missing: Vec<String> },

  #[error("Checkout cannot be edited while an order is being placed or after it was confirmed")]
  CheckoutLocked,

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl StoreError {
  /// The single message shown to the shopper for this failure.
  pub fn user_message(&self) -> String {
    match self {
      StoreError::Validation(_) => "Please correct the highlighted fields.".to_string(),
      StoreError::AuthRequired { .. } => "Please sign in to continue.".to_string(),
      StoreError::InvalidInput(m)
      | StoreError::Auth(m)
      | StoreError::Forbidden(m)
      | StoreError::NotFound(m)
      | StoreError::Conflict(m)
      | StoreError::Submission(m) => m.clone(),
      StoreError::NotConfigured { missing } => format!(
        "Authentication service is not configured. Environment variables missing: {}",
        missing.join(" ")
      ),
      StoreError::CheckoutLocked => "Your order is already being processed.".to_string(),
      StoreError::Workflow { .. } | StoreError::Internal(_) => {
        "Something went wrong. Please try again.".to_string()
      }
    }
  }
}

impl From<anyhow::Error> for StoreError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StoreError>() {
      Ok(store_err) => store_err,
      Err(other) => StoreError::Internal(format!("{:#}", other)),
    }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
