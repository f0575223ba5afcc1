// storefront/src/checkout/flow.rs

//! The checkout state machine: `Editing` → `Submitting` → `Confirmed`, with
//! `Blocked` while validation errors are shown.

use crate::backend::DataAccess;
use crate::cart::CartStore;
use crate::checkout::form::CheckoutForm;
use crate::checkout::pipeline::{build_checkout_pipeline, CheckoutCtxData, CheckoutHalt};
use crate::checkout::redirect::{RedirectMemory, CART_PATH};
use crate::checkout::validation::{CheckoutField, ValidationErrors};
use crate::errors::{StoreError, StoreResult};
use crate::models::{Order, PaymentMethod, ShippingInfo};
use crate::pipeline::{ContextData, Pipeline, PipelineResult};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// What the confirmation screen shows. Captured when the order was placed,
/// so later cart or form changes do not alter it.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
  pub order: Order,
  pub shipping: ShippingInfo,
  pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
  Editing,
  Blocked(ValidationErrors),
  Submitting,
  Confirmed(Confirmation),
}

impl CheckoutState {
  fn accepts_edits(&self) -> bool {
    matches!(self, CheckoutState::Editing | CheckoutState::Blocked(_))
  }
}

/// Result of one `submit()` call. Every failure maps to exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  Blocked(ValidationErrors),
  EmptyCart,
  /// No session; the checkout path was remembered for after sign-in.
  LoginRequired { return_to: String },
  Confirmed(Confirmation),
  Failed { message: String },
  /// Another submission is still outstanding; nothing was sent.
  InFlight,
  AlreadyConfirmed,
}

/// Result of entering the checkout page.
pub enum CheckoutEntry {
  Ready(CheckoutFlow),
  RedirectToCart,
}

impl fmt::Debug for CheckoutEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CheckoutEntry::Ready(_) => f.write_str("Ready(..)"),
      CheckoutEntry::RedirectToCart => f.write_str("RedirectToCart"),
    }
  }
}

#[derive(Debug)]
struct CheckoutSession {
  form: CheckoutForm,
  state: CheckoutState,
  submit_error: Option<String>,
  /// Bumped by `leave()`; a submission finishing under an older value is stale.
  attempt: u64,
}

/// Handle onto one visit of the checkout page.
#[derive(Clone)]
pub struct CheckoutFlow {
  session: ContextData<CheckoutSession>,
  data: Arc<dyn DataAccess>,
  cart: CartStore,
  redirects: RedirectMemory,
  pipeline: Arc<Pipeline<CheckoutCtxData, StoreError>>,
}

impl fmt::Debug for CheckoutFlow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CheckoutFlow")
      .field("state", &self.session.read().state)
      .field("cart_lines", &self.cart.len())
      .finish()
  }
}

impl CheckoutFlow {
  /// Opens checkout over the current cart, or asks for a redirect to the
  /// cart page when it is empty.
  pub fn enter(data: Arc<dyn DataAccess>, cart: CartStore, redirects: RedirectMemory) -> CheckoutEntry {
    if cart.is_empty() {
      info!("Checkout entered with an empty cart; redirecting.");
      return CheckoutEntry::RedirectToCart;
    }
    CheckoutEntry::Ready(Self {
      session: ContextData::new(CheckoutSession {
        form: CheckoutForm::default(),
        state: CheckoutState::Editing,
        submit_error: None,
        attempt: 0,
      }),
      data,
      cart,
      redirects,
      pipeline: Arc::new(build_checkout_pipeline()),
    })
  }

  /// Re-checks the entry guard after the cart changed. Returns the path to
  /// redirect to, if any. A confirmed or submitting checkout never redirects.
  pub fn guard(&self) -> Option<&'static str> {
    let state_allows = self.session.read().state.accepts_edits();
    (state_allows && self.cart.is_empty()).then_some(CART_PATH)
  }

  pub fn state(&self) -> CheckoutState {
    self.session.read().state.clone()
  }

  pub fn form(&self) -> CheckoutForm {
    self.session.read().form.clone()
  }

  pub fn is_submitting(&self) -> bool {
    matches!(self.session.read().state, CheckoutState::Submitting)
  }

  /// The banner message of the last failed submission, if any.
  pub fn submit_error(&self) -> Option<String> {
    self.session.read().submit_error.clone()
  }

  pub fn validation_errors(&self) -> Option<ValidationErrors> {
    match &self.session.read().state {
      CheckoutState::Blocked(errors) => Some(errors.clone()),
      _ => None,
    }
  }

  pub fn confirmation(&self) -> Option<Confirmation> {
    match &self.session.read().state {
      CheckoutState::Confirmed(confirmation) => Some(confirmation.clone()),
      _ => None,
    }
  }

  pub fn set_field(&self, field: CheckoutField, value: impl Into<String>) -> StoreResult<()> {
    self.edit(|form| form.set_field(field, value.into()))
  }

  pub fn set_shipping(&self, shipping: ShippingInfo) -> StoreResult<()> {
    self.edit(|form| form.shipping = shipping)
  }

  pub fn select_payment_method(&self, method: PaymentMethod) -> StoreResult<()> {
    self.edit(|form| form.payment_method = method)
  }

  fn edit(&self, apply: impl FnOnce(&mut CheckoutForm)) -> StoreResult<()> {
    let mut guard = self.session.write();
    if !guard.state.accepts_edits() {
      return Err(StoreError::CheckoutLocked);
    }
    apply(&mut guard.form);
    Ok(())
  }

  /// Abandons the page. A submission still outstanding keeps running and
  /// keeps the in-flight guard until it finishes, but its result no longer
  /// changes this flow's state.
  pub fn leave(&self) {
    let mut guard = self.session.write();
    guard.attempt += 1;
    if matches!(guard.state, CheckoutState::Submitting) {
      warn!("Checkout left while an order submission is outstanding.");
    }
  }

  /// Validates the form and, if it passes, places the order.
  #[instrument(name = "CheckoutFlow::submit", skip(self))]
  pub async fn submit(&self) -> SubmitOutcome {
    let (attempt, form) = {
      let mut guard = self.session.write();
      match &guard.state {
        CheckoutState::Submitting => {
          info!("Submit ignored; a submission is already outstanding.");
          return SubmitOutcome::InFlight;
        }
        CheckoutState::Confirmed(_) => return SubmitOutcome::AlreadyConfirmed,
        CheckoutState::Editing | CheckoutState::Blocked(_) => {}
      }
      guard.state = CheckoutState::Submitting;
      guard.submit_error = None;
      (guard.attempt, guard.form.clone())
    };

    let ctx_data = ContextData::new(CheckoutCtxData::new(
      self.data.clone(),
      self.cart.clone(),
      self.redirects.clone(),
      form.shipping.clone(),
      form.payment_details(),
    ));
    let result = self.pipeline.run(ctx_data.clone()).await;
    let outcome = outcome_of(result, &ctx_data, &form);

    let mut guard = self.session.write();
    if guard.attempt != attempt {
      info!(outcome = ?outcome, "Checkout was left before submission finished; result not applied.");
      if matches!(guard.state, CheckoutState::Submitting) {
        guard.state = CheckoutState::Editing;
      }
      return outcome;
    }
    match &outcome {
      SubmitOutcome::Blocked(errors) => guard.state = CheckoutState::Blocked(errors.clone()),
      SubmitOutcome::Confirmed(confirmation) => guard.state = CheckoutState::Confirmed(confirmation.clone()),
      SubmitOutcome::EmptyCart => {
        guard.state = CheckoutState::Editing;
        guard.submit_error = Some(EMPTY_CART_MESSAGE.to_string());
      }
      SubmitOutcome::Failed { message } => {
        guard.state = CheckoutState::Editing;
        guard.submit_error = Some(message.clone());
      }
      SubmitOutcome::LoginRequired { .. } | SubmitOutcome::InFlight | SubmitOutcome::AlreadyConfirmed => {
        guard.state = CheckoutState::Editing;
      }
    }
    outcome
  }
}

fn outcome_of(
  result: Result<PipelineResult, StoreError>,
  ctx_data: &ContextData<CheckoutCtxData>,
  form: &CheckoutForm,
) -> SubmitOutcome {
  let guard = ctx_data.read();
  match result {
    Err(err) => {
      error!(error = %err, "Order submission failed.");
      SubmitOutcome::Failed {
        message: err.user_message(),
      }
    }
    Ok(PipelineResult::Stopped) => match &guard.halt {
      Some(CheckoutHalt::Invalid(errors)) => SubmitOutcome::Blocked(errors.clone()),
      Some(CheckoutHalt::EmptyCart) => SubmitOutcome::EmptyCart,
      Some(CheckoutHalt::LoginRequired { return_to }) => SubmitOutcome::LoginRequired {
        return_to: return_to.clone(),
      },
      None => SubmitOutcome::Failed {
        message: StoreError::Internal("checkout stopped without a reason".to_string()).user_message(),
      },
    },
    Ok(PipelineResult::Completed) => match &guard.placed_order {
      Some(order) => SubmitOutcome::Confirmed(Confirmation {
        order: order.clone(),
        shipping: form.shipping.clone(),
        payment_method: form.payment_method,
      }),
      None => SubmitOutcome::Failed {
        message: StoreError::Internal("checkout finished without an order".to_string()).user_message(),
      },
    },
  }
}
