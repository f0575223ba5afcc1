// storefront/src/checkout/pipeline.rs

//! The order-placement pipeline behind `CheckoutFlow::submit`.

use crate::backend::DataAccess;
use crate::cart::CartStore;
use crate::checkout::redirect::{RedirectMemory, CHECKOUT_PATH, LOGIN_PATH};
use crate::checkout::validation::{validate, ValidationErrors};
use crate::errors::{StoreError, StoreResult};
use crate::models::{NewOrder, Order, PaymentDetails, Session, ShippingInfo};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Why a run stopped early without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutHalt {
  Invalid(ValidationErrors),
  EmptyCart,
  LoginRequired { return_to: String },
}

/// Per-submission context shared by the checkout steps.
pub struct CheckoutCtxData {
  pub data: Arc<dyn DataAccess>,
  pub cart: CartStore,
  pub redirects: RedirectMemory,
  pub shipping: ShippingInfo,
  pub payment: PaymentDetails,
  pub halt: Option<CheckoutHalt>,
  pub session: Option<Session>,
  pub pending_order: Option<NewOrder>,
  pub placed_order: Option<Order>,
}

impl CheckoutCtxData {
  pub fn new(
    data: Arc<dyn DataAccess>,
    cart: CartStore,
    redirects: RedirectMemory,
    shipping: ShippingInfo,
    payment: PaymentDetails,
  ) -> Self {
    Self {
      data,
      cart,
      redirects,
      shipping,
      payment,
      halt: None,
      session: None,
      pending_order: None,
      placed_order: None,
    }
  }
}

impl fmt::Debug for CheckoutCtxData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CheckoutCtxData")
      .field("payment_method", &self.payment.method())
      .field("halt", &self.halt)
      .field("user_id", &self.session.as_ref().map(|s| s.user.id))
      .field("placed_order", &self.placed_order.as_ref().map(|o| o.id))
      .finish()
  }
}

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, StoreError> {
  let mut p = Pipeline::<CheckoutCtxData, StoreError>::new(&[
    ("validate_checkout_form", false, None),
    ("ensure_cart_not_empty", false, None),
    ("resolve_session", false, None),
    ("build_order_from_cart", false, None),
    ("insert_order", false, None),
    ("clear_cart", false, None),
  ]);

  p.on_root("validate_checkout_form", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let errors = validate(&guard.shipping, &guard.payment);
      if errors.is_empty() {
        return Ok::<_, StoreError>(PipelineControl::Continue);
      }
      info!(fields = %errors, "Checkout blocked by validation errors.");
      guard.halt = Some(CheckoutHalt::Invalid(errors));
      Ok(PipelineControl::Stop)
    })
  });

  p.on_root("ensure_cart_not_empty", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      if guard.cart.is_empty() {
        warn!("Checkout submitted with an empty cart.");
        guard.halt = Some(CheckoutHalt::EmptyCart);
        return Ok::<_, StoreError>(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  });

  p.on_root("resolve_session", resolve_session);
  p.on_root("build_order_from_cart", build_order_from_cart);
  p.on_root("insert_order", insert_order);

  p.on_root("clear_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let cart = ctx_data.read().cart.clone();
      cart.clear_cart();
      Ok::<_, StoreError>(PipelineControl::Continue)
    })
  });

  p
}

async fn resolve_session(ctx_data: ContextData<CheckoutCtxData>) -> StoreResult<PipelineControl> {
  let data = ctx_data.read().data.clone();
  let session = data.get_session().await?;

  let mut guard = ctx_data.write();
  match session {
    Some(session) => {
      guard.session = Some(session);
      Ok(PipelineControl::Continue)
    }
    None => {
      info!("No session; diverting checkout to login.");
      guard.redirects.remember(CHECKOUT_PATH);
      guard.halt = Some(CheckoutHalt::LoginRequired {
        return_to: LOGIN_PATH.to_string(),
      });
      Ok(PipelineControl::Stop)
    }
  }
}

async fn build_order_from_cart(ctx_data: ContextData<CheckoutCtxData>) -> StoreResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let user_id = guard
    .session
    .as_ref()
    .map(|session| session.user.id)
    .ok_or_else(|| StoreError::Internal("Order built before the session was resolved".to_string()))?;

  let snapshot = guard.cart.snapshot();
  if snapshot.is_empty() {
    guard.halt = Some(CheckoutHalt::EmptyCart);
    return Ok(PipelineControl::Stop);
  }

  let order = NewOrder::from_snapshot(user_id, snapshot, guard.shipping.clone(), guard.payment.method());
  info!(
    items = order.items.len(),
    total = %order.total_amount,
    payment_method = %order.payment_method,
    "Order built from cart snapshot."
  );
  guard.pending_order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn insert_order(ctx_data: ContextData<CheckoutCtxData>) -> StoreResult<PipelineControl> {
  let (data, order) = {
    let mut guard = ctx_data.write();
    let order = guard
      .pending_order
      .take()
      .ok_or_else(|| StoreError::Internal("No order to submit".to_string()))?;
    (guard.data.clone(), order)
  };

  let placed = data.insert_order(order).await.map_err(|err| match err {
    StoreError::NotConfigured { .. } => err,
    other => StoreError::Submission(other.user_message()),
  })?;

  info!(order_id = %placed.id, "Order placed.");
  ctx_data.write().placed_order = Some(placed);
  Ok(PipelineControl::Continue)
}
