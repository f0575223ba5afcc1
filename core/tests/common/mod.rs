// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use chrono::Utc;
use storefront::models::{CardDetails, Money, Product, ProductId, Session, ShippingInfo};
use storefront::pipeline::{ContextData, Handler, PipelineControl, PipelineError};
use storefront::{DataAccess, InMemoryBackend};
use std::sync::Arc;
use tracing::Level;

// --- Pipeline test context and error ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(pe: PipelineError) -> Self {
    TestError::Pipeline(pe.to_string())
  }
}

pub fn create_simple_handler(step_name: &'static str, message_to_append: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing setup (once per test binary) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Storefront fixtures ---
pub const SHOPPER_EMAIL: &str = "shopper@example.com";
pub const SHOPPER_PASSWORD: &str = "secret123";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";

pub fn product(id: i64, title: &str, price_major: i64) -> Product {
  Product {
    id: ProductId(id),
    title: title.to_string(),
    description: None,
    price: Money::from_major(price_major),
    category: "Laptops".to_string(),
    image: format!("/images/{}.jpg", id),
    specs: vec!["8GB RAM".to_string()],
    stock: 10,
    created_at: Utc::now(),
  }
}

pub fn full_shipping() -> ShippingInfo {
  ShippingInfo {
    name: "Asha Rao".to_string(),
    address: "12 MG Road".to_string(),
    city: "Bengaluru".to_string(),
    state: "KA".to_string(),
    zip: "560001".to_string(),
  }
}

pub fn valid_card() -> CardDetails {
  CardDetails {
    number: "1234567890123456".to_string(),
    expiry: "11/27".to_string(),
    cvv: "123".to_string(),
    holder: "A".to_string(),
  }
}

pub fn as_data(backend: &Arc<InMemoryBackend>) -> Arc<dyn DataAccess> {
  backend.clone()
}

/// A backend with a registered shopper who is currently signed in.
pub async fn backend_with_shopper() -> (Arc<InMemoryBackend>, Session) {
  let backend = Arc::new(InMemoryBackend::new());
  backend
    .sign_up(SHOPPER_EMAIL, SHOPPER_PASSWORD)
    .await
    .expect("shopper sign-up");
  let session = backend
    .sign_in(SHOPPER_EMAIL, SHOPPER_PASSWORD)
    .await
    .expect("shopper sign-in");
  (backend, session)
}

/// Registers an admin account (role granted) and leaves nobody signed in.
pub async fn register_admin(backend: &InMemoryBackend) {
  let admin = backend.sign_up(ADMIN_EMAIL, ADMIN_PASSWORD).await.expect("admin sign-up");
  backend.grant_role(admin.id, storefront::models::Role::Admin);
}
