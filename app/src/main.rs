// storefront-demo/src/main.rs

//! Drives a scripted shopping session against the in-memory storefront
//! service: browse, fill a cart, check out (including the login detour and a
//! double-clicked submit), review orders and manage the catalog as admin.

mod config;
mod errors;

use crate::config::AppConfig;
use crate::errors::{DemoError, Result as DemoResult};

use futures_util::future::join;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use storefront::models::{AuthEvent, PaymentMethod, Role, Session, ShippingInfo};
use storefront::{
  generate_products, AdminConsole, AuthFlow, CartStore, Catalog, CheckoutEntry, CheckoutField, CheckoutFlow,
  DataAccess, InMemoryBackend, OrderHistory, ProductDraft, RedirectMemory, SignUpForm, SubmitOutcome,
  UnconfiguredBackend,
};
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;

fn init_tracing(json: bool) {
  let builder = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config = AppConfig::from_env()?;
  init_tracing(config.log_json);
  info!(?config, "Starting storefront demo...");

  match config.backend.unconfigured_backend() {
    Some(backend) => run_unconfigured(backend).await?,
    None => run_session(&config).await?,
  }

  info!("Storefront demo finished.");
  Ok(())
}

fn demo_shipping() -> ShippingInfo {
  ShippingInfo {
    name: "Asha Rao".to_string(),
    address: "12 MG Road".to_string(),
    city: "Bengaluru".to_string(),
    state: "KA".to_string(),
    zip: "560001".to_string(),
  }
}

fn open_checkout(data: &Arc<dyn DataAccess>, cart: &CartStore, redirects: &RedirectMemory) -> DemoResult<CheckoutFlow> {
  match CheckoutFlow::enter(data.clone(), cart.clone(), redirects.clone()) {
    CheckoutEntry::Ready(flow) => Ok(flow),
    CheckoutEntry::RedirectToCart => Err(DemoError::scenario("open_checkout", "cart is empty")),
  }
}

/// Without backend settings every operation fails fast; show the one message
/// a shopper would see.
async fn run_unconfigured(backend: UnconfiguredBackend) -> DemoResult<()> {
  warn!(missing = ?backend.missing(), "Running against an unconfigured backend.");
  let data: Arc<dyn DataAccess> = Arc::new(backend);

  // Catalog reads fail too, so take a line from a scratch seed.
  let scratch = InMemoryBackend::new().seed_products(generate_products(1));
  let cart = CartStore::new();
  if let Some(product) = scratch.first() {
    cart.add_to_cart(product);
  }

  let flow = open_checkout(&data, &cart, &RedirectMemory::new())?;
  flow.set_shipping(demo_shipping())?;
  flow.select_payment_method(PaymentMethod::Cod)?;
  match flow.submit().await {
    SubmitOutcome::Failed { message } => {
      warn!(%message, "Checkout failed as expected.");
      Ok(())
    }
    other => Err(DemoError::scenario("unconfigured_submit", other)),
  }
}

async fn register_admin(backend: &InMemoryBackend, config: &AppConfig) -> DemoResult<()> {
  let admin = backend.sign_up(&config.admin_email, &config.admin_password).await?;
  backend.grant_role(admin.id, Role::Admin);
  info!(email = %admin.email, "Registered admin account.");
  Ok(())
}

async fn run_session(config: &AppConfig) -> DemoResult<()> {
  let backend = Arc::new(InMemoryBackend::new());
  let seeded = backend.seed_products(generate_products(config.seed_per_category));
  info!(count = seeded.len(), "Seeded catalog.");
  register_admin(&backend, config).await?;

  let data: Arc<dyn DataAccess> = backend.clone();
  let redirects = RedirectMemory::new();
  let cart = CartStore::new();

  let _auth_log = data.on_auth_state_change(Arc::new(|event: AuthEvent, session: Option<&Session>| {
    info!(?event, user = ?session.map(|s| s.user.email.clone()), "Auth state changed.");
  }))?;

  // --- Browse ---
  let catalog = Catalog::new(data.clone());
  let groups = catalog.by_category().await?;
  for group in &groups {
    info!(category = %group.category, products = group.products.len(), "Category");
  }

  // --- Fill the cart, watching the change feed ---
  let mut feed = cart.subscribe();
  let feed_task = tokio::spawn(async move {
    loop {
      match feed.recv().await {
        Ok(change) => {
          info!(revision = change.revision, event = ?change.event, count = change.count, total = %change.total, "Cart changed.")
        }
        Err(RecvError::Lagged(skipped)) => warn!(skipped, "Cart feed lagged."),
        Err(RecvError::Closed) => break,
      }
    }
  });

  let picks: Vec<_> = groups.iter().filter_map(|group| group.products.first().cloned()).collect();
  for product in &picks {
    cart.add_to_cart(product);
  }
  if let Some(first) = picks.first() {
    cart.add_to_cart(first);
  }
  if let Some(last) = picks.last() {
    cart.update_quantity_from_input(last.id, " 3 ")?;
  }
  info!(lines = cart.len(), count = cart.count(), total = %cart.total(), "Cart ready.");

  // --- Checkout without a session ---
  let flow = open_checkout(&data, &cart, &redirects)?;
  flow.set_shipping(demo_shipping())?;
  flow.select_payment_method(PaymentMethod::Card)?;
  flow.set_field(CheckoutField::CardNumber, "4111111111111111")?;
  flow.set_field(CheckoutField::Expiry, "12/29")?;
  flow.set_field(CheckoutField::Cvv, "123")?;
  flow.set_field(CheckoutField::Holder, "Asha Rao")?;

  match flow.submit().await {
    SubmitOutcome::LoginRequired { return_to } => info!(%return_to, "Checkout asked for a sign-in."),
    other => return Err(DemoError::scenario("anonymous_submit", other)),
  }

  // --- Sign up, sign in and come back ---
  let auth = AuthFlow::new(data.clone(), redirects.clone());
  auth
    .sign_up(SignUpForm {
      email: config.demo_email.clone(),
      password: config.demo_password.clone(),
      confirm_password: config.demo_password.clone(),
    })
    .await?;
  let signed_in = auth.sign_in(&config.demo_email, &config.demo_password).await?;
  info!(redirect_to = %signed_in.redirect_to, "Signed in.");

  // --- Double-clicked submit against a slow backend ---
  backend.set_order_latency(Some(Duration::from_millis(100)));
  let (first, second) = join(flow.submit(), flow.submit()).await;
  backend.set_order_latency(None);

  let confirmation = match (first, second) {
    (SubmitOutcome::Confirmed(confirmation), SubmitOutcome::InFlight)
    | (SubmitOutcome::InFlight, SubmitOutcome::Confirmed(confirmation)) => confirmation,
    other => return Err(DemoError::scenario("double_submit", other)),
  };
  info!(
    attempts = backend.order_insert_attempts(),
    cart_empty = cart.is_empty(),
    "Order placed once."
  );
  println!("{}", serde_json::to_string_pretty(&confirmation.order)?);

  // --- Order history ---
  let history = OrderHistory::new(data.clone()).for_current_user().await?;
  for order in &history {
    info!(order_id = %order.id, total = %order.total_amount, items = order.items.len(), "Order");
  }
  auth.sign_out().await?;

  // --- Admin ---
  let admin = AdminConsole::new(data.clone());
  admin.sign_in(&config.admin_email, &config.admin_password).await?;
  let added = admin
    .add_product(ProductDraft {
      title: "Framework Laptop 13".to_string(),
      description: "Repairable 13.5 inch laptop".to_string(),
      price: "89999.00".to_string(),
      category: "Laptops".to_string(),
      image: "laptop-framework.jpg".to_string(),
      stock: "5".to_string(),
      specs: vec!["Intel Core Ultra 7".to_string(), "32GB RAM".to_string()],
    })
    .await?;
  info!(id = %added.id, title = %added.title, "Admin added a product.");

  let listed = admin.list_products().await?;
  info!(count = listed.len(), newest = ?listed.first().map(|p| p.title.clone()), "Admin product list.");
  auth.sign_out().await?;

  feed_task.abort();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use storefront::BackendConfig;

  fn demo_config(backend: BackendConfig) -> AppConfig {
    AppConfig {
      backend,
      seed_per_category: 2,
      demo_email: "asha@example.com".to_string(),
      demo_password: "shopper-pass".to_string(),
      admin_email: "owner@example.com".to_string(),
      admin_password: "admin-pass".to_string(),
      log_json: false,
    }
  }

  #[tokio::test]
  async fn scripted_session_completes_against_configured_backend() {
    let config = demo_config(BackendConfig {
      url: Some("http://localhost:54321".to_string()),
      anon_key: Some("anon".to_string()),
    });
    assert!(config.backend.unconfigured_backend().is_none());

    let result = run_session(&config).await;
    assert!(result.is_ok(), "scripted session failed: {:?}", result.err());
  }

  #[tokio::test]
  async fn unconfigured_backend_fails_checkout_with_message() {
    let config = demo_config(BackendConfig { url: None, anon_key: None });
    let backend = config.backend.unconfigured_backend().expect("config lacks url and key");

    let result = run_unconfigured(backend).await;
    assert!(result.is_ok(), "unconfigured run failed: {:?}", result.err());
  }
}
