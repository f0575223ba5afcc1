// storefront/src/backend/in_memory.rs

//! In-memory implementation of `DataAccess` for tests, demos and development.

use crate::auth::MIN_PASSWORD_LEN;
use crate::backend::password::{hash_password, verify_password};
use crate::backend::{AuthListener, AuthListeners, AuthSubscription, DataAccess, ProductQuery};
use crate::errors::{StoreError, StoreResult};
use crate::models::{
  AuthEvent, NewOrder, NewProduct, Order, Product, ProductId, ProductPatch, Role, Session, User, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

struct Account {
  user: User,
  password_hash: String,
}

/// A single-tenant stand-in for the hosted database and auth service.
///
/// Holds one current session, like a browser client would. Orders are kept
/// as JSON rows and decoded on read, so every order handed back has passed
/// through the same typed boundary a remote table would impose.
pub struct InMemoryBackend {
  accounts: RwLock<HashMap<String, Account>>,
  roles: RwLock<HashMap<UserId, Role>>,
  session: RwLock<Option<Session>>,
  products: RwLock<Vec<Product>>,
  next_product_id: AtomicI64,
  orders: RwLock<Vec<serde_json::Value>>,
  order_failure: RwLock<Option<String>>,
  order_latency: RwLock<Option<Duration>>,
  order_insert_attempts: AtomicUsize,
  listeners: AuthListeners,
}

impl Default for InMemoryBackend {
  fn default() -> Self {
    Self::new()
  }
}

impl InMemoryBackend {
  pub fn new() -> Self {
    Self {
      accounts: RwLock::new(HashMap::new()),
      roles: RwLock::new(HashMap::new()),
      session: RwLock::new(None),
      products: RwLock::new(Vec::new()),
      next_product_id: AtomicI64::new(1),
      orders: RwLock::new(Vec::new()),
      order_failure: RwLock::new(None),
      order_latency: RwLock::new(None),
      order_insert_attempts: AtomicUsize::new(0),
      listeners: AuthListeners::new(),
    }
  }

  /// Inserts catalog rows directly, bypassing the admin check.
  pub fn seed_products(&self, products: Vec<NewProduct>) -> Vec<Product> {
    let created_at = Utc::now();
    let seeded: Vec<Product> = products
      .into_iter()
      .map(|new_product| self.materialize(new_product, created_at))
      .collect();
    self.products.write().extend(seeded.iter().cloned());
    info!(count = seeded.len(), "Seeded products.");
    seeded
  }

  pub fn grant_role(&self, user_id: UserId, role: Role) {
    self.roles.write().insert(user_id, role);
  }

  /// While set, every `insert_order` fails with this message.
  pub fn inject_order_failure(&self, message: Option<String>) {
    *self.order_failure.write() = message;
  }

  /// Delays every `insert_order` by `latency`.
  pub fn set_order_latency(&self, latency: Option<Duration>) {
    *self.order_latency.write() = latency;
  }

  /// How many times `insert_order` was called, successful or not.
  pub fn order_insert_attempts(&self) -> usize {
    self.order_insert_attempts.load(Ordering::SeqCst)
  }

  /// Every stored order regardless of owner, oldest first.
  pub fn all_orders(&self) -> StoreResult<Vec<Order>> {
    let rows = self.orders.read().clone();
    rows.into_iter().map(decode_order).collect()
  }

  pub fn listener_count(&self) -> usize {
    self.listeners.len()
  }

  fn materialize(&self, new_product: NewProduct, created_at: chrono::DateTime<Utc>) -> Product {
    Product {
      id: ProductId(self.next_product_id.fetch_add(1, Ordering::SeqCst)),
      title: new_product.title,
      description: new_product.description,
      price: new_product.price,
      category: new_product.category,
      image: new_product.image,
      specs: new_product.specs,
      stock: new_product.stock,
      created_at,
    }
  }

  fn current_session(&self) -> Option<Session> {
    self.session.read().clone()
  }

  fn require_user(&self, user_id: UserId, action: &str) -> StoreResult<Session> {
    match self.current_session() {
      Some(session) if session.user.id == user_id => Ok(session),
      Some(_) => Err(StoreError::Auth(format!("Not allowed to {} for another user", action))),
      None => Err(StoreError::Auth(format!("Sign in required to {}", action))),
    }
  }

  fn require_admin(&self) -> StoreResult<Session> {
    let session = self
      .current_session()
      .ok_or_else(|| StoreError::Forbidden("Admin access required".to_string()))?;
    match self.roles.read().get(&session.user.id) {
      Some(Role::Admin) => Ok(session),
      _ => {
        warn!(user_id = %session.user.id, "Product mutation rejected for non-admin session.");
        Err(StoreError::Forbidden("Admin access required".to_string()))
      }
    }
  }
}

fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

fn decode_order(row: serde_json::Value) -> StoreResult<Order> {
  serde_json::from_value(row).map_err(|e| StoreError::Internal(format!("Malformed order row: {}", e)))
}

#[async_trait]
impl DataAccess for InMemoryBackend {
  async fn get_session(&self) -> StoreResult<Option<Session>> {
    Ok(self.current_session())
  }

  #[instrument(name = "InMemoryBackend::sign_in", skip(self, password), err(Display))]
  async fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session> {
    let invalid = || StoreError::Auth("Invalid login credentials".to_string());
    let (user, password_hash) = {
      let accounts = self.accounts.read();
      let account = accounts.get(&normalize_email(email)).ok_or_else(invalid)?;
      (account.user.clone(), account.password_hash.clone())
    };
    if !verify_password(&password_hash, password)? {
      return Err(invalid());
    }

    let session = Session {
      access_token: Uuid::new_v4().to_string(),
      user,
    };
    *self.session.write() = Some(session.clone());
    info!(user_id = %session.user.id, "User signed in.");
    self.listeners.notify(AuthEvent::SignedIn, Some(&session));
    Ok(session)
  }

  #[instrument(name = "InMemoryBackend::sign_up", skip(self, password), err(Display))]
  async fn sign_up(&self, email: &str, password: &str) -> StoreResult<User> {
    let key = normalize_email(email);
    match key.split_once('@') {
      Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
      _ => {
        return Err(StoreError::InvalidInput(
          "Unable to validate email address: invalid format".to_string(),
        ))
      }
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
      return Err(StoreError::InvalidInput(format!(
        "Password should be at least {} characters",
        MIN_PASSWORD_LEN
      )));
    }
    if self.accounts.read().contains_key(&key) {
      return Err(StoreError::Conflict("User already registered".to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = User {
      id: UserId::new(),
      email: key.clone(),
      created_at: Utc::now(),
    };
    let mut accounts = self.accounts.write();
    if accounts.contains_key(&key) {
      return Err(StoreError::Conflict("User already registered".to_string()));
    }
    accounts.insert(
      key,
      Account {
        user: user.clone(),
        password_hash,
      },
    );
    info!(user_id = %user.id, "User registered.");
    Ok(user)
  }

  #[instrument(name = "InMemoryBackend::sign_out", skip(self))]
  async fn sign_out(&self) -> StoreResult<()> {
    let previous = self.session.write().take();
    if let Some(session) = previous {
      info!(user_id = %session.user.id, "User signed out.");
      self.listeners.notify(AuthEvent::SignedOut, None);
    }
    Ok(())
  }

  async fn query_products(&self, query: &ProductQuery) -> StoreResult<Vec<Product>> {
    let mut products: Vec<Product> = self
      .products
      .read()
      .iter()
      .filter(|product| query.matches(product))
      .cloned()
      .collect();
    query.sort(&mut products);
    Ok(products)
  }

  async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
    Ok(self.products.read().iter().find(|p| p.id == id).cloned())
  }

  #[instrument(
    name = "InMemoryBackend::insert_order",
    skip(self, order),
    fields(user_id = %order.user_id, total = %order.total_amount),
    err(Display)
  )]
  async fn insert_order(&self, order: NewOrder) -> StoreResult<Order> {
    self.order_insert_attempts.fetch_add(1, Ordering::SeqCst);
    let latency = *self.order_latency.read();
    if let Some(latency) = latency {
      tokio::time::sleep(latency).await;
    }

    let injected = self.order_failure.read().clone();
    if let Some(message) = injected {
      warn!(%message, "Order insert failed (injected).");
      return Err(StoreError::Submission(message));
    }
    self.require_user(order.user_id, "create orders")?;
    if order.items.is_empty() {
      return Err(StoreError::InvalidInput("An order needs at least one item".to_string()));
    }

    let order = Order::from_new(order, Uuid::new_v4(), Utc::now());
    let row = serde_json::to_value(&order).map_err(|e| StoreError::Internal(format!("Order encoding failed: {}", e)))?;
    self.orders.write().push(row);
    debug!(order_id = %order.id, "Order stored.");
    Ok(order)
  }

  async fn orders_for_user(&self, user_id: UserId) -> StoreResult<Vec<Order>> {
    self.require_user(user_id, "view orders")?;
    let rows = self.orders.read().clone();
    let mut orders = rows
      .into_iter()
      .rev()
      .map(decode_order)
      .filter(|decoded| decoded.as_ref().map_or(true, |order| order.user_id == user_id))
      .collect::<StoreResult<Vec<Order>>>()?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
  }

  async fn ensure_profile(&self, user_id: UserId) -> StoreResult<Role> {
    self.require_user(user_id, "read the profile")?;
    let role = *self.roles.write().entry(user_id).or_insert(Role::User);
    Ok(role)
  }

  #[instrument(name = "InMemoryBackend::insert_product", skip(self, product), fields(title = %product.title), err(Display))]
  async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
    self.require_admin()?;
    let product = self.materialize(product, Utc::now());
    self.products.write().push(product.clone());
    info!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "InMemoryBackend::update_product", skip(self, patch), err(Display))]
  async fn update_product(&self, id: ProductId, patch: ProductPatch) -> StoreResult<Product> {
    self.require_admin()?;
    let mut products = self.products.write();
    let product = products
      .iter_mut()
      .find(|p| p.id == id)
      .ok_or_else(|| StoreError::NotFound(format!("Product {} not found", id)))?;
    patch.apply_to(product);
    info!(product_id = %id, "Product updated.");
    Ok(product.clone())
  }

  #[instrument(name = "InMemoryBackend::delete_product", skip(self), err(Display))]
  async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
    self.require_admin()?;
    let mut products = self.products.write();
    let before = products.len();
    products.retain(|p| p.id != id);
    if products.len() == before {
      return Err(StoreError::NotFound(format!("Product {} not found", id)));
    }
    info!(product_id = %id, "Product deleted.");
    Ok(())
  }

  fn on_auth_state_change(&self, listener: AuthListener) -> StoreResult<AuthSubscription> {
    Ok(self.listeners.subscribe(listener))
  }
}
