// storefront/src/backend/mod.rs

//! The data-access seam between the storefront flows and the hosted
//! database/auth service.

pub mod in_memory;
pub(crate) mod password;
pub mod unconfigured;

pub use in_memory::InMemoryBackend;
pub use unconfigured::UnconfiguredBackend;

use crate::errors::StoreResult;
use crate::models::{AuthEvent, NewOrder, NewProduct, Order, Product, ProductId, ProductPatch, Role, Session, User, UserId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
  #[default]
  Newest,
  PriceLowToHigh,
  PriceHighToLow,
  Title,
}

/// Filter and ordering for `DataAccess::query_products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
  pub category: Option<String>,
  /// Case-insensitive substring match on the title.
  pub search: Option<String>,
  pub order: ProductOrder,
}

impl ProductQuery {
  pub fn all() -> Self {
    Self::default()
  }

  pub fn in_category(category: impl Into<String>) -> Self {
    Self {
      category: Some(category.into()),
      ..Self::default()
    }
  }

  pub fn ordered_by(mut self, order: ProductOrder) -> Self {
    self.order = order;
    self
  }

  pub fn matching(mut self, search: impl Into<String>) -> Self {
    self.search = Some(search.into());
    self
  }

  pub fn matches(&self, product: &Product) -> bool {
    let category_ok = self
      .category
      .as_deref()
      .map_or(true, |category| product.category.eq_ignore_ascii_case(category));
    let search_ok = self.search.as_deref().map(str::trim).map_or(true, |needle| {
      needle.is_empty() || product.title.to_lowercase().contains(&needle.to_lowercase())
    });
    category_ok && search_ok
  }

  pub fn sort(&self, products: &mut [Product]) {
    match self.order {
      ProductOrder::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
      ProductOrder::PriceLowToHigh => products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id))),
      ProductOrder::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price).then(a.id.cmp(&b.id))),
      ProductOrder::Title => products.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id))),
    }
  }
}

/// Callback fired after a sign-in or sign-out with the session now current.
pub type AuthListener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static>;

/// Everything the storefront needs from the hosted service.
///
/// Implementations enforce authorisation themselves: callers are never
/// trusted to have checked roles or ownership first.
#[async_trait]
pub trait DataAccess: Send + Sync + 'static {
  async fn get_session(&self) -> StoreResult<Option<Session>>;

  async fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session>;

  async fn sign_up(&self, email: &str, password: &str) -> StoreResult<User>;

  async fn sign_out(&self) -> StoreResult<()>;

  async fn query_products(&self, query: &ProductQuery) -> StoreResult<Vec<Product>>;

  async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>>;

  async fn insert_order(&self, order: NewOrder) -> StoreResult<Order>;

  /// Orders of `user_id`, newest first.
  async fn orders_for_user(&self, user_id: UserId) -> StoreResult<Vec<Order>>;

  /// Returns the user's role, creating a `Role::User` profile when none exists.
  async fn ensure_profile(&self, user_id: UserId) -> StoreResult<Role>;

  async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;

  async fn update_product(&self, id: ProductId, patch: ProductPatch) -> StoreResult<Product>;

  async fn delete_product(&self, id: ProductId) -> StoreResult<()>;

  fn on_auth_state_change(&self, listener: AuthListener) -> StoreResult<AuthSubscription>;
}

#[derive(Default)]
struct ListenerTable {
  next_id: u64,
  listeners: Vec<(u64, AuthListener)>,
}

/// Registry of auth-state listeners, shared by backend implementations.
#[derive(Default)]
pub struct AuthListeners {
  table: Arc<Mutex<ListenerTable>>,
}

impl AuthListeners {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&self, listener: AuthListener) -> AuthSubscription {
    let mut table = self.table.lock();
    table.next_id += 1;
    let id = table.next_id;
    table.listeners.push((id, listener));
    AuthSubscription {
      id,
      table: Arc::downgrade(&self.table),
    }
  }

  /// Calls every listener. The table lock is released first, so a listener
  /// may subscribe or unsubscribe from inside its callback.
  pub fn notify(&self, event: AuthEvent, session: Option<&Session>) {
    let listeners: Vec<AuthListener> = self.table.lock().listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
    for listener in listeners {
      listener(event, session);
    }
  }

  pub fn len(&self) -> usize {
    self.table.lock().listeners.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Debug for AuthListeners {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AuthListeners").field("count", &self.len()).finish()
  }
}

/// Handle returned by `on_auth_state_change`.
pub struct AuthSubscription {
  id: u64,
  table: Weak<Mutex<ListenerTable>>,
}

impl AuthSubscription {
  /// A subscription that is not attached to any registry.
  pub fn detached() -> Self {
    Self { id: 0, table: Weak::new() }
  }

  pub fn unsubscribe(self) {
    if let Some(table) = self.table.upgrade() {
      table.lock().listeners.retain(|(id, _)| *id != self.id);
    }
  }
}

impl fmt::Debug for AuthSubscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AuthSubscription")
      .field("id", &self.id)
      .field("attached", &(self.table.strong_count() > 0))
      .finish()
  }
}
