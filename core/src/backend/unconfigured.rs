// storefront/src/backend/unconfigured.rs

use crate::backend::{AuthListener, AuthSubscription, DataAccess, ProductQuery};
use crate::errors::{StoreError, StoreResult};
use crate::models::{NewOrder, NewProduct, Order, Product, ProductId, ProductPatch, Role, Session, User, UserId};
use async_trait::async_trait;
use tracing::warn;

/// Stands in for the hosted service when its connection settings are
/// missing. Every call fails immediately with `StoreError::NotConfigured`.
#[derive(Debug, Clone)]
pub struct UnconfiguredBackend {
  missing: Vec<String>,
}

impl UnconfiguredBackend {
  pub fn new(missing: Vec<String>) -> Self {
    Self { missing }
  }

  pub fn missing(&self) -> &[String] {
    &self.missing
  }

  fn fail<T>(&self, operation: &'static str) -> StoreResult<T> {
    warn!(operation, missing = ?self.missing, "Backend call rejected: service is not configured.");
    Err(StoreError::NotConfigured {
      missing: self.missing.clone(),
    })
  }
}

#[async_trait]
impl DataAccess for UnconfiguredBackend {
  async fn get_session(&self) -> StoreResult<Option<Session>> {
    self.fail("get_session")
  }

  async fn sign_in(&self, _email: &str, _password: &str) -> StoreResult<Session> {
    self.fail("sign_in")
  }

  async fn sign_up(&self, _email: &str, _password: &str) -> StoreResult<User> {
    self.fail("sign_up")
  }

  async fn sign_out(&self) -> StoreResult<()> {
    self.fail("sign_out")
  }

  async fn query_products(&self, _query: &ProductQuery) -> StoreResult<Vec<Product>> {
    self.fail("query_products")
  }

  async fn get_product(&self, _id: ProductId) -> StoreResult<Option<Product>> {
    self.fail("get_product")
  }

  async fn insert_order(&self, _order: NewOrder) -> StoreResult<Order> {
    self.fail("insert_order")
  }

  async fn orders_for_user(&self, _user_id: UserId) -> StoreResult<Vec<Order>> {
    self.fail("orders_for_user")
  }

  async fn ensure_profile(&self, _user_id: UserId) -> StoreResult<Role> {
    self.fail("ensure_profile")
  }

  async fn insert_product(&self, _product: NewProduct) -> StoreResult<Product> {
    self.fail("insert_product")
  }

  async fn update_product(&self, _id: ProductId, _patch: ProductPatch) -> StoreResult<Product> {
    self.fail("update_product")
  }

  async fn delete_product(&self, _id: ProductId) -> StoreResult<()> {
    self.fail("delete_product")
  }

  fn on_auth_state_change(&self, _listener: AuthListener) -> StoreResult<AuthSubscription> {
    self.fail("on_auth_state_change")
  }
}
