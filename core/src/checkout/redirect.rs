// storefront/src/checkout/redirect.rs

use crate::pipeline::ContextData;

pub const HOME_PATH: &str = "/";
pub const CART_PATH: &str = "/cart";
pub const CHECKOUT_PATH: &str = "/checkout";
pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Remembers where to send the shopper after they sign in.
///
/// Clones share the same slot; the auth flow consumes it on sign-in.
#[derive(Debug, Clone, Default)]
pub struct RedirectMemory(ContextData<Option<String>>);

impl RedirectMemory {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn remember(&self, path: impl Into<String>) {
    *self.0.write() = Some(path.into());
  }

  pub fn peek(&self) -> Option<String> {
    self.0.read().clone()
  }

  pub fn take(&self) -> Option<String> {
    self.0.write().take()
  }
}
