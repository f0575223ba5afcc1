// storefront/src/cart/snapshot.rs

use crate::models::{CartLineItem, Money};
use serde::{Deserialize, Serialize};

/// An owned copy of the cart's lines taken at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot {
  items: Vec<CartLineItem>,
}

impl CartSnapshot {
  pub fn new(items: Vec<CartLineItem>) -> Self {
    Self { items }
  }

  pub fn items(&self) -> &[CartLineItem] {
    &self.items
  }

  pub fn into_items(self) -> Vec<CartLineItem> {
    self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Sum of quantities, i.e. the badge count.
  pub fn count(&self) -> u64 {
    self.items.iter().map(|item| u64::from(item.quantity)).sum()
  }

  pub fn total(&self) -> Money {
    self.items.iter().map(CartLineItem::line_total).sum()
  }
}
