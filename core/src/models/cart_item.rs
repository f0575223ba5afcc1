// storefront/src/models/cart_item.rs

use crate::models::{Money, Product, ProductId};
use serde::{Deserialize, Serialize};

/// One product entry in the cart with its quantity.
///
/// The product record is copied when the line is created, so later catalog
/// edits do not reach items already in a cart or in a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
  #[serde(flatten)]
  pub product: Product,
  pub quantity: u32,
}

impl CartLineItem {
  pub fn new(product: Product) -> Self {
    Self { product, quantity: 1 }
  }

  pub fn id(&self) -> ProductId {
    self.product.id
  }

  pub fn price(&self) -> Money {
    self.product.price
  }

  pub fn line_total(&self) -> Money {
    self.product.price * self.quantity
  }
}
