// storefront/src/models/shipping.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
  pub name: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub zip: String,
}

impl ShippingInfo {
  /// One-line rendering used on the confirmation screen.
  pub fn delivery_line(&self) -> String {
    format!("{}, {}, {} - {}", self.address, self.city, self.state, self.zip)
  }
}
