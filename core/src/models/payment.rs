// storefront/src/models/payment.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The payment method recorded on an order. Only the method is stored;
/// card and UPI details never leave the checkout form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
  #[default]
  Card,
  Upi,
  Cod,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Card => "card",
      PaymentMethod::Upi => "upi",
      PaymentMethod::Cod => "cod",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      PaymentMethod::Card => "Card",
      PaymentMethod::Upi => "UPI",
      PaymentMethod::Cod => "Cash on Delivery",
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
  pub number: String,
  pub expiry: String,
  pub cvv: String,
  pub holder: String,
}

// Card number and CVV stay out of logs.
impl fmt::Debug for CardDetails {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CardDetails")
      .field("number", &"[REDACTED]")
      .field("expiry", &self.expiry)
      .field("cvv", &"[REDACTED]")
      .field("holder", &self.holder)
      .finish()
  }
}

/// Details for exactly one payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDetails {
  Card(CardDetails),
  Upi { id: String },
  CashOnDelivery,
}

impl PaymentDetails {
  pub fn method(&self) -> PaymentMethod {
    match self {
      PaymentDetails::Card(_) => PaymentMethod::Card,
      PaymentDetails::Upi { .. } => PaymentMethod::Upi,
      PaymentDetails::CashOnDelivery => PaymentMethod::Cod,
    }
  }
}
