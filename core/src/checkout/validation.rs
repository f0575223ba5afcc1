// storefront/src/checkout/validation.rs

//! Field validation for the checkout form.
//!
//! Validation is a pure function of the submitted shipping and payment
//! details; it never reaches the data-access layer.

use crate::models::{PaymentDetails, ShippingInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

static CARD_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{16}$").expect("valid card number regex"));
static EXPIRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}$").expect("valid expiry regex"));
static CVV: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}$").expect("valid cvv regex"));
static UPI_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+$").expect("valid upi regex"));

/// A checkout form field that can carry an error.
///
/// Serialized with the form's field keys (`cardNumber`, `upi`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
  Name,
  Address,
  City,
  State,
  Zip,
  CardNumber,
  Expiry,
  Cvv,
  Holder,
  Upi,
}

impl CheckoutField {
  pub fn key(&self) -> &'static str {
    match self {
      CheckoutField::Name => "name",
      CheckoutField::Address => "address",
      CheckoutField::City => "city",
      CheckoutField::State => "state",
      CheckoutField::Zip => "zip",
      CheckoutField::CardNumber => "cardNumber",
      CheckoutField::Expiry => "expiry",
      CheckoutField::Cvv => "cvv",
      CheckoutField::Holder => "holder",
      CheckoutField::Upi => "upi",
    }
  }
}

impl fmt::Display for CheckoutField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Field name → message. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<CheckoutField, String>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, field: CheckoutField, message: impl Into<String>) {
    self.0.insert(field, message.into());
  }

  pub fn get(&self, field: CheckoutField) -> Option<&str> {
    self.0.get(&field).map(String::as_str)
  }

  pub fn contains(&self, field: CheckoutField) -> bool {
    self.0.contains_key(&field)
  }

  pub fn fields(&self) -> Vec<CheckoutField> {
    self.0.keys().copied().collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
    self.0.iter().map(|(field, message)| (*field, message.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, (field, message)) in self.0.iter().enumerate() {
      if idx > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", field, message)?;
    }
    Ok(())
  }
}

fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}

/// Validates shipping and payment details, returning every failing field.
pub fn validate(shipping: &ShippingInfo, payment: &PaymentDetails) -> ValidationErrors {
  let mut errors = ValidationErrors::new();

  let required = [
    (CheckoutField::Name, &shipping.name, "Name required"),
    (CheckoutField::Address, &shipping.address, "Address required"),
    (CheckoutField::City, &shipping.city, "City required"),
    (CheckoutField::State, &shipping.state, "State required"),
    (CheckoutField::Zip, &shipping.zip, "Zip required"),
  ];
  for (field, value, message) in required {
    if is_blank(value) {
      errors.insert(field, message);
    }
  }

  match payment {
    PaymentDetails::Card(card) => {
      if !CARD_NUMBER.is_match(&card.number) {
        errors.insert(CheckoutField::CardNumber, "Card number must be 16 digits");
      }
      if !EXPIRY.is_match(&card.expiry) {
        errors.insert(CheckoutField::Expiry, "Expiry must be MM/YY");
      }
      if !CVV.is_match(&card.cvv) {
        errors.insert(CheckoutField::Cvv, "CVV must be 3 digits");
      }
      if is_blank(&card.holder) {
        errors.insert(CheckoutField::Holder, "Card holder name required");
      }
    }
    PaymentDetails::Upi { id } => {
      if !UPI_ID.is_match(id) {
        errors.insert(CheckoutField::Upi, "Enter valid UPI ID");
      }
    }
    PaymentDetails::CashOnDelivery => {}
  }

  errors
}
