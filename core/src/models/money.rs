// storefront/src/models/money.rs

use crate::errors::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// An amount in minor currency units (paise, cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
  pub const ZERO: Money = Money(0);

  pub const fn from_minor(minor: i64) -> Self {
    Money(minor)
  }

  pub const fn from_major(major: i64) -> Self {
    Money(major * 100)
  }

  pub const fn minor(&self) -> i64 {
    self.0
  }

  /// Parses decimal text such as `"599.99"`, `"12"` or `"0.5"`.
  ///
  /// At most two fractional digits are accepted; negative amounts are rejected.
  pub fn parse(text: &str) -> StoreResult<Money> {
    let trimmed = text.trim();
    let invalid = || StoreError::InvalidInput(format!("'{}' is not a valid price", text));

    let (whole, fraction) = match trimmed.split_once('.') {
      Some((whole, fraction)) => (whole, fraction),
      None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
      return Err(invalid());
    }
    if fraction.len() > 2 || !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }

    let major: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let minor: i64 = match fraction.len() {
      0 => 0,
      1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
      _ => fraction.parse().map_err(|_| invalid())?,
    };
    major
      .checked_mul(100)
      .and_then(|m| m.checked_add(minor))
      .map(Money)
      .ok_or_else(invalid)
  }

  pub fn checked_add(self, rhs: Money) -> Option<Money> {
    self.0.checked_add(rhs.0).map(Money)
  }

  pub fn checked_mul(self, quantity: u32) -> Option<Money> {
    self.0.checked_mul(i64::from(quantity)).map(Money)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.0 < 0 { "-" } else { "" };
    let abs = self.0.unsigned_abs();
    write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
  }
}

/// Saturates at the `i64` bounds; use `checked_add` where overflow must be refused.
impl Add for Money {
  type Output = Money;

  fn add(self, rhs: Money) -> Money {
    Money(self.0.saturating_add(rhs.0))
  }
}

impl Mul<u32> for Money {
  type Output = Money;

  fn mul(self, rhs: u32) -> Money {
    Money(self.0.saturating_mul(i64::from(rhs)))
  }
}

impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
    iter.fold(Money::ZERO, Add::add)
  }
}
