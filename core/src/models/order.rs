// storefront/src/models/order.rs

use crate::cart::CartSnapshot;
use crate::models::{CartLineItem, Money, PaymentMethod, ShippingInfo, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Paid,
}

impl PaymentStatus {
  /// Cash on delivery is collected later; every other method counts as paid.
  pub fn for_method(method: PaymentMethod) -> Self {
    match method {
      PaymentMethod::Cod => PaymentStatus::Pending,
      PaymentMethod::Card | PaymentMethod::Upi => PaymentStatus::Paid,
    }
  }
}

/// An order as submitted by checkout, before the backend assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
  pub user_id: UserId,
  pub items: Vec<CartLineItem>,
  pub total_amount: Money,
  pub shipping_info: ShippingInfo,
  pub payment_method: PaymentMethod,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
}

impl NewOrder {
  pub fn from_snapshot(
    user_id: UserId,
    snapshot: CartSnapshot,
    shipping_info: ShippingInfo,
    payment_method: PaymentMethod,
  ) -> Self {
    let total_amount = snapshot.total();
    Self {
      user_id,
      items: snapshot.into_items(),
      total_amount,
      shipping_info,
      payment_method,
      status: OrderStatus::Pending,
      payment_status: PaymentStatus::for_method(payment_method),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub user_id: UserId,
  pub items: Vec<CartLineItem>,
  pub total_amount: Money,
  pub shipping_info: ShippingInfo,
  pub payment_method: PaymentMethod,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  pub created_at: DateTime<Utc>,
}

impl Order {
  pub fn from_new(new_order: NewOrder, id: Uuid, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      user_id: new_order.user_id,
      items: new_order.items,
      total_amount: new_order.total_amount,
      shipping_info: new_order.shipping_info,
      payment_method: new_order.payment_method,
      status: new_order.status,
      payment_status: new_order.payment_status,
      created_at,
    }
  }

  pub fn item_count(&self) -> u64 {
    self.items.iter().map(|item| u64::from(item.quantity)).sum()
  }
}
