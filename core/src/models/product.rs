// storefront/src/models/product.rs

use crate::models::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A catalog product as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub title: String,
  pub description: Option<String>,
  pub price: Money,
  pub category: String,
  pub image: String,
  #[serde(default)]
  pub specs: Vec<String>,
  pub stock: u32,
  pub created_at: DateTime<Utc>,
}

/// Product fields supplied on insert; the backend assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
  pub title: String,
  pub description: Option<String>,
  pub price: Money,
  pub category: String,
  pub image: String,
  pub specs: Vec<String>,
  pub stock: u32,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
  pub title: Option<String>,
  pub description: Option<Option<String>>,
  pub price: Option<Money>,
  pub category: Option<String>,
  pub image: Option<String>,
  pub specs: Option<Vec<String>>,
  pub stock: Option<u32>,
}

impl ProductPatch {
  pub fn apply_to(self, product: &mut Product) {
    if let Some(title) = self.title {
      product.title = title;
    }
    if let Some(description) = self.description {
      product.description = description;
    }
    if let Some(price) = self.price {
      product.price = price;
    }
    if let Some(category) = self.category {
      product.category = category;
    }
    if let Some(image) = self.image {
      product.image = image;
    }
    if let Some(specs) = self.specs {
      product.specs = specs;
    }
    if let Some(stock) = self.stock {
      product.stock = stock;
    }
  }
}
