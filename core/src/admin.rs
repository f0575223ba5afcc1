// storefront/src/admin.rs

//! The admin product console.
//!
//! Role checks here only decide where to send the browser; the data-access
//! service enforces the same rule on every product mutation.

use crate::backend::{DataAccess, ProductOrder, ProductQuery};
use crate::checkout::redirect::ADMIN_LOGIN_PATH;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Money, NewProduct, Product, ProductId, ProductPatch, Role, Session};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";
const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";

/// Product form input as typed, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
  pub title: String,
  pub description: String,
  pub price: String,
  pub category: String,
  pub image: String,
  pub stock: String,
  pub specs: Vec<String>,
}

impl ProductDraft {
  pub fn from_product(product: &Product) -> Self {
    Self {
      title: product.title.clone(),
      description: product.description.clone().unwrap_or_default(),
      price: product.price.to_string(),
      category: product.category.clone(),
      image: product.image.clone(),
      stock: product.stock.to_string(),
      specs: product.specs.clone(),
    }
  }

  /// Title, price and image are required; blank specs are dropped and a
  /// blank stock means zero.
  pub fn parse(&self) -> StoreResult<NewProduct> {
    let title = self.title.trim();
    let image = self.image.trim();
    if title.is_empty() || self.price.trim().is_empty() || image.is_empty() {
      return Err(StoreError::InvalidInput(REQUIRED_FIELDS_MESSAGE.to_string()));
    }
    let price = Money::parse(&self.price)?;
    let stock = match self.stock.trim() {
      "" => 0,
      text => text
        .parse::<u32>()
        .map_err(|_| StoreError::InvalidInput(format!("'{}' is not a valid stock count", text)))?,
    };
    let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());

    Ok(NewProduct {
      title: title.to_string(),
      description,
      price,
      category: self.category.trim().to_string(),
      image: image.to_string(),
      specs: self
        .specs
        .iter()
        .map(|spec| spec.trim())
        .filter(|spec| !spec.is_empty())
        .map(str::to_string)
        .collect(),
      stock,
    })
  }

  pub fn into_patch(self) -> StoreResult<ProductPatch> {
    let parsed = self.parse()?;
    Ok(ProductPatch {
      title: Some(parsed.title),
      description: Some(parsed.description),
      price: Some(parsed.price),
      category: Some(parsed.category),
      image: Some(parsed.image),
      specs: Some(parsed.specs),
      stock: Some(parsed.stock),
    })
  }
}

#[derive(Clone)]
pub struct AdminConsole {
  data: Arc<dyn DataAccess>,
}

impl AdminConsole {
  pub fn new(data: Arc<dyn DataAccess>) -> Self {
    Self { data }
  }

  /// Signs in and checks the profile role. A non-admin is signed out again.
  #[instrument(name = "AdminConsole::sign_in", skip(self, password), err(Display))]
  pub async fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session> {
    let session = self.data.sign_in(email.trim(), password).await?;
    let role = self.data.ensure_profile(session.user.id).await?;
    if role != Role::Admin {
      warn!(user_id = %session.user.id, "Non-admin attempted admin sign-in.");
      self.data.sign_out().await?;
      return Err(StoreError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
    }
    info!(user_id = %session.user.id, "Admin signed in.");
    Ok(session)
  }

  /// Resolves the current session and requires the admin role.
  pub async fn authorize(&self) -> StoreResult<Session> {
    let session = self.data.get_session().await?.ok_or_else(|| StoreError::AuthRequired {
      return_to: ADMIN_LOGIN_PATH.to_string(),
    })?;
    match self.data.ensure_profile(session.user.id).await? {
      Role::Admin => Ok(session),
      Role::User => Err(StoreError::Forbidden(UNAUTHORIZED_MESSAGE.to_string())),
    }
  }

  /// All products, newest first.
  pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
    self.authorize().await?;
    self
      .data
      .query_products(&ProductQuery::all().ordered_by(ProductOrder::Newest))
      .await
  }

  #[instrument(name = "AdminConsole::add_product", skip(self, draft), fields(title = %draft.title), err(Display))]
  pub async fn add_product(&self, draft: ProductDraft) -> StoreResult<Product> {
    let new_product = draft.parse()?;
    self.authorize().await?;
    self.data.insert_product(new_product).await
  }

  #[instrument(name = "AdminConsole::update_product", skip(self, draft), err(Display))]
  pub async fn update_product(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Product> {
    let patch = draft.into_patch()?;
    self.authorize().await?;
    self.data.update_product(id, patch).await
  }

  #[instrument(name = "AdminConsole::delete_product", skip(self), err(Display))]
  pub async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
    self.authorize().await?;
    self.data.delete_product(id).await
  }
}
