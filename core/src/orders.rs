// storefront/src/orders.rs

use crate::backend::DataAccess;
use crate::checkout::redirect::LOGIN_PATH;
use crate::errors::{StoreError, StoreResult};
use crate::models::Order;
use std::sync::Arc;
use tracing::instrument;

/// The "my orders" page.
#[derive(Clone)]
pub struct OrderHistory {
  data: Arc<dyn DataAccess>,
}

impl OrderHistory {
  pub fn new(data: Arc<dyn DataAccess>) -> Self {
    Self { data }
  }

  /// Orders of the signed-in user, newest first.
  #[instrument(name = "OrderHistory::for_current_user", skip(self), err(Display))]
  pub async fn for_current_user(&self) -> StoreResult<Vec<Order>> {
    let session = self.data.get_session().await?.ok_or_else(|| StoreError::AuthRequired {
      return_to: LOGIN_PATH.to_string(),
    })?;
    self.data.orders_for_user(session.user.id).await
  }
}
