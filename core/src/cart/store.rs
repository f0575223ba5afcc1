// storefront/src/cart/store.rs

use crate::cart::CartSnapshot;
use crate::errors::{StoreError, StoreResult};
use crate::models::{CartLineItem, Money, Product, ProductId};
use crate::pipeline::ContextData;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

const CHANGE_FEED_CAPACITY: usize = 64;

/// What a single cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
  /// `quantity` is the line's quantity after the add.
  Added { id: ProductId, quantity: u32 },
  QuantityChanged { id: ProductId, quantity: u32 },
  Removed { id: ProductId },
  Cleared,
}

/// Published to subscribers after every effective mutation, carrying the
/// derived values a view needs to re-render its badge and totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartChange {
  pub revision: u64,
  pub event: CartEvent,
  pub count: u64,
  pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
  Updated(u32),
  /// A quantity of zero or below removes the line.
  Removed,
  NotInCart,
  /// The cart total would no longer be representable; nothing changed.
  TooLarge,
}

#[derive(Debug, Default)]
struct CartState {
  items: Vec<CartLineItem>,
  revision: u64,
}

impl CartState {
  fn position(&self, id: ProductId) -> Option<usize> {
    self.items.iter().position(|item| item.id() == id)
  }

  /// Cart total if the line at `idx` (or a new line of `product`) held
  /// `quantity`, or `None` if it would overflow.
  fn total_with(&self, idx: Option<usize>, product: &Product, quantity: u32) -> Option<Money> {
    let mut total = Money::ZERO;
    for (i, item) in self.items.iter().enumerate() {
      let line = if Some(i) == idx {
        item.product.price.checked_mul(quantity)?
      } else {
        item.product.price.checked_mul(item.quantity)?
      };
      total = total.checked_add(line)?;
    }
    if idx.is_none() {
      total = total.checked_add(product.price.checked_mul(quantity)?)?;
    }
    Some(total)
  }

  fn commit(&mut self, event: CartEvent) -> CartChange {
    self.revision += 1;
    CartChange {
      revision: self.revision,
      event,
      count: self.items.iter().map(|item| u64::from(item.quantity)).sum(),
      total: self.items.iter().map(CartLineItem::line_total).sum(),
    }
  }
}

/// The session's cart: an owned, cloneable handle over the line items.
///
/// Lines keep insertion order; updates never reorder them. At most one line
/// exists per product id and every line has a quantity of at least one.
#[derive(Debug, Clone)]
pub struct CartStore {
  state: ContextData<CartState>,
  changes: broadcast::Sender<CartChange>,
}

impl Default for CartStore {
  fn default() -> Self {
    Self::new()
  }
}

impl CartStore {
  pub fn new() -> Self {
    let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
    Self {
      state: ContextData::new(CartState::default()),
      changes,
    }
  }

  /// Receives a `CartChange` for every mutation made after this call.
  pub fn subscribe(&self) -> broadcast::Receiver<CartChange> {
    self.changes.subscribe()
  }

  /// Adds one unit of `product`, merging into an existing line.
  /// Returns the line's quantity afterwards.
  ///
  /// An add that would overflow the line quantity or the cart total is
  /// refused; the current quantity (zero if absent) is returned and nothing
  /// is published.
  #[instrument(name = "CartStore::add_to_cart", skip(self, product), fields(product_id = %product.id))]
  pub fn add_to_cart(&self, product: &Product) -> u32 {
    let change = {
      let mut guard = self.state.write();
      let state = &mut *guard;
      let idx = state.position(product.id);
      let current = idx.map_or(0, |idx| state.items[idx].quantity);
      let fits = current
        .checked_add(1)
        .and_then(|quantity| state.total_with(idx, product, quantity))
        .is_some();
      if !fits {
        warn!(quantity = current, "Add refused; the cart total would overflow.");
        return current;
      }
      let quantity = match idx {
        Some(idx) => {
          let line = &mut state.items[idx];
          line.quantity += 1;
          line.quantity
        }
        None => {
          state.items.push(CartLineItem::new(product.clone()));
          1
        }
      };
      state.commit(CartEvent::Added {
        id: product.id,
        quantity,
      })
    };
    debug!(count = change.count, total = %change.total, "Product added to cart.");
    let quantity = match change.event {
      CartEvent::Added { quantity, .. } => quantity,
      _ => 1,
    };
    self.publish(change);
    quantity
  }

  /// Removes the line for `id`. Returns false (and publishes nothing) if absent.
  #[instrument(name = "CartStore::remove_from_cart", skip(self))]
  pub fn remove_from_cart(&self, id: ProductId) -> bool {
    let change = {
      let mut guard = self.state.write();
      let state = &mut *guard;
      match state.position(id) {
        Some(idx) => {
          state.items.remove(idx);
          Some(state.commit(CartEvent::Removed { id }))
        }
        None => None,
      }
    };
    match change {
      Some(change) => {
        self.publish(change);
        true
      }
      None => false,
    }
  }

  /// Sets the quantity of the line for `id`; zero or below removes it.
  ///
  /// A quantity whose line or cart total would overflow leaves the cart
  /// unchanged and returns `TooLarge`.
  #[instrument(name = "CartStore::update_quantity", skip(self))]
  pub fn update_quantity(&self, id: ProductId, quantity: i64) -> QuantityUpdate {
    let (update, change) = {
      let mut guard = self.state.write();
      let state = &mut *guard;
      match state.position(id) {
        None => (QuantityUpdate::NotInCart, None),
        Some(idx) if quantity <= 0 => {
          state.items.remove(idx);
          (QuantityUpdate::Removed, Some(state.commit(CartEvent::Removed { id })))
        }
        Some(idx) => {
          let fits = u32::try_from(quantity)
            .ok()
            .filter(|quantity| state.total_with(Some(idx), &state.items[idx].product, *quantity).is_some());
          match fits {
            None => {
              warn!(quantity, "Quantity update refused; the cart total would overflow.");
              (QuantityUpdate::TooLarge, None)
            }
            Some(quantity) => {
              state.items[idx].quantity = quantity;
              (
                QuantityUpdate::Updated(quantity),
                Some(state.commit(CartEvent::QuantityChanged { id, quantity })),
              )
            }
          }
        }
      }
    };
    if let Some(change) = change {
      self.publish(change);
    }
    update
  }

  /// Coerces the text of a quantity input and applies it.
  ///
  /// Text that is not an integer, or a quantity too large for the cart, is
  /// rejected and the cart is left unchanged.
  pub fn update_quantity_from_input(&self, id: ProductId, input: &str) -> StoreResult<QuantityUpdate> {
    let invalid = || StoreError::InvalidInput(format!("'{}' is not a valid quantity", input));
    let quantity: i64 = input.trim().parse().map_err(|_| invalid())?;
    match self.update_quantity(id, quantity) {
      QuantityUpdate::TooLarge => Err(invalid()),
      update => Ok(update),
    }
  }

  #[instrument(name = "CartStore::clear_cart", skip(self))]
  pub fn clear_cart(&self) {
    let change = {
      let mut guard = self.state.write();
      guard.items.clear();
      guard.commit(CartEvent::Cleared)
    };
    self.publish(change);
  }

  pub fn snapshot(&self) -> CartSnapshot {
    CartSnapshot::new(self.state.read().items.clone())
  }

  pub fn items(&self) -> Vec<CartLineItem> {
    self.state.read().items.clone()
  }

  pub fn line(&self, id: ProductId) -> Option<CartLineItem> {
    let guard = self.state.read();
    guard.position(id).map(|idx| guard.items[idx].clone())
  }

  pub fn is_empty(&self) -> bool {
    self.state.read().items.is_empty()
  }

  /// Number of distinct lines.
  pub fn len(&self) -> usize {
    self.state.read().items.len()
  }

  /// Sum of quantities across all lines.
  pub fn count(&self) -> u64 {
    self.state.read().items.iter().map(|item| u64::from(item.quantity)).sum()
  }

  /// Sum of `price * quantity` across all lines.
  pub fn total(&self) -> Money {
    self.state.read().items.iter().map(CartLineItem::line_total).sum()
  }

  pub fn revision(&self) -> u64 {
    self.state.read().revision
  }

  fn publish(&self, change: CartChange) {
    // No subscribers is fine; the change is simply dropped.
    let _ = self.changes.send(change);
  }
}
