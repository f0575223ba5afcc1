// tests/cart_store_tests.rs
mod common;

use common::*;
use storefront::models::{Money, ProductId};
use storefront::{CartEvent, CartStore, QuantityUpdate, StoreError};

fn expected_total(cart: &CartStore) -> Money {
  cart.items().iter().map(|item| item.product.price * item.quantity).sum()
}

#[test]
fn repeated_adds_merge_into_one_line() {
  setup_tracing();
  let cart = CartStore::new();
  let laptop = product(1, "Dell XPS 13", 999);

  for call in 1..=5u32 {
    assert_eq!(cart.add_to_cart(&laptop), call);
  }

  let items = cart.items();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].quantity, 5);
  assert_eq!(cart.count(), 5);
}

#[test]
fn add_keeps_insertion_order_and_update_does_not_reorder() {
  let cart = CartStore::new();
  cart.add_to_cart(&product(3, "C", 10));
  cart.add_to_cart(&product(1, "A", 10));
  cart.add_to_cart(&product(2, "B", 10));
  cart.update_quantity(ProductId(3), 7);
  cart.add_to_cart(&product(1, "A", 10));

  let ids: Vec<i64> = cart.items().iter().map(|item| item.id().0).collect();
  assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn remove_then_add_starts_fresh_at_quantity_one() {
  let cart = CartStore::new();
  let phone = product(7, "Pixel 8", 699);
  cart.add_to_cart(&phone);
  cart.add_to_cart(&phone);
  cart.add_to_cart(&phone);

  assert!(cart.remove_from_cart(phone.id));
  assert!(cart.is_empty());

  cart.add_to_cart(&phone);
  assert_eq!(cart.line(phone.id).unwrap().quantity, 1);
}

#[test]
fn removing_or_updating_absent_ids_is_a_no_op() {
  let cart = CartStore::new();
  cart.add_to_cart(&product(1, "A", 10));
  let revision = cart.revision();

  assert!(!cart.remove_from_cart(ProductId(42)));
  assert_eq!(cart.update_quantity(ProductId(42), 3), QuantityUpdate::NotInCart);
  assert_eq!(cart.revision(), revision);
  assert_eq!(cart.count(), 1);
}

#[test]
fn later_catalog_changes_do_not_reach_cart_lines() {
  let cart = CartStore::new();
  let mut laptop = product(1, "MacBook Air", 1099);
  cart.add_to_cart(&laptop);

  laptop.price = Money::from_major(1);
  laptop.title = "Renamed".to_string();
  cart.add_to_cart(&laptop);

  let line = cart.line(laptop.id).unwrap();
  assert_eq!(line.product.title, "MacBook Air");
  assert_eq!(line.price(), Money::from_major(1099));
  assert_eq!(line.quantity, 2);
}

#[test]
fn non_positive_quantity_removes_the_line() {
  let cart = CartStore::new();
  cart.add_to_cart(&product(1, "A", 10));
  cart.add_to_cart(&product(2, "B", 20));

  assert_eq!(cart.update_quantity(ProductId(1), 0), QuantityUpdate::Removed);
  assert_eq!(cart.update_quantity(ProductId(2), -4), QuantityUpdate::Removed);
  assert!(cart.is_empty());
  assert_eq!(cart.total(), Money::ZERO);
}

#[test]
fn quantity_input_is_coerced_or_rejected() {
  let cart = CartStore::new();
  cart.add_to_cart(&product(1, "A", 10));

  assert_eq!(cart.update_quantity_from_input(ProductId(1), " 4 ").unwrap(), QuantityUpdate::Updated(4));
  assert_eq!(cart.count(), 4);

  for bad in ["", "two", "2.5", "3x"] {
    let err = cart.update_quantity_from_input(ProductId(1), bad).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)), "input '{}' gave {:?}", bad, err);
  }
  assert_eq!(cart.count(), 4);

  assert_eq!(cart.update_quantity_from_input(ProductId(1), "0").unwrap(), QuantityUpdate::Removed);
}

#[test]
fn totals_track_every_mutation() {
  let cart = CartStore::new();
  let a = product(1, "A", 500);
  let b = product(2, "B", 250);
  let c = product(3, "C", 1);

  cart.add_to_cart(&a);
  assert_eq!(cart.total(), expected_total(&cart));
  cart.add_to_cart(&b);
  cart.add_to_cart(&a);
  assert_eq!(cart.total(), Money::from_major(1250));
  cart.update_quantity(b.id, 3);
  assert_eq!(cart.total(), Money::from_major(1750));
  cart.add_to_cart(&c);
  cart.remove_from_cart(a.id);
  assert_eq!(cart.total(), Money::from_major(751));
  assert_eq!(cart.total(), expected_total(&cart));
  assert_eq!(cart.count(), 4);
}

#[test]
fn clear_cart_zeroes_count_and_total() {
  let cart = CartStore::new();
  cart.clear_cart();
  assert_eq!(cart.count(), 0);

  cart.add_to_cart(&product(1, "A", 10));
  cart.add_to_cart(&product(2, "B", 20));
  cart.clear_cart();
  assert_eq!(cart.count(), 0);
  assert_eq!(cart.total(), Money::ZERO);
  assert!(cart.items().is_empty());
}

#[test]
fn snapshot_is_immune_to_later_mutation() {
  let cart = CartStore::new();
  cart.add_to_cart(&product(1, "A", 500));
  cart.add_to_cart(&product(1, "A", 500));

  let snapshot = cart.snapshot();
  cart.add_to_cart(&product(2, "B", 100));
  cart.clear_cart();

  assert_eq!(snapshot.count(), 2);
  assert_eq!(snapshot.total(), Money::from_major(1000));
  assert_eq!(snapshot.items().len(), 1);
}

#[test]
fn clones_share_the_same_cart() {
  let cart = CartStore::new();
  let header_badge = cart.clone();
  cart.add_to_cart(&product(1, "A", 10));
  assert_eq!(header_badge.count(), 1);
}

#[tokio::test]
async fn subscribers_receive_one_change_per_effective_mutation() {
  setup_tracing();
  let cart = CartStore::new();
  let mut changes = cart.subscribe();
  let a = product(1, "A", 500);

  cart.add_to_cart(&a);
  cart.add_to_cart(&a);
  cart.remove_from_cart(ProductId(99));
  cart.update_quantity(a.id, 5);
  cart.update_quantity(ProductId(99), 5);
  cart.remove_from_cart(a.id);
  cart.clear_cart();

  let first = changes.recv().await.unwrap();
  assert_eq!(first.event, CartEvent::Added { id: a.id, quantity: 1 });
  assert_eq!(first.count, 1);
  assert_eq!(first.total, Money::from_major(500));

  let second = changes.recv().await.unwrap();
  assert_eq!(second.event, CartEvent::Added { id: a.id, quantity: 2 });
  assert_eq!(second.revision, first.revision + 1);

  let third = changes.recv().await.unwrap();
  assert_eq!(third.event, CartEvent::QuantityChanged { id: a.id, quantity: 5 });
  assert_eq!(third.total, Money::from_major(2500));

  let fourth = changes.recv().await.unwrap();
  assert_eq!(fourth.event, CartEvent::Removed { id: a.id });
  assert_eq!(fourth.count, 0);

  let fifth = changes.recv().await.unwrap();
  assert_eq!(fifth.event, CartEvent::Cleared);

  assert!(changes.try_recv().is_err());
}

#[test]
fn quantity_that_would_overflow_the_total_is_refused() {
  let cart = CartStore::new();
  let mut server = product(1, "Rack Server", 1);
  server.price = Money::from_minor(i64::MAX / 2);
  cart.add_to_cart(&server);
  let mut feed = cart.subscribe();
  let revision = cart.revision();

  assert_eq!(cart.update_quantity(ProductId(1), 4), QuantityUpdate::TooLarge);
  assert_eq!(cart.update_quantity(ProductId(1), i64::MAX), QuantityUpdate::TooLarge);
  assert!(matches!(
    cart.update_quantity_from_input(ProductId(1), "4"),
    Err(StoreError::InvalidInput(_))
  ));

  assert_eq!(cart.line(ProductId(1)).unwrap().quantity, 1);
  assert_eq!(cart.revision(), revision);
  assert!(feed.try_recv().is_err());

  assert_eq!(cart.update_quantity(ProductId(1), 2), QuantityUpdate::Updated(2));
  assert_eq!(cart.total(), Money::from_minor(i64::MAX - 1));
}

#[test]
fn add_that_would_overflow_the_total_leaves_cart_unchanged() {
  let cart = CartStore::new();
  let mut server = product(1, "Rack Server", 1);
  server.price = Money::from_minor(i64::MAX / 2);
  let mut switch = product(2, "Core Switch", 1);
  switch.price = Money::from_minor(i64::MAX / 2);

  assert_eq!(cart.add_to_cart(&server), 1);
  assert_eq!(cart.add_to_cart(&switch), 1);
  let revision = cart.revision();

  assert_eq!(cart.add_to_cart(&server), 1);
  assert_eq!(cart.add_to_cart(&product(3, "Cable", 1)), 0);
  assert_eq!(cart.len(), 2);
  assert_eq!(cart.count(), 2);
  assert_eq!(cart.revision(), revision);
}
