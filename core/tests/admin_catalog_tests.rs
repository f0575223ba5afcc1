// tests/admin_catalog_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use storefront::models::{Money, PaymentMethod, ProductId};
use storefront::{
  generate_products, AdminConsole, CartStore, Catalog, CheckoutEntry, CheckoutFlow, DataAccess, InMemoryBackend,
  OrderHistory, ProductDraft, RedirectMemory, StoreError, SubmitOutcome,
};

fn draft(title: &str, price: &str) -> ProductDraft {
  ProductDraft {
    title: title.to_string(),
    description: String::new(),
    price: price.to_string(),
    category: "Laptops".to_string(),
    image: "/images/laptop2.jpg".to_string(),
    stock: "4".to_string(),
    specs: vec!["16GB RAM".to_string(), "  ".to_string(), "".to_string(), "1TB SSD".to_string()],
  }
}

#[tokio::test]
#[serial]
async fn admin_sign_in_requires_admin_role() {
  setup_tracing();
  let (backend, _) = backend_with_shopper().await;
  backend.sign_out().await.unwrap();
  register_admin(&backend).await;
  let console = AdminConsole::new(as_data(&backend));

  let err = console.sign_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await.unwrap_err();
  assert_eq!(err.user_message(), "Unauthorized access");
  assert_eq!(backend.get_session().await.unwrap(), None);

  let session = console.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
  assert_eq!(session.user.email, ADMIN_EMAIL);
  assert_eq!(console.authorize().await.unwrap(), session);
}

#[tokio::test]
#[serial]
async fn authorize_sends_anonymous_users_to_admin_login() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  let console = AdminConsole::new(as_data(&backend));

  match console.authorize().await.unwrap_err() {
    StoreError::AuthRequired { return_to } => assert_eq!(return_to, "/admin/login"),
    other => panic!("expected AuthRequired, got {:?}", other),
  }
  assert!(matches!(console.list_products().await, Err(StoreError::AuthRequired { .. })));
}

#[tokio::test]
#[serial]
async fn shopper_session_cannot_use_the_console() {
  setup_tracing();
  let (backend, _) = backend_with_shopper().await;
  let console = AdminConsole::new(as_data(&backend));

  assert!(matches!(console.authorize().await, Err(StoreError::Forbidden(_))));
  assert!(matches!(
    console.add_product(draft("Sneaky", "1.00")).await,
    Err(StoreError::Forbidden(_))
  ));
}

#[tokio::test]
#[serial]
async fn admin_manages_products() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  backend.seed_products(generate_products(2));
  register_admin(&backend).await;
  let console = AdminConsole::new(as_data(&backend));
  console.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

  let created = console.add_product(draft("Framework Laptop", "1049.5")).await.unwrap();
  assert_eq!(created.price, Money::from_minor(104_950));
  assert_eq!(created.specs, vec!["16GB RAM", "1TB SSD"]);
  assert_eq!(created.stock, 4);
  assert_eq!(created.description, None);

  let listed = console.list_products().await.unwrap();
  assert_eq!(listed.len(), 7);
  assert_eq!(listed[0].id, created.id);

  let mut edit = ProductDraft::from_product(&created);
  edit.price = "999.99".to_string();
  edit.description = "Repairable".to_string();
  let updated = console.update_product(created.id, edit).await.unwrap();
  assert_eq!(updated.price, Money::from_minor(99_999));
  assert_eq!(updated.description.as_deref(), Some("Repairable"));
  assert_eq!(updated.title, "Framework Laptop");

  console.delete_product(created.id).await.unwrap();
  assert_eq!(console.list_products().await.unwrap().len(), 6);
  assert!(matches!(console.delete_product(created.id).await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn product_drafts_need_title_price_and_image() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  let console = AdminConsole::new(as_data(&backend));

  for bad in [draft("", "10"), draft("Thing", " "), ProductDraft { image: String::new(), ..draft("Thing", "10") }] {
    let err = console.add_product(bad).await.unwrap_err();
    assert_eq!(err.user_message(), "Please fill in all required fields");
  }
  assert!(matches!(draft("Thing", "ten").parse(), Err(StoreError::InvalidInput(_))));
  assert!(matches!(
    ProductDraft { stock: "-1".to_string(), ..draft("Thing", "10") }.parse(),
    Err(StoreError::InvalidInput(_))
  ));
  let blank_stock = ProductDraft { stock: String::new(), ..draft("Thing", "10") }.parse().unwrap();
  assert_eq!(blank_stock.stock, 0);
}

#[tokio::test]
#[serial]
async fn catalog_groups_by_category_and_finds_products() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  backend.seed_products(generate_products(3));
  let catalog = Catalog::new(as_data(&backend));

  let groups = catalog.by_category().await.unwrap();
  let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
  assert_eq!(names, vec!["Desktops", "Laptops", "Mobiles"]);
  assert!(groups.iter().all(|g| g.products.len() == 3));
  assert_eq!(groups[2].products[0].title, "iPhone 15");

  let detail = catalog.product(ProductId(4)).await.unwrap();
  assert_eq!(detail.title, "Apple MacBook Air");
  assert_eq!(detail.image, "/images/laptop1.jpg");

  match catalog.product(ProductId(99)).await.unwrap_err() {
    StoreError::NotFound(message) => assert_eq!(message, "Product not found"),
    other => panic!("expected NotFound, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn order_history_lists_own_orders_newest_first() {
  setup_tracing();
  let (backend, _) = backend_with_shopper().await;
  let seeded = backend.seed_products(generate_products(1));
  let data: Arc<dyn DataAccess> = as_data(&backend);
  let history = OrderHistory::new(data.clone());
  assert!(history.for_current_user().await.unwrap().is_empty());

  let cart = CartStore::new();
  let mut placed = Vec::new();
  for product in seeded.iter().take(2) {
    cart.add_to_cart(product);
    let flow = match CheckoutFlow::enter(data.clone(), cart.clone(), RedirectMemory::new()) {
      CheckoutEntry::Ready(flow) => flow,
      CheckoutEntry::RedirectToCart => panic!("cart should not be empty"),
    };
    flow.set_shipping(full_shipping()).unwrap();
    flow.select_payment_method(PaymentMethod::Cod).unwrap();
    match flow.submit().await {
      SubmitOutcome::Confirmed(confirmation) => placed.push(confirmation.order.id),
      other => panic!("expected confirmation, got {:?}", other),
    }
  }

  let orders = history.for_current_user().await.unwrap();
  assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![placed[1], placed[0]]);
  assert!(orders.iter().all(|o| o.item_count() == 1));

  backend.sign_out().await.unwrap();
  match history.for_current_user().await.unwrap_err() {
    StoreError::AuthRequired { return_to } => assert_eq!(return_to, "/login"),
    other => panic!("expected AuthRequired, got {:?}", other),
  }
}
