// tests/auth_flow_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use storefront::{AuthFlow, InMemoryBackend, RedirectMemory, SignUpForm, StoreError};

fn form(email: &str, password: &str, confirm: &str) -> SignUpForm {
  SignUpForm {
    email: email.to_string(),
    password: password.to_string(),
    confirm_password: confirm.to_string(),
  }
}

#[tokio::test]
#[serial]
async fn sign_up_validates_before_registering() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  let auth = AuthFlow::new(as_data(&backend), RedirectMemory::new());

  let cases = [
    (form("", "secret1", "secret1"), "All fields are required"),
    (form("a@b.c", "secret1", "secret2"), "Passwords do not match"),
    (form("a@b.c", "abc", "abc"), "Password must be at least 6 characters long"),
  ];
  for (input, expected) in cases {
    let err = auth.sign_up(input).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert_eq!(err.user_message(), expected);
  }

  let user = auth.sign_up(form(" a@b.c ", "secret1", "secret1")).await.unwrap();
  assert_eq!(user.email, "a@b.c");

  let dup = auth.sign_up(form("a@b.c", "secret1", "secret1")).await.unwrap_err();
  assert_eq!(dup.user_message(), "User already registered");
}

#[tokio::test]
#[serial]
async fn sign_in_goes_home_without_a_remembered_destination() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  let auth = AuthFlow::new(as_data(&backend), RedirectMemory::new());
  auth.sign_up(form(SHOPPER_EMAIL, SHOPPER_PASSWORD, SHOPPER_PASSWORD)).await.unwrap();

  let outcome = auth.sign_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await.unwrap();
  assert_eq!(outcome.redirect_to, "/");
  assert_eq!(auth.current_session().await.unwrap(), Some(outcome.session));

  auth.sign_out().await.unwrap();
  assert_eq!(auth.current_session().await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn failed_sign_in_keeps_the_remembered_destination() {
  setup_tracing();
  let backend = Arc::new(InMemoryBackend::new());
  let redirects = RedirectMemory::new();
  redirects.remember("/checkout");
  let auth = AuthFlow::new(as_data(&backend), redirects.clone());
  auth.sign_up(form(SHOPPER_EMAIL, SHOPPER_PASSWORD, SHOPPER_PASSWORD)).await.unwrap();

  let missing = auth.sign_in("", "").await.unwrap_err();
  assert_eq!(missing.user_message(), "Email and password are required");
  let wrong = auth.sign_in(SHOPPER_EMAIL, "not-it").await.unwrap_err();
  assert!(matches!(wrong, StoreError::Auth(_)));
  assert_eq!(redirects.peek().as_deref(), Some("/checkout"));

  let outcome = auth.sign_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await.unwrap();
  assert_eq!(outcome.redirect_to, "/checkout");
  assert_eq!(redirects.take(), None);
}
