// src/lib.rs

//! Storefront: the cart and checkout core of a small hosted-backend shop.
//!
//! The crate provides:
//!  - A session-owned `CartStore` with merge-on-add semantics, derived
//!    totals and a change feed for re-rendering.
//!  - A `CheckoutFlow` state machine that validates shipping and payment
//!    input, places an order from a cart snapshot and clears the cart.
//!  - Auth, admin, catalog and order-history flows over a `DataAccess`
//!    trait, with an in-memory service and a fail-fast unconfigured one.
//!  - A small async step-pipeline engine the multi-step flows run on.

pub mod admin;
pub mod auth;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod errors;
pub mod models;
pub mod orders;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::admin::{AdminConsole, ProductDraft};
pub use crate::auth::{AuthFlow, SignInOutcome, SignUpForm};
pub use crate::backend::{
  AuthListener, AuthSubscription, DataAccess, InMemoryBackend, ProductOrder, ProductQuery, UnconfiguredBackend,
};
pub use crate::cart::{CartChange, CartEvent, CartSnapshot, CartStore, QuantityUpdate};
pub use crate::catalog::{generate_products, Catalog, CategoryGroup};
pub use crate::checkout::{
  validate, CheckoutEntry, CheckoutField, CheckoutFlow, CheckoutForm, CheckoutState, Confirmation, RedirectMemory,
  SubmitOutcome, ValidationErrors,
};
pub use crate::config::BackendConfig;
pub use crate::errors::{StoreError, StoreResult};
pub use crate::orders::OrderHistory;
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult};
