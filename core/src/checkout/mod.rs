// storefront/src/checkout/mod.rs

//! Checkout: form state, validation and order placement.

pub mod flow;
pub mod form;
pub mod pipeline;
pub mod redirect;
pub mod validation;

pub use flow::{CheckoutEntry, CheckoutFlow, CheckoutState, Confirmation, SubmitOutcome};
pub use form::CheckoutForm;
pub use redirect::{RedirectMemory, ADMIN_LOGIN_PATH, CART_PATH, CHECKOUT_PATH, HOME_PATH, LOGIN_PATH};
pub use validation::{validate, CheckoutField, ValidationErrors};
