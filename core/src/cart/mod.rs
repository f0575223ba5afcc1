// storefront/src/cart/mod.rs

//! The session-owned cart store.

pub mod snapshot;
pub mod store;

pub use snapshot::CartSnapshot;
pub use store::{CartChange, CartEvent, CartStore, QuantityUpdate};
