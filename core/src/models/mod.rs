// storefront/src/models/mod.rs

//! Records exchanged with the backend and held by the cart and checkout.

pub mod cart_item;
pub mod money;
pub mod order;
pub mod payment;
pub mod product;
pub mod session;
pub mod shipping;

pub use cart_item::CartLineItem;
pub use money::Money;
pub use order::{NewOrder, Order, OrderStatus, PaymentStatus};
pub use payment::{CardDetails, PaymentDetails, PaymentMethod};
pub use product::{NewProduct, Product, ProductId, ProductPatch};
pub use session::{AuthEvent, Role, Session, User, UserId};
pub use shipping::ShippingInfo;
