//! Buckery
//!
//! Client-side state for the Buckery bakery storefront: the shopping cart, the
//! signed-in session and the checkout flow, persisted through browser-style
//! local storage and cookies.

pub mod cart;
pub mod checkout;
pub mod ids;
pub mod money;
pub mod payments;
pub mod prelude;
pub mod routes;
pub mod session;
pub mod storage;
