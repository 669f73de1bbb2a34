//! Storefront pages
//!
//! Each controller holds the state a page renders from and performs its
//! actions against the shared [`AppContext`](crate::context::AppContext).
//! Failures end up on the page's [`ErrorBanner`].

mod about;
mod banner;
mod cart;
mod contact;
mod login;
mod menu;
mod navbar;
mod order_data;
mod orders;
mod payment;
mod profile;

pub use about::AboutPage;
pub use banner::{ErrorBanner, UserMessage};
pub use cart::CartPage;
pub use contact::{ContactForm, ContactPage};
pub use login::{LoginPage, RegisterPage};
pub use menu::MenuPage;
pub use navbar::Navbar;
pub use order_data::OrderDataPage;
pub use orders::{OrderEntry, OrdersPage};
pub use payment::{Notification, PaymentModal, PaymentPage, REDIRECT_DELAY};
pub use profile::{ProfileError, ProfilePage};
