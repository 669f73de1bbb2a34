//! Buckery storefront and back-office client.
//!
//! Services talk to the bakery REST API, page controllers hold what each
//! page shows, and [`context::AppContext`] wires them over the browser state
//! kept by the `buckery` core crate.

pub mod admin;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod content;
pub mod context;
pub mod navigation;
pub mod observability;
pub mod pages;
pub mod payments;
pub mod session;
pub mod staff;
