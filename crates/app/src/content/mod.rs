//! Site content
//!
//! Team members, the company timeline, testimonials and contact details.

mod models;
mod service;

pub use models::*;
pub use service::*;
