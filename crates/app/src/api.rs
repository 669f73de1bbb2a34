//! REST API client
//!
//! One client for every backend call. It attaches the session token, enforces
//! the request timeout and applies the session-expiry policy to every 401.

mod client;
mod errors;
mod upload;

pub use client::{ApiClient, MockUnauthorizedHandler, UnauthorizedHandler};
pub use errors::{ApiError, GENERIC_ERROR_MESSAGE};
pub use upload::{FilePart, FormPayload};
