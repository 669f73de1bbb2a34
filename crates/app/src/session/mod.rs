//! Session lifecycle
//!
//! Signing in and out, verifying a restored session, and telling the rest of
//! the client when any of that happens.

mod events;
mod expiry;
mod manager;

pub use events::{SessionEvent, SessionEvents};
pub use expiry::SessionExpiry;
pub use manager::SessionManager;

use buckery::{
    cart::CartError,
    session::UnknownRole,
    storage::StorageError,
};
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("request failed")]
    Api(#[from] ApiError),

    #[error("failed to persist session")]
    Storage(#[from] StorageError),

    #[error("failed to clear cart")]
    Cart(#[from] CartError),

    #[error("server returned an unknown role")]
    Role(#[from] UnknownRole),

    /// A customer account tried to sign in to the back office.
    #[error("Akun ini tidak memiliki akses admin")]
    Forbidden,
}

impl SessionError {
    /// Text for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) => error.user_message(),
            Self::Forbidden => self.to_string(),
            Self::Storage(_) | Self::Cart(_) | Self::Role(_) => {
                crate::api::GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}
