//! Storage
//!
//! The two persistence mechanisms a storefront page can rely on: key/value
//! local storage read by the client, and cookies read by the navigation guard.

use std::{fmt::Debug, io};

use thiserror::Error;

mod cookies;
mod file;
mod memory;

pub use cookies::{Cookie, SameSite};
pub use file::{FileCookieJar, FileStorage};
pub use memory::{MemoryCookieJar, MemoryStorage};

/// Local storage keys.
pub mod keys {
    /// Session token.
    pub const TOKEN: &str = "token";

    /// Signed-in username.
    pub const USERNAME: &str = "username";

    /// Signed-in account role.
    pub const USER_TYPE: &str = "userType";

    /// Serialized cart lines.
    pub const CART: &str = "cart";

    /// Checkout order draft.
    pub const ORDER_DATA: &str = "orderData";

    /// Remember-me flag set at login.
    pub const REMEMBER_ME: &str = "rememberMe";
}

/// Errors raised while persisting client state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage i/o error")]
    Io(#[from] io::Error),

    /// The backing file held data that could not be (de)serialized.
    #[error("storage serialization error")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous key/value storage with the semantics of browser local storage.
pub trait LocalStorage: Send + Sync + Debug {
    /// Read a value.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion could not be persisted.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Cookie storage as seen by both the client and the navigation guard.
pub trait CookieJar: Send + Sync + Debug {
    /// Read the value of an unexpired cookie.
    fn get(&self, name: &str) -> Option<String>;

    /// Store a cookie, replacing any cookie with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie could not be persisted.
    fn set(&self, cookie: Cookie) -> Result<(), StorageError>;

    /// Delete a cookie. Deleting a missing cookie is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion could not be persisted.
    fn remove(&self, name: &str) -> Result<(), StorageError>;
}
