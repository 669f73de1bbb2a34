//! In-memory storage

use std::sync::{PoisonError, RwLock};

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::storage::{Cookie, CookieJar, LocalStorage, StorageError};

/// Local storage held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}

/// Cookie jar held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: RwLock<FxHashMap<String, Cookie>>,
}

impl MemoryCookieJar {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full cookie including attributes, expired or not.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let now = Timestamp::now();

        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(now))
            .map(|cookie| cookie.value.clone())
    }

    fn set(&self, cookie: Cookie) -> Result<(), StorageError> {
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cookie.name.clone(), cookie);

        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);

        Ok(())
    }
}
