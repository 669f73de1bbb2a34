//! Session adapters
//!
//! The session is persisted twice: in cookies, which the navigation guard can
//! see, and in local storage, which survives cookie expiry on the client.
//! Both copies are written through these adapters and nowhere else.

use std::{fmt::Debug, sync::Arc};

use crate::{
    session::{Credentials, Role},
    storage::{Cookie, CookieJar, LocalStorage, StorageError, keys},
};

/// Raw session fields as found in one persistence mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionParts {
    /// Stored token
    pub token: Option<String>,

    /// Stored username
    pub username: Option<String>,

    /// Stored role, unparsed
    pub role: Option<String>,
}

/// What a set of stored fields amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// All fields present and the role is known.
    Complete(Credentials),

    /// Nothing stored.
    Empty,

    /// Some fields stored, or an unknown role.
    Partial,
}

impl SessionParts {
    /// Parts describing the given credentials.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            token: Some(credentials.token.clone()),
            username: Some(credentials.username.clone()),
            role: Some(credentials.role.as_str().to_string()),
        }
    }

    /// Whether a token is present.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Classify the stored fields.
    pub fn resolve(&self) -> Resolved {
        match (&self.token, &self.username, &self.role) {
            (None, None, None) => Resolved::Empty,
            (Some(token), Some(username), Some(role)) => match role.parse::<Role>() {
                Ok(role) => Resolved::Complete(Credentials::new(token, username, role)),
                Err(_) => Resolved::Partial,
            },
            _ => Resolved::Partial,
        }
    }
}

/// One persistence mechanism for the session.
pub trait SessionAdapter: Send + Sync + Debug {
    /// Read whatever session fields are stored.
    fn read(&self) -> SessionParts;

    /// Store all session fields.
    ///
    /// # Errors
    ///
    /// Returns an error if any field could not be persisted.
    fn write(&self, credentials: &Credentials) -> Result<(), StorageError>;

    /// Delete all session fields.
    ///
    /// # Errors
    ///
    /// Returns an error if any field could not be deleted.
    fn erase(&self) -> Result<(), StorageError>;
}

/// Session fields in cookies (`path=/`, seven days, `SameSite=Lax`).
#[derive(Debug, Clone)]
pub struct CookieSessionAdapter {
    jar: Arc<dyn CookieJar>,
}

impl CookieSessionAdapter {
    /// Wrap a cookie jar.
    pub fn new(jar: Arc<dyn CookieJar>) -> Self {
        Self { jar }
    }
}

impl SessionAdapter for CookieSessionAdapter {
    fn read(&self) -> SessionParts {
        SessionParts {
            token: self.jar.get(keys::TOKEN),
            username: self.jar.get(keys::USERNAME),
            role: self.jar.get(keys::USER_TYPE),
        }
    }

    fn write(&self, credentials: &Credentials) -> Result<(), StorageError> {
        self.jar
            .set(Cookie::session(keys::TOKEN, credentials.token.as_str()))?;
        self.jar
            .set(Cookie::session(keys::USERNAME, credentials.username.as_str()))?;
        self.jar
            .set(Cookie::session(keys::USER_TYPE, credentials.role.as_str()))?;

        Ok(())
    }

    fn erase(&self) -> Result<(), StorageError> {
        self.jar.remove(keys::TOKEN)?;
        self.jar.remove(keys::USERNAME)?;
        self.jar.remove(keys::USER_TYPE)?;

        Ok(())
    }
}

/// Session fields in local storage. Erasing also drops the remember-me flag.
#[derive(Debug, Clone)]
pub struct LocalSessionAdapter {
    storage: Arc<dyn LocalStorage>,
}

impl LocalSessionAdapter {
    /// Wrap local storage.
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }
}

impl SessionAdapter for LocalSessionAdapter {
    fn read(&self) -> SessionParts {
        SessionParts {
            token: self.storage.get_item(keys::TOKEN),
            username: self.storage.get_item(keys::USERNAME),
            role: self.storage.get_item(keys::USER_TYPE),
        }
    }

    fn write(&self, credentials: &Credentials) -> Result<(), StorageError> {
        self.storage.set_item(keys::TOKEN, &credentials.token)?;
        self.storage.set_item(keys::USERNAME, &credentials.username)?;
        self.storage
            .set_item(keys::USER_TYPE, credentials.role.as_str())?;

        Ok(())
    }

    fn erase(&self) -> Result<(), StorageError> {
        self.storage.remove_item(keys::TOKEN)?;
        self.storage.remove_item(keys::USERNAME)?;
        self.storage.remove_item(keys::USER_TYPE)?;
        self.storage.remove_item(keys::REMEMBER_ME)?;

        Ok(())
    }
}
