//! Session store

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::{
    session::{
        CookieSessionAdapter, Credentials, LocalSessionAdapter, Resolved, Role, Session,
        SessionAdapter, SessionParts,
    },
    storage::{CookieJar, LocalStorage, StorageError, keys},
};

/// The single authoritative session, mirrored into cookies and local storage.
#[derive(Debug)]
pub struct SessionStore {
    cookies: Box<dyn SessionAdapter>,
    local: Box<dyn SessionAdapter>,
    storage: Arc<dyn LocalStorage>,
    current: RwLock<Session>,
}

impl SessionStore {
    /// Anonymous store writing through the given jar and local storage.
    pub fn new(jar: Arc<dyn CookieJar>, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            cookies: Box::new(CookieSessionAdapter::new(jar)),
            local: Box::new(LocalSessionAdapter::new(storage.clone())),
            storage,
            current: RwLock::new(Session::Anonymous),
        }
    }

    /// Load the session from persisted state.
    ///
    /// The token is looked up in cookies first, then local storage, and the
    /// username and role are taken from wherever the token was found. A
    /// partial set of fields is treated as anonymous and both copies are
    /// erased. A complete session is copied to whichever side disagrees.
    ///
    /// # Errors
    ///
    /// Returns an error if a cleanup or repair write fails.
    pub fn hydrate(&self) -> Result<Session, StorageError> {
        let from_cookies = self.cookies.read();
        let from_local = self.local.read();

        let (source, other, other_adapter) = if from_cookies.has_token() {
            (&from_cookies, &from_local, &self.local)
        } else {
            (&from_local, &from_cookies, &self.cookies)
        };

        let session = match source.resolve() {
            Resolved::Complete(credentials) => {
                if *other != SessionParts::from_credentials(&credentials) {
                    debug!("repairing out-of-sync session copy");
                    other_adapter.write(&credentials)?;
                }

                Session::Authenticated(credentials)
            }
            Resolved::Empty if other.resolve() == Resolved::Empty => Session::Anonymous,
            Resolved::Empty | Resolved::Partial => {
                warn!("discarding incomplete persisted session");
                self.erase_all()?;

                Session::Anonymous
            }
        };

        self.replace(session.clone());

        Ok(session)
    }

    /// Make `credentials` the current session everywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if either copy could not be written.
    pub fn synchronize(&self, credentials: Credentials) -> Result<(), StorageError> {
        self.cookies.write(&credentials)?;
        self.local.write(&credentials)?;

        self.replace(Session::Authenticated(credentials));

        Ok(())
    }

    /// Forget the session everywhere.
    ///
    /// The in-memory session is anonymous afterwards even when erasing a
    /// persisted copy fails.
    ///
    /// # Errors
    ///
    /// Returns the first erase failure.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.replace(Session::Anonymous);

        self.erase_all()
    }

    /// Record whether the visitor asked to be remembered at login.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag could not be persisted.
    pub fn remember(&self, remember: bool) -> Result<(), StorageError> {
        if remember {
            self.storage.set_item(keys::REMEMBER_ME, "true")
        } else {
            self.storage.remove_item(keys::REMEMBER_ME)
        }
    }

    /// Whether the remember-me flag is set.
    pub fn is_remembered(&self) -> bool {
        self.storage.get_item(keys::REMEMBER_ME).as_deref() == Some("true")
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Credentials of the current session.
    pub fn credentials(&self) -> Option<Credentials> {
        self.current().credentials().cloned()
    }

    /// Token of the current session.
    pub fn token(&self) -> Option<String> {
        self.credentials().map(|credentials| credentials.token)
    }

    /// Role of the current session.
    pub fn role(&self) -> Option<Role> {
        self.current().role()
    }

    /// Whether someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.current().is_authenticated()
    }

    fn replace(&self, session: Session) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn erase_all(&self) -> Result<(), StorageError> {
        let cookies = self.cookies.erase();
        let local = self.local.erase();

        cookies.and(local)
    }
}
