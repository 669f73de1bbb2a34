//! Session
//!
//! The signed-in identity of the current visitor. There is exactly one
//! authoritative [`SessionStore`]; cookies and local storage are just the two
//! places it writes itself to.

use std::fmt::{Debug, Formatter, Result as FmtResult};

mod adapters;
mod role;
mod store;

pub use adapters::{
    CookieSessionAdapter, LocalSessionAdapter, Resolved, SessionAdapter, SessionParts,
};
pub use role::{Role, UnknownRole};
pub use store::SessionStore;

/// Token, username and role of a signed-in account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API token sent as `Authorization: Token <token>`
    pub token: String,

    /// Account username
    pub username: String,

    /// Account role
    pub role: Role,
}

impl Credentials {
    /// Bundle the three session fields.
    pub fn new(token: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            role,
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

/// Current session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is signed in.
    #[default]
    Anonymous,

    /// A complete, consistent set of credentials.
    Authenticated(Credentials),
}

impl Session {
    /// Credentials when signed in.
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(credentials) => Some(credentials),
        }
    }

    /// Whether someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Role of the signed-in account.
    pub fn role(&self) -> Option<Role> {
        self.credentials().map(|credentials| credentials.role)
    }

    /// Username of the signed-in account.
    pub fn username(&self) -> Option<&str> {
        self.credentials()
            .map(|credentials| credentials.username.as_str())
    }

    /// Whether the signed-in account may use the back office.
    pub fn is_back_office(&self) -> bool {
        self.role().is_some_and(Role::is_back_office)
    }
}
