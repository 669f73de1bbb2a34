//! Cookies

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifetime of session cookies.
pub const SESSION_COOKIE_LIFETIME: SignedDuration = SignedDuration::from_hours(24 * 7);

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Sent with top-level navigations only.
    Lax,

    /// Never sent cross-site.
    Strict,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
        }
    }
}

/// A single cookie with the attributes the storefront sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,

    /// Cookie value
    pub value: String,

    /// Path scope
    pub path: String,

    /// Expiry instant
    pub expires_at: Timestamp,

    /// Cross-site policy
    pub same_site: SameSite,
}

impl Cookie {
    /// Session cookie: path `/`, seven-day expiry, `SameSite=Lax`.
    pub fn session(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::session_at(name, value, Timestamp::now())
    }

    /// Session cookie issued at the given instant.
    pub fn session_at(name: impl Into<String>, value: impl Into<String>, now: Timestamp) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            expires_at: now + SESSION_COOKIE_LIFETIME,
            same_site: SameSite::Lax,
        }
    }

    /// Whether the cookie has expired at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_set_cookie(&self) -> String {
        format!(
            "{}={}; Path={}; Expires={}; SameSite={}",
            self.name,
            self.value,
            self.path,
            self.expires_at.strftime("%a, %d %b %Y %H:%M:%S GMT"),
            self.same_site.as_str(),
        )
    }
}
