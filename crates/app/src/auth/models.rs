//! Authentication models.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroizing;

fn expose<S: Serializer>(secret: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret)
}

/// Credentials posted to `/login/`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,

    /// Plain-text password
    #[serde(serialize_with = "expose")]
    pub password: Zeroizing<String>,
}

impl LoginRequest {
    /// Credentials for a login attempt.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl Debug for LoginRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Successful `/login/` response.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// Session token
    pub token: String,

    /// Canonical username
    pub username: String,

    /// `ADMIN`, `STAFF` or `USER`
    pub user_type: String,
}

impl Debug for LoginResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoginResponse")
            .field("username", &self.username)
            .field("user_type", &self.user_type)
            .finish_non_exhaustive()
    }
}

/// Account details posted to `/register/`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    /// Full name
    pub nama_lengkap: String,

    /// Desired username
    pub username: String,

    /// Email address
    pub email: String,

    /// Plain-text password
    #[serde(serialize_with = "expose")]
    pub password: Zeroizing<String>,
}

impl RegisterRequest {
    /// Sign-up details.
    #[must_use]
    pub fn new(
        nama_lengkap: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            nama_lengkap: nama_lengkap.into(),
            username: username.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl Debug for RegisterRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RegisterRequest")
            .field("nama_lengkap", &self.nama_lengkap)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Username
    pub username: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Full name
    #[serde(default)]
    pub nama_lengkap: String,

    /// Phone number
    #[serde(default)]
    pub phone: String,

    /// Delivery address
    #[serde(default)]
    pub address: String,

    /// Notes for the bakery
    #[serde(default)]
    pub notes: String,

    /// When the profile was created
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    /// When the profile last changed
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Editable profile fields, sent with `PUT /user/profile/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// Phone number
    pub phone: String,

    /// Delivery address
    pub address: String,

    /// Notes for the bakery
    pub notes: String,
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            notes: profile.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn passwords_are_sent_but_never_printed() -> TestResult {
        let request = LoginRequest::new("sari", "rahasia");

        assert_eq!(
            serde_json::to_value(&request)?,
            serde_json::json!({"username": "sari", "password": "rahasia"})
        );
        assert!(!format!("{request:?}").contains("rahasia"));

        Ok(())
    }

    #[test]
    fn sparse_profiles_deserialize() -> TestResult {
        let profile: UserProfile = serde_json::from_str(
            r#"{"username": "sari", "nama_lengkap": "Sari Wulandari", "created_at": "2024-05-01T08:00:00Z"}"#,
        )?;

        assert_eq!(profile.nama_lengkap, "Sari Wulandari");
        assert!(profile.phone.is_empty());
        assert!(profile.created_at.is_some());

        Ok(())
    }
}
