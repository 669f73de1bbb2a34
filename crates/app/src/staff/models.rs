//! Staff models.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use buckery::ids::TypedId;
use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroizing;

/// Staff account id.
pub type StaffId = TypedId<StaffMember>;

/// Back-office account managed by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Account id
    pub id: StaffId,

    /// Username
    pub username: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Full name
    #[serde(default)]
    pub nama_lengkap: String,

    /// Whether the account may sign in
    #[serde(default)]
    pub is_active: bool,
}

/// New staff account, posted to `/admin/staff/`.
#[derive(Clone, Default, Serialize)]
pub struct NewStaff {
    /// Username
    pub username: String,

    /// Initial password
    #[serde(serialize_with = "expose")]
    pub password: Zeroizing<String>,

    /// Email address
    pub email: String,

    /// Full name
    pub nama_lengkap: String,
}

fn expose<S: Serializer>(secret: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret)
}

impl NewStaff {
    /// Blank required fields, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("email", self.email.as_str()),
            ("nama_lengkap", self.nama_lengkap.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

impl Debug for NewStaff {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewStaff")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("nama_lengkap", &self.nama_lengkap)
            .finish_non_exhaustive()
    }
}
