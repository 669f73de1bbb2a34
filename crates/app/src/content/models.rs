//! Content models.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use buckery::ids::TypedId;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Team member id.
pub type TeamMemberId = TypedId<TeamMember>;

/// Timeline event id.
pub type TimelineEventId = TypedId<TimelineEvent>;

/// Testimonial id.
pub type TestimonialId = TypedId<Testimonial>;

/// Contact record id.
pub type ContactInfoId = TypedId<ContactInfo>;

/// Founder or regular team member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberType {
    /// Company founder
    Founder,

    /// Everyone else
    #[default]
    Team,
}

impl MemberType {
    /// Wire representation, also the `?type=` filter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Founder => "FOUNDER",
            Self::Team => "TEAM",
        }
    }
}

impl Display for MemberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown member type: {0}")]
pub struct UnknownMemberType(pub String);

impl FromStr for MemberType {
    type Err = UnknownMemberType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FOUNDER" => Ok(Self::Founder),
            "TEAM" => Ok(Self::Team),
            _ => Err(UnknownMemberType(value.to_string())),
        }
    }
}

/// Person shown on the about page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Record id
    pub id: TeamMemberId,

    /// Full name
    pub name: String,

    /// Job title
    pub role: String,

    /// Personal quote
    #[serde(default)]
    pub quote: Option<String>,

    /// Portrait reference
    #[serde(default)]
    pub image: Option<String>,

    /// Founder or team
    #[serde(default)]
    pub member_type: MemberType,

    /// Display position
    #[serde(default)]
    pub order: i64,
}

/// Milestone on the about page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Record id
    pub id: TimelineEventId,

    /// Four-digit year
    pub year: String,

    /// Headline
    pub title: String,

    /// Body text
    #[serde(default)]
    pub description: String,

    /// Illustration reference
    #[serde(default)]
    pub image: Option<String>,

    /// Display position
    #[serde(default)]
    pub order: i64,
}

/// Customer quote shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Record id
    pub id: TestimonialId,

    /// Customer handle
    pub username: String,

    /// Quote
    pub message: String,

    /// Short caption
    #[serde(default)]
    pub tagline: String,

    /// Photo reference
    #[serde(default)]
    pub image: Option<String>,

    /// Whether the testimonial is shown
    #[serde(default)]
    pub is_active: bool,

    /// Display position
    #[serde(default)]
    pub order: i64,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Shop contact details. There is at most one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Record id
    pub id: ContactInfoId,

    /// Street address
    pub location: String,

    /// WhatsApp number, international format without `+`
    pub whatsapp_number: String,

    /// Secondary phone number
    #[serde(default)]
    pub phone_number2: Option<String>,

    /// Email address
    pub email: String,

    /// Instagram handle
    #[serde(default)]
    pub instagram: String,

    /// Monday to Friday opening hours
    #[serde(default)]
    pub weekday_hours: String,

    /// Saturday opening hours
    #[serde(default)]
    pub saturday_hours: String,

    /// Sunday opening hours
    #[serde(default)]
    pub sunday_hours: String,

    /// Map latitude
    #[serde(default)]
    pub latitude: Option<Decimal>,

    /// Map longitude
    #[serde(default)]
    pub longitude: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn member_types_are_uppercase_on_the_wire() -> TestResult {
        let member: TeamMember = serde_json::from_str(
            r#"{"id": 1, "name": "Rina", "role": "Head Baker", "quote": null, "image": null, "member_type": "FOUNDER", "order": 0}"#,
        )?;

        assert_eq!(member.member_type, MemberType::Founder);
        assert_eq!("team".parse::<MemberType>()?, MemberType::Team);
        assert!("intern".parse::<MemberType>().is_err());

        Ok(())
    }

    #[test]
    fn coordinates_accept_strings_and_numbers() -> TestResult {
        let contact: ContactInfo = serde_json::from_str(
            r#"{
                "id": 1,
                "location": "Karawang",
                "whatsapp_number": "6281234567890",
                "email": "halo@buckery.id",
                "latitude": "-6.305000",
                "longitude": 107.3
            }"#,
        )?;

        assert_eq!(contact.latitude, Some(Decimal::new(-6_305_000, 6)));
        assert!(contact.longitude.is_some());
        assert!(contact.phone_number2.is_none());

        Ok(())
    }
}
