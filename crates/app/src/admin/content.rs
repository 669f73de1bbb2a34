//! Testimonial, team and timeline management.

use buckery::checkout::ValidationError;
use serde_json::Value;

use crate::{
    admin::{
        Activatable, CrudPage, ImageUpload, Resource,
        resource::{finish, integer, optional, required},
    },
    content::{MemberType, TeamMember, Testimonial, TimelineEvent},
};

/// Testimonial form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestimonialForm {
    /// Customer handle
    pub username: String,

    /// Quote
    pub message: String,

    /// Short caption
    pub tagline: String,

    /// Shown on the landing page
    pub is_active: bool,

    /// Display position as typed
    pub order: String,

    /// Newly chosen photo
    pub image: Option<ImageUpload>,
}

impl Default for TestimonialForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            message: String::new(),
            tagline: String::new(),
            is_active: true,
            order: String::new(),
            image: None,
        }
    }
}

impl Resource for Testimonial {
    type Form = TestimonialForm;

    const PATH: &'static str = "/testimonials/";
    const NAME: &'static str = "testimonial";

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn to_form(&self) -> TestimonialForm {
        TestimonialForm {
            username: self.username.clone(),
            message: self.message.clone(),
            tagline: self.tagline.clone(),
            is_active: self.is_active,
            order: self.order.to_string(),
            image: None,
        }
    }

    fn fields(form: &TestimonialForm) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        let mut missing = Vec::new();

        let username = required(&mut missing, "username", &form.username);
        let message = required(&mut missing, "message", &form.message);
        let tagline = required(&mut missing, "tagline", &form.tagline);

        finish(
            missing,
            vec![
                ("username", username),
                ("message", message),
                ("tagline", tagline),
                ("is_active", Value::Bool(form.is_active)),
                ("order", integer("order", &form.order)?),
            ],
        )
    }

    fn image(form: &TestimonialForm) -> Option<&ImageUpload> {
        form.image.as_ref()
    }
}

impl Activatable for Testimonial {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Team member form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMemberForm {
    /// Full name
    pub name: String,

    /// Job title
    pub role: String,

    /// Personal quote
    pub quote: String,

    /// Founder or team
    pub member_type: MemberType,

    /// Display position as typed
    pub order: String,

    /// Newly chosen portrait
    pub image: Option<ImageUpload>,
}

impl Resource for TeamMember {
    type Form = TeamMemberForm;

    const PATH: &'static str = "/team-members/";
    const NAME: &'static str = "team member";

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn to_form(&self) -> TeamMemberForm {
        TeamMemberForm {
            name: self.name.clone(),
            role: self.role.clone(),
            quote: self.quote.clone().unwrap_or_default(),
            member_type: self.member_type,
            order: self.order.to_string(),
            image: None,
        }
    }

    fn fields(form: &TeamMemberForm) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        let mut missing = Vec::new();

        let name = required(&mut missing, "name", &form.name);
        let role = required(&mut missing, "role", &form.role);

        finish(
            missing,
            vec![
                ("name", name),
                ("role", role),
                ("quote", optional(&form.quote)),
                ("member_type", Value::from(form.member_type.as_str())),
                ("order", integer("order", &form.order)?),
            ],
        )
    }

    fn image(form: &TeamMemberForm) -> Option<&ImageUpload> {
        form.image.as_ref()
    }
}

impl CrudPage<TeamMember> {
    /// Show only founders or only the team, or everyone.
    pub async fn filter_member_type(&self, member_type: Option<MemberType>) -> bool {
        self.set_filter("type", member_type.map(|member_type| member_type.to_string()))
            .await
    }
}

/// Timeline event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineEventForm {
    /// Four-digit year
    pub year: String,

    /// Headline
    pub title: String,

    /// Body text
    pub description: String,

    /// Display position as typed
    pub order: String,

    /// Newly chosen illustration
    pub image: Option<ImageUpload>,
}

impl Resource for TimelineEvent {
    type Form = TimelineEventForm;

    const PATH: &'static str = "/timeline-events/";
    const NAME: &'static str = "timeline event";

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn to_form(&self) -> TimelineEventForm {
        TimelineEventForm {
            year: self.year.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            order: self.order.to_string(),
            image: None,
        }
    }

    fn fields(form: &TimelineEventForm) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        let mut missing = Vec::new();

        let year = required(&mut missing, "year", &form.year);
        let title = required(&mut missing, "title", &form.title);
        let description = required(&mut missing, "description", &form.description);

        let year_text = form.year.trim();
        if !year_text.is_empty()
            && (year_text.len() != 4 || !year_text.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(ValidationError::Invalid { field: "year" });
        }

        finish(
            missing,
            vec![
                ("year", year),
                ("title", title),
                ("description", description),
                ("order", integer("order", &form.order)?),
            ],
        )
    }

    fn image(form: &TimelineEventForm) -> Option<&ImageUpload> {
        form.image.as_ref()
    }
}
