//! Content service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::{
    api::{ApiClient, ApiError},
    content::{ContactInfo, MemberType, TeamMember, Testimonial, TimelineEvent},
};

/// `/contact-info/` answers with a list or with the single record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContactInfoResponse {
    List(Vec<ContactInfo>),
    Single(ContactInfo),
}

#[derive(Debug, Clone)]
pub struct HttpContentService {
    api: Arc<ApiClient>,
}

impl HttpContentService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn team_members(
        &self,
        member_type: Option<MemberType>,
    ) -> Result<Vec<TeamMember>, ApiError> {
        match member_type {
            Some(member_type) => {
                self.api
                    .get_with_query("/team-members/", &[("type", member_type.as_str())])
                    .await
            }
            None => self.api.get("/team-members/").await,
        }
    }

    async fn timeline_events(&self) -> Result<Vec<TimelineEvent>, ApiError> {
        self.api.get("/timeline-events/").await
    }

    async fn testimonials(&self) -> Result<Vec<Testimonial>, ApiError> {
        self.api.get("/testimonials/").await
    }

    async fn contact_info(&self) -> Result<Option<ContactInfo>, ApiError> {
        let response: ContactInfoResponse = self.api.get("/contact-info/").await?;

        Ok(match response {
            ContactInfoResponse::List(records) => records.into_iter().next(),
            ContactInfoResponse::Single(record) => Some(record),
        })
    }
}

#[automock]
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Team members, optionally only founders or only staff.
    async fn team_members(
        &self,
        member_type: Option<MemberType>,
    ) -> Result<Vec<TeamMember>, ApiError>;

    /// Company milestones.
    async fn timeline_events(&self) -> Result<Vec<TimelineEvent>, ApiError>;

    /// Every testimonial, active or not.
    async fn testimonials(&self) -> Result<Vec<Testimonial>, ApiError>;

    /// The shop's contact record, if one exists.
    async fn contact_info(&self) -> Result<Option<ContactInfo>, ApiError>;
}
