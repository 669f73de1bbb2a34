//! About.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    api::ApiClient,
    content::{ContentService, MemberType, TeamMember, Testimonial, TimelineEvent},
    context::AppContext,
    pages::ErrorBanner,
};

#[derive(Debug, Default)]
struct AboutState {
    founders: Vec<TeamMember>,
    team: Vec<TeamMember>,
    timeline: Vec<TimelineEvent>,
    testimonials: Vec<Testimonial>,
}

/// Founders, team, history and customer testimonials.
pub struct AboutPage {
    content: Arc<dyn ContentService>,
    api: Arc<ApiClient>,
    banner: ErrorBanner,
    state: Mutex<AboutState>,
}

impl Debug for AboutPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AboutPage")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl AboutPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            content: context.content.clone(),
            api: context.api.clone(),
            banner: ErrorBanner::new(),
            state: Mutex::new(AboutState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, AboutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load every section. Sections are shown in their `order`, and only
    /// active testimonials are kept.
    pub async fn mount(&self) -> bool {
        let (founders, team, timeline, testimonials) = tokio::join!(
            self.content.team_members(Some(MemberType::Founder)),
            self.content.team_members(Some(MemberType::Team)),
            self.content.timeline_events(),
            self.content.testimonials(),
        );

        let loaded = founders
            .and_then(|founders| Ok((founders, team?, timeline?, testimonials?)));

        match loaded {
            Ok((mut founders, mut team, mut timeline, mut testimonials)) => {
                founders.sort_by_key(|member| member.order);
                team.sort_by_key(|member| member.order);
                timeline.sort_by_key(|event| event.order);
                testimonials.retain(|testimonial| testimonial.is_active);
                testimonials.sort_by_key(|testimonial| testimonial.order);

                *self.state() = AboutState {
                    founders,
                    team,
                    timeline,
                    testimonials,
                };

                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Founders.
    pub fn founders(&self) -> Vec<TeamMember> {
        self.state().founders.clone()
    }

    /// Team members.
    pub fn team(&self) -> Vec<TeamMember> {
        self.state().team.clone()
    }

    /// Timeline, oldest first.
    pub fn timeline(&self) -> Vec<TimelineEvent> {
        self.state().timeline.clone()
    }

    /// Published testimonials.
    pub fn testimonials(&self) -> Vec<Testimonial> {
        self.state().testimonials.clone()
    }

    /// Absolute URL of an uploaded picture.
    pub fn image_url(&self, reference: Option<&str>) -> Option<String> {
        reference
            .filter(|reference| !reference.is_empty())
            .map(|reference| self.api.media_url(reference))
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}
