//! Profile.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::{routes::Route, session::SessionStore};
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, ProfileUpdate, UserProfile},
    context::AppContext,
    navigation::Navigator,
    pages::{ErrorBanner, UserMessage},
};

/// Profile fields that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Nomor telepon harus 10-13 digit")]
    Phone,

    #[error("Alamat minimal 10 karakter")]
    Address,
}

impl UserMessage for ProfileError {
    fn user_message(&self) -> String {
        self.to_string()
    }
}

impl ProfileUpdate {
    /// Check the fields that were filled in. Blank fields are allowed.
    ///
    /// # Errors
    ///
    /// Returns every field that is filled in with an unusable value.
    pub fn validate(&self) -> Result<(), Vec<ProfileError>> {
        let mut errors = Vec::new();

        let phone = self.phone.trim();
        if !phone.is_empty() {
            let digits = phone.strip_prefix('+').unwrap_or(phone);

            if !(10..=13).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
                errors.push(ProfileError::Phone);
            }
        }

        let address = self.address.trim();
        if !address.is_empty() && address.chars().count() < 10 {
            errors.push(ProfileError::Address);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Default)]
struct ProfileState {
    profile: Option<UserProfile>,
    form: Option<ProfileUpdate>,
    errors: Vec<ProfileError>,
    saving: bool,
    notice: Option<String>,
}

/// View and edit the signed-in customer's contact details.
pub struct ProfilePage {
    auth: Arc<dyn AuthService>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    state: Mutex<ProfileState>,
}

impl Debug for ProfilePage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProfilePage")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl ProfilePage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            auth: context.auth.clone(),
            session: context.session.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
            state: Mutex::new(ProfileState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the profile. Anonymous visitors are sent to login.
    pub async fn mount(&self) -> bool {
        if !self.session.is_authenticated() {
            self.navigator.navigate(Route::Login);
            return false;
        }

        self.reload().await
    }

    async fn reload(&self) -> bool {
        match self.auth.profile().await {
            Ok(profile) => {
                self.state().profile = Some(profile);
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Loaded profile.
    pub fn profile(&self) -> Option<UserProfile> {
        self.state().profile.clone()
    }

    /// Start editing from the loaded values.
    pub fn start_editing(&self) -> bool {
        let mut state = self.state();

        let Some(form) = state.profile.as_ref().map(ProfileUpdate::from) else {
            return false;
        };

        state.form = Some(form);
        state.errors.clear();
        state.notice = None;

        true
    }

    /// Change the open form.
    pub fn edit(&self, change: impl FnOnce(&mut ProfileUpdate)) -> bool {
        match self.state().form.as_mut() {
            Some(form) => {
                change(form);
                true
            }
            None => false,
        }
    }

    /// Discard the open form.
    pub fn cancel(&self) {
        let mut state = self.state();
        state.form = None;
        state.errors.clear();
    }

    /// Open form, if editing.
    pub fn form(&self) -> Option<ProfileUpdate> {
        self.state().form.clone()
    }

    /// Field errors from the last save attempt.
    pub fn field_errors(&self) -> Vec<ProfileError> {
        self.state().errors.clone()
    }

    /// Success message after saving.
    pub fn notice(&self) -> Option<String> {
        self.state().notice.clone()
    }

    /// Validate and save the form, then reload the profile.
    pub async fn save(&self) -> bool {
        let form = {
            let mut state = self.state();

            if state.saving {
                return false;
            }

            let Some(form) = state.form.clone() else {
                return false;
            };

            if let Err(errors) = form.validate() {
                state.errors = errors;
                return false;
            }

            state.errors.clear();
            state.saving = true;
            form
        };

        let result = self.auth.update_profile(form).await;

        self.state().saving = false;

        match result {
            Ok(profile) => {
                info!(username = %profile.username, "profile updated");

                let mut state = self.state();
                state.profile = Some(profile);
                state.form = None;
                state.notice = Some("Profil berhasil diperbarui".to_string());

                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}
