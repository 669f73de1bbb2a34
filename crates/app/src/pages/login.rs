//! Login and registration.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, PoisonError},
};

use buckery::{
    checkout::ValidationError,
    routes::{Area, GuardDecision, Route, guard_admin_layout, landing_after_login},
    session::Session,
};

use crate::{
    auth::{LoginRequest, RegisterRequest},
    context::AppContext,
    navigation::Navigator,
    pages::ErrorBanner,
    session::SessionManager,
};

/// Customer or back-office login form.
pub struct LoginPage {
    area: Area,
    sessions: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    submitting: Mutex<bool>,
}

impl Debug for LoginPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoginPage")
            .field("area", &self.area)
            .finish_non_exhaustive()
    }
}

impl LoginPage {
    /// Login page for one area; [`Area::Admin`] refuses customer accounts.
    #[must_use]
    pub fn new(context: &AppContext, area: Area) -> Self {
        Self {
            area,
            sessions: context.sessions.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
            submitting: Mutex::new(false),
        }
    }

    /// Skip the back-office login page for someone already signed in to the
    /// back office. Returns `false` after redirecting.
    pub fn mount(&self) -> bool {
        let session = self.sessions.current();

        if self.area == Area::Admin
            && matches!(session, Session::Authenticated(_))
            && guard_admin_layout(&session) == GuardDecision::Allow
        {
            self.navigator.navigate(Route::AdminDashboard);
            return false;
        }

        true
    }

    /// Sign in and go to the landing page for the account's role.
    pub async fn submit(&self, username: &str, password: &str, remember: bool) -> bool {
        if username.trim().is_empty() || password.is_empty() {
            let mut missing = Vec::new();
            if username.trim().is_empty() {
                missing.push("username");
            }
            if password.is_empty() {
                missing.push("password");
            }

            self.banner.report(&ValidationError::MissingFields(missing));
            return false;
        }

        {
            let mut submitting = self.submitting.lock().unwrap_or_else(PoisonError::into_inner);
            if *submitting {
                return false;
            }
            *submitting = true;
        }

        let result = self
            .sessions
            .sign_in(LoginRequest::new(username.trim(), password), self.area, remember)
            .await;

        *self.submitting.lock().unwrap_or_else(PoisonError::into_inner) = false;

        match result {
            Ok(credentials) => {
                self.banner.dismiss();
                self.navigator.navigate(landing_after_login(credentials.role));
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

/// Customer sign-up form.
pub struct RegisterPage {
    sessions: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
}

impl Debug for RegisterPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RegisterPage").finish_non_exhaustive()
    }
}

impl RegisterPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            sessions: context.sessions.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
        }
    }

    /// Create the account and continue to the login page.
    pub async fn submit(&self, request: RegisterRequest) -> bool {
        let missing: Vec<_> = [
            ("nama_lengkap", request.nama_lengkap.as_str()),
            ("username", request.username.as_str()),
            ("email", request.email.as_str()),
            ("password", request.password.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            self.banner.report(&ValidationError::MissingFields(missing));
            return false;
        }

        match self.sessions.register(request).await {
            Ok(()) => {
                self.navigator.navigate(Route::Login);
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
