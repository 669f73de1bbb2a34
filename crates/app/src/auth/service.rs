//! Authentication service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::debug;

use crate::{
    api::{ApiClient, ApiError},
    auth::{LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, UserProfile},
};

#[derive(Debug, Clone)]
pub struct HttpAuthService {
    api: Arc<ApiClient>,
}

impl HttpAuthService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        debug!(username = %request.username, "signing in");

        self.api.post("/login/", &request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        self.api.post::<_, Value>("/register/", &request).await?;

        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.api.post_empty("/logout/").await
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.api.get("/user/profile/").await
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.api.put("/user/profile/", &update).await
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Create a customer account.
    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError>;

    /// Invalidate the current token on the server.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Profile of the signed-in user. Also serves as the token check.
    async fn profile(&self) -> Result<UserProfile, ApiError>;

    /// Replace the editable profile fields.
    async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, ApiError>;
}
