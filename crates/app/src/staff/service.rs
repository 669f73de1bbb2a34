//! Staff service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;

use crate::{
    api::{ApiClient, ApiError},
    staff::{NewStaff, StaffId, StaffMember},
};

#[derive(Debug, Clone)]
pub struct HttpStaffService {
    api: Arc<ApiClient>,
}

impl HttpStaffService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StaffService for HttpStaffService {
    async fn list_staff(&self) -> Result<Vec<StaffMember>, ApiError> {
        self.api.get("/admin/staff/").await
    }

    async fn create_staff(&self, staff: NewStaff) -> Result<StaffMember, ApiError> {
        self.api.post("/admin/staff/", &staff).await
    }

    async fn set_active(&self, id: StaffId, active: bool) -> Result<StaffMember, ApiError> {
        self.api
            .patch(&format!("/admin/staff/{id}/"), &json!({ "is_active": active }))
            .await
    }
}

#[automock]
#[async_trait]
pub trait StaffService: Send + Sync {
    /// Every staff account.
    async fn list_staff(&self) -> Result<Vec<StaffMember>, ApiError>;

    /// Create a staff account.
    async fn create_staff(&self, staff: NewStaff) -> Result<StaffMember, ApiError>;

    /// Enable or disable a staff account.
    async fn set_active(&self, id: StaffId, active: bool) -> Result<StaffMember, ApiError>;
}
