//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use buckery::{checkout::PaymentSubmission, payments::PaymentStatus};
use mockall::automock;
use serde_json::json;
use tracing::info;

use crate::{
    api::{ApiClient, ApiError},
    payments::{Payment, PaymentId, payment_form},
};

#[derive(Debug, Clone)]
pub struct HttpPaymentsService {
    api: Arc<ApiClient>,
}

impl HttpPaymentsService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.api.get("/payments/").await
    }

    async fn create_payment(&self, submission: PaymentSubmission) -> Result<Payment, ApiError> {
        let form = payment_form(&submission)
            .map_err(|error| ApiError::InvalidRequest(error.to_string()))?;

        let payment: Payment = self.api.post_form("/payments/", form).await?;

        info!(payment = %payment.id, total = %payment.total, "payment submitted");

        Ok(payment)
    }

    async fn update_status(&self, id: PaymentId, status: PaymentStatus) -> Result<(), ApiError> {
        self.api
            .patch::<_, serde_json::Value>(
                &format!("/payments/{id}/"),
                &json!({ "status": status.as_str() }),
            )
            .await?;

        info!(payment = %id, %status, "payment reviewed");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Payments visible to the signed-in account: a customer's own, or all of
    /// them for the back office.
    async fn list_payments(&self) -> Result<Vec<Payment>, ApiError>;

    /// Upload a checkout submission.
    async fn create_payment(&self, submission: PaymentSubmission) -> Result<Payment, ApiError>;

    /// Record a review decision.
    async fn update_status(&self, id: PaymentId, status: PaymentStatus) -> Result<(), ApiError>;
}
