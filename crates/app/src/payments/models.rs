//! Payment models.

use buckery::{
    checkout::{CartSnapshot, PaymentSubmission},
    ids::TypedId,
    money::Amount,
    payments::{PaymentMethod, PaymentStatus},
};
use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::api::{FilePart, FormPayload};

/// Payment id.
pub type PaymentId = TypedId<Payment>;

/// A submitted payment as stored by the backend.
///
/// The backend speaks snake case; some deployments answer in camel case, so
/// both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Record id
    pub id: PaymentId,

    /// Human-facing order number
    #[serde(default, alias = "orderNumber")]
    pub order_number: Option<String>,

    /// Customer name
    #[serde(alias = "customerName")]
    pub customer_name: String,

    /// Contact phone
    #[serde(default)]
    pub phone: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Delivery address
    #[serde(default)]
    pub address: String,

    /// Ordered lines
    #[serde(default, deserialize_with = "snapshot")]
    pub items: CartSnapshot,

    /// Grand total
    pub total: Amount,

    /// Payment method
    #[serde(alias = "paymentMethod")]
    pub payment_method: PaymentMethod,

    /// Proof image reference
    #[serde(default, alias = "paymentProof")]
    pub payment_proof: Option<String>,

    /// Review status
    #[serde(default)]
    pub status: PaymentStatus,

    /// Submission time
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Timestamp>,
}

impl Payment {
    /// Label shown for the order, e.g. `#BK-0007` or `#7`.
    pub fn display_number(&self) -> String {
        match &self.order_number {
            Some(number) if !number.is_empty() => format!("#{number}"),
            _ => format!("#{}", self.id),
        }
    }
}

/// The `items` field is stored as the JSON text the client uploaded and may
/// come back either as that text or already parsed.
fn snapshot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CartSnapshot, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Parsed(CartSnapshot),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => serde_json::from_str(&text).map_err(D::Error::custom),
        Raw::Parsed(snapshot) => Ok(snapshot),
    }
}

/// Multipart body for `POST /payments/`.
///
/// # Errors
///
/// Returns an error if the cart snapshot cannot be serialized.
pub fn payment_form(submission: &PaymentSubmission) -> Result<FormPayload, serde_json::Error> {
    let form = submission
        .text_fields()?
        .into_iter()
        .fold(FormPayload::new(), |form, (name, value)| form.text(name, value));

    Ok(form.file(FilePart {
        field: "payment_proof".to_string(),
        file_name: submission.proof.file_name().to_string(),
        mime: submission.proof.content_type().mime().to_string(),
        bytes: submission.proof.bytes().to_vec(),
    }))
}
