//! Order drafts

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    checkout::DeliveryMethod,
    storage::{LocalStorage, StorageError, keys},
};

/// Customer and delivery details collected on the order-data page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Recipient name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Delivery address
    pub address: String,

    /// Free-form notes for the bakery
    #[serde(default)]
    pub notes: String,

    /// Chosen delivery method
    pub delivery_method: DeliveryMethod,
}

/// The order-data form as the customer is filling it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraftForm {
    /// Recipient name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Delivery address
    pub address: String,

    /// Free-form notes
    pub notes: String,

    /// Chosen delivery method, if any
    pub delivery_method: Option<DeliveryMethod>,
}

/// Form validation failures, raised before anything is saved or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required fields were left blank.
    #[error("Mohon lengkapi semua data yang diperlukan")]
    MissingFields(Vec<&'static str>),

    /// Nothing in the cart can be ordered.
    #[error("Keranjang belanja kosong")]
    EmptyCart,

    /// A field holds a value of the wrong shape.
    #[error("{field} tidak valid")]
    Invalid {
        /// Offending field
        field: &'static str,
    },
}

impl OrderDraftForm {
    /// Start a form from an existing draft, e.g. when returning from the
    /// payment page.
    pub fn from_draft(draft: &OrderDraft) -> Self {
        Self {
            name: draft.name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            address: draft.address.clone(),
            notes: draft.notes.clone(),
            delivery_method: Some(draft.delivery_method),
        }
    }

    /// Check required fields and produce a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] listing every blank
    /// required field.
    pub fn validate(&self) -> Result<OrderDraft, ValidationError> {
        let mut missing = Vec::new();

        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }

        let Some(delivery_method) = self.delivery_method else {
            missing.push("deliveryMethod");
            return Err(ValidationError::MissingFields(missing));
        };

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(OrderDraft {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            notes: self.notes.trim().to_string(),
            delivery_method,
        })
    }
}

/// Raised when a draft cannot be saved.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Local storage rejected the write.
    #[error("failed to save order data")]
    Storage(#[from] StorageError),

    /// The draft could not be serialized.
    #[error("failed to serialize order data")]
    Serialization(#[from] serde_json::Error),
}

/// The `orderData` entry in local storage.
#[derive(Debug, Clone)]
pub struct DraftStore {
    storage: Arc<dyn LocalStorage>,
}

impl DraftStore {
    /// Wrap local storage.
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Persist a draft, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft could not be written.
    pub fn save(&self, draft: &OrderDraft) -> Result<(), DraftError> {
        self.storage
            .set_item(keys::ORDER_DATA, &serde_json::to_string(draft)?)?;

        Ok(())
    }

    /// The saved draft. Missing and unreadable drafts both read as `None`.
    pub fn load(&self) -> Option<OrderDraft> {
        let raw = self.storage.get_item(keys::ORDER_DATA)?;

        serde_json::from_str(&raw)
            .inspect_err(|error| warn!("ignoring unreadable order data: {error}"))
            .ok()
    }

    /// Delete the saved draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion could not be persisted.
    pub fn discard(&self) -> Result<(), StorageError> {
        self.storage.remove_item(keys::ORDER_DATA)
    }
}
