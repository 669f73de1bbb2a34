//! Error banner.

use std::{
    fmt::Display,
    sync::{Mutex, PoisonError},
};

use buckery::{
    cart::CartError,
    checkout::{CheckoutError, ProofError, ValidationError},
};
use tracing::warn;

use crate::{
    api::{ApiError, GENERIC_ERROR_MESSAGE},
    session::SessionError,
};

/// Errors that can be shown to the visitor.
pub trait UserMessage {
    /// Text for the banner.
    fn user_message(&self) -> String;
}

impl UserMessage for ApiError {
    fn user_message(&self) -> String {
        ApiError::user_message(self)
    }
}

impl UserMessage for SessionError {
    fn user_message(&self) -> String {
        SessionError::user_message(self)
    }
}

impl UserMessage for ValidationError {
    fn user_message(&self) -> String {
        self.to_string()
    }
}

impl UserMessage for CheckoutError {
    fn user_message(&self) -> String {
        match self {
            Self::NoDraft => "Silakan isi data pemesanan terlebih dahulu".to_string(),
            Self::InProgress => "Pembayaran sedang diproses".to_string(),
            Self::Validation(error) => error.to_string(),
            Self::Proof(error) => error.user_message(),
            Self::Draft(_) | Self::Cart(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl UserMessage for ProofError {
    fn user_message(&self) -> String {
        match self {
            Self::Io(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl UserMessage for CartError {
    fn user_message(&self) -> String {
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

/// Dismissible error message shown at the top of a page.
#[derive(Debug, Default)]
pub struct ErrorBanner {
    message: Mutex<Option<String>>,
}

impl ErrorBanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a message, replacing the previous one.
    pub fn show(&self, message: impl Into<String>) {
        *self.message.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Show an error.
    pub fn report(&self, error: &(impl UserMessage + Display)) {
        warn!(%error, "showing error banner");

        self.show(error.user_message());
    }

    /// Hide the banner.
    pub fn dismiss(&self) {
        *self.message.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Message on display, if any.
    pub fn message(&self) -> Option<String> {
        self.message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a message is on display.
    pub fn is_visible(&self) -> bool {
        self.message().is_some()
    }
}
