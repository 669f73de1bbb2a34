//! API errors.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Shown when the server gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport error occurred, including timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session token was rejected. The session has already been cleared.
    #[error("session expired")]
    Unauthorized,

    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// Response status
        status: StatusCode,

        /// Best-effort explanation from the response body
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build a status error, pulling a message out of the response body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            message: extract_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Http(error) => error.status(),
            Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Text for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Unauthorized => "Sesi Anda telah berakhir. Silakan login kembali.".to_string(),
            Self::Http(error) if error.is_timeout() => {
                "Server tidak merespons. Silakan coba lagi.".to_string()
            }
            Self::Http(error) if error.is_connect() => {
                "Tidak dapat terhubung ke server.".to_string()
            }
            Self::Http(_) | Self::Decode(_) | Self::InvalidRequest(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Find a human-readable message in an error body: `message`, `detail` or
/// `error` first, otherwise the first field error. Field errors are visited in
/// key order.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    ["message", "detail", "error"]
        .into_iter()
        .find_map(|key| object.get(key).and_then(first_text))
        .or_else(|| object.values().find_map(first_text))
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(values) => values.iter().find_map(first_text),
        _ => None,
    }
}
