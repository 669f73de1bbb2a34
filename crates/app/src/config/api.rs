//! API Config

use std::time::Duration;

use clap::Args;
use url::Url;

/// Backend API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the REST API, including the `/api` prefix
    #[arg(long, env = "BUCKERY_API_URL", default_value = "http://localhost:8000/api")]
    pub api_url: Url,

    /// Seconds before an API request is abandoned
    #[arg(long, env = "BUCKERY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// WhatsApp number used by the contact page when the API has none
    #[arg(long, env = "BUCKERY_WHATSAPP_NUMBER", default_value = "6281234567890")]
    pub whatsapp_number: String,
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
