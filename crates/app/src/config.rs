//! Client configuration

use clap::Args;

mod api;
mod logging;
mod storage;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

/// Everything the client needs to start, from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Local state settings.
    #[command(flatten)]
    pub storage: StorageConfig,
}
