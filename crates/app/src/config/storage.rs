//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where the client keeps its local storage and cookies between runs.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding `local-storage.json` and `cookies.json`
    #[arg(long, env = "BUCKERY_STATE_DIR", default_value = ".buckery")]
    pub state_dir: PathBuf,
}

impl StorageConfig {
    /// Path of the local storage file.
    #[must_use]
    pub fn local_storage_path(&self) -> PathBuf {
        self.state_dir.join("local-storage.json")
    }

    /// Path of the cookie jar file.
    #[must_use]
    pub fn cookie_jar_path(&self) -> PathBuf {
        self.state_dir.join("cookies.json")
    }
}
