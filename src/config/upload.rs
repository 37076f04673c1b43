//! Multipart ingestion configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Upload limits and the storage root for accepted submissions
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted multipart body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Upper bound on the time spent reading a multipart body, in seconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Root directory for persisted submissions
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl UploadConfig {
    /// Get read timeout as Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Validate upload configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_body_bytes == 0 {
            return Err(ValidationError::InvalidBodyLimit);
        }
        if self.read_timeout_secs == 0 || self.read_timeout_secs > 600 {
            return Err(ValidationError::InvalidReadTimeout);
        }
        if self.storage_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("UPLOAD__STORAGE_DIR"));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            read_timeout_secs: default_read_timeout(),
            storage_dir: default_storage_dir(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_read_timeout() -> u64 {
    30
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}
