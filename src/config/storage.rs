//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::storage::RetryPolicy;

/// File-store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per aggregate type
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Write attempts before a store gives up
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,

    /// Backoff after the first failed write, doubled per retry
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

impl StorageConfig {
    /// Backing file for an aggregate type, e.g. `sessions` -> `<data_dir>/sessions.json`
    pub fn path_for(&self, aggregate: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", aggregate))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_write_attempts,
            base_backoff: Duration::from_millis(self.base_backoff_ms),
        }
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        if self.max_write_attempts == 0 {
            return Err(ValidationError::InvalidWriteAttempts);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_write_attempts: default_max_write_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_write_attempts() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    100
}
