//! Keyed Store Port - Interface for per-aggregate persistence.
//!
//! Each aggregate type (sessions, conferences, speakers, ...) owns exactly
//! one store. A store is a string-keyed map whose every mutation is
//! individually atomic; there is no transaction spanning two stores.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::foundation::DomainError;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Write to {path} failed after {attempts} attempts: {reason}")]
    WriteFailed {
        path: PathBuf,
        attempts: u32,
        reason: String,
    },

    #[error("Failed to serialize store contents: {0}")]
    SerializationFailed(String),

    #[error("Failed to load store from {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::persistence(err.to_string())
    }
}

/// Port for a write-through keyed store of one aggregate type.
///
/// Implementations must ensure:
/// - Reads are served from the in-memory view
/// - A failed mutation leaves the in-memory view unchanged
/// - Writers to the same store are serialized
#[async_trait]
pub trait KeyedStore<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Insert or overwrite the value at `key`.
    ///
    /// # Errors
    /// Returns `StoreError::WriteFailed` once the retry budget is spent;
    /// the previous value (or absence) is restored first.
    async fn save(&self, key: &str, value: &T) -> Result<(), StoreError>;

    /// Look up a value by key.
    async fn find(&self, key: &str) -> Option<T>;

    /// All stored values, in key order.
    async fn find_all(&self) -> Vec<T>;

    /// Remove the value at `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns `StoreError::WriteFailed` once the retry budget is spent;
    /// the removed value is reinstated first.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check if a key is present.
    async fn contains(&self, key: &str) -> bool {
        self.find(key).await.is_some()
    }
}
