//! File-backed Keyed Store Adapter
//!
//! Keeps the whole aggregate map in memory and rewrites it as one JSON
//! file on every mutation. Writes are retried with exponential backoff;
//! if every attempt fails the in-memory mutation is undone so memory and
//! file converge again.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::Mutex;

use crate::ports::{KeyedStore, StoreError};

/// Retry budget for file writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total write attempts before giving up.
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubles after each further one.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Backoff after the failed attempt numbered `attempt` (0-based):
    /// `base_backoff * 2^attempt`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// File-backed store for one aggregate type.
#[derive(Debug)]
pub struct FileKeyedStore<T> {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, T>>,
    retry: RetryPolicy,
}

impl<T> FileKeyedStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Open a store at `path`, loading existing contents.
    ///
    /// A missing file yields an empty store; the parent directory is
    /// created if needed.
    ///
    /// # Example
    /// ```ignore
    /// let sessions = FileKeyedStore::<Session>::open("./data/sessions.json", RetryPolicy::default()).await?;
    /// ```
    pub async fn open<P: AsRef<Path>>(path: P, retry: RetryPolicy) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let load_err = |reason: String| StoreError::LoadFailed {
            path: path.clone(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| load_err(e.to_string()))?;
        }

        let entries = match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| load_err(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(load_err(e.to_string())),
        };

        tracing::debug!(path = %path.display(), count = entries.len(), "Opened keyed store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            retry,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored values.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Write the whole map, retrying with backoff.
    async fn persist(&self, entries: &BTreeMap<String, T>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        let attempts = self.retry.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.write_file(&bytes).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(
                        path = %self.path.display(),
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %e,
                        "Store write failed"
                    );
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.retry.backoff_for(attempt)).await;
                    }
                }
            }
        }

        Err(StoreError::WriteFailed {
            path: self.path.clone(),
            attempts,
            reason: last_error,
        })
    }

    /// Write to a sibling temp file, then rename over the target. The temp
    /// file is removed again if either half fails.
    async fn write_file(&self, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = self.temp_path();
        let result = match fs::write(&tmp, bytes).await {
            Ok(()) => fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp.display(), error = %e, "Could not remove temp file");
                }
            }
        }
        result
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl<T> KeyedStore<T> for FileKeyedStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn save(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value.clone());

        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            tracing::error!(path = %self.path.display(), key, error = %e, "Save rolled back");
            return Err(e);
        }
        Ok(())
    }

    async fn find(&self, key: &str) -> Option<T> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn find_all(&self) -> Vec<T> {
        self.entries.lock().await.values().cloned().collect()
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let Some(removed) = entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&entries).await {
            entries.insert(key.to_string(), removed);
            tracing::error!(path = %self.path.display(), key, error = %e, "Delete rolled back");
            return Err(e);
        }
        Ok(())
    }
}
