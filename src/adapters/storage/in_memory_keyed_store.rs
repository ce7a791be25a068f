//! In-Memory Keyed Store Adapter
//!
//! Stores values in memory only. Useful for testing and development;
//! failures can be injected to exercise workflow compensation.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{KeyedStore, StoreError};

/// In-memory store with optional failure injection.
#[derive(Debug, Clone)]
pub struct InMemoryKeyedStore<T> {
    entries: Arc<RwLock<BTreeMap<String, T>>>,
    saves_until_failure: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    failing_keys: Arc<RwLock<BTreeSet<String>>>,
    save_attempts: Arc<AtomicUsize>,
}

impl<T> InMemoryKeyedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            saves_until_failure: Arc::new(AtomicUsize::new(0)),
            fail_saves: Arc::new(AtomicBool::new(false)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
            failing_keys: Arc::new(RwLock::new(BTreeSet::new())),
            save_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every subsequent save fail (or succeed again with `false`).
    pub fn fail_saves(&self, fail: bool) {
        self.saves_until_failure.store(0, Ordering::SeqCst);
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Let the next `n` saves succeed, then fail every save after them.
    pub fn fail_saves_after(&self, n: usize) {
        self.saves_until_failure.store(n, Ordering::SeqCst);
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent save of `key` fail, leaving other keys alone.
    pub async fn fail_saves_for(&self, key: &str) {
        self.failing_keys.write().await.insert(key.to_string());
    }

    /// Make every subsequent delete fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of `save` calls seen, successful or not.
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    /// Insert without going through failure injection (test setup).
    pub async fn seed(&self, key: &str, value: T) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    /// Get the number of stored values
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn injected_failure(&self) -> StoreError {
        StoreError::WriteFailed {
            path: PathBuf::from("memory"),
            attempts: 1,
            reason: "injected failure".to_string(),
        }
    }

    fn save_should_fail(&self) -> bool {
        if !self.fail_saves.load(Ordering::SeqCst) {
            return false;
        }
        self.saves_until_failure
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
    }
}

impl<T> Default for InMemoryKeyedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> KeyedStore<T> for InMemoryKeyedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn save(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if self.save_should_fail() || self.failing_keys.read().await.contains(key) {
            return Err(self.injected_failure());
        }
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn find(&self, key: &str) -> Option<T> {
        self.entries.read().await.get(key).cloned()
    }

    async fn find_all(&self) -> Vec<T> {
        self.entries.read().await.values().cloned().collect()
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(self.injected_failure());
        }
        self.entries.write().await.remove(key);
        Ok(())
    }
}
