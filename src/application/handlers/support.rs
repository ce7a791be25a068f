//! Helpers shared by the workflow handlers.
//!
//! Saga steps never write a copy of a record taken before the workflow
//! started. Each step re-reads the record, applies its own edit and saves
//! the result, so concurrent changes to other fields survive.

use crate::domain::foundation::DomainError;
use crate::ports::{KeyedStore, Notification};

/// Load `key` or fail with `NotFound` naming `entity`.
pub(crate) async fn require<T>(
    store: &dyn KeyedStore<T>,
    entity: &str,
    key: &str,
) -> Result<T, DomainError>
where
    T: Clone + Send + Sync + 'static,
{
    store
        .find(key)
        .await
        .ok_or_else(|| DomainError::not_found(entity, key))
}

/// Re-read `key`, apply `change`, and save when it reports a modification.
///
/// # Errors
///
/// - `NotFound` if the record is no longer stored
/// - whatever `change` returns
/// - `PersistenceFailed` if the save fails
pub(crate) async fn edit_record<T, F>(
    store: &dyn KeyedStore<T>,
    entity: &str,
    key: &str,
    change: F,
) -> Result<bool, DomainError>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce(&mut T) -> Result<bool, DomainError> + Send,
{
    let mut record = require(store, entity, key).await?;
    if !change(&mut record)? {
        return Ok(false);
    }
    store.save(key, &record).await?;
    Ok(true)
}

/// Like [`edit_record`], but a record that is gone is left alone.
pub(crate) async fn edit_if_present<T, F>(
    store: &dyn KeyedStore<T>,
    key: &str,
    change: F,
) -> Result<bool, DomainError>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce(&mut T) -> Result<bool, DomainError> + Send,
{
    let Some(mut record) = store.find(key).await else {
        return Ok(false);
    };
    if !change(&mut record)? {
        return Ok(false);
    }
    store.save(key, &record).await?;
    Ok(true)
}

/// Apply `change` to every stored record in `keys`, in order. If one
/// fails, `undo` is applied to the records already changed, newest first,
/// and the original error is returned.
pub(crate) async fn edit_each<T, F, U>(
    store: &dyn KeyedStore<T>,
    keys: &[String],
    change: F,
    undo: U,
) -> Result<(), DomainError>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&mut T) -> Result<bool, DomainError> + Sync,
    U: Fn(&mut T) -> Result<bool, DomainError> + Sync,
{
    for (done, key) in keys.iter().enumerate() {
        if let Err(e) = edit_if_present(store, key, &change).await {
            for applied in keys[..done].iter().rev() {
                if let Err(undo_err) = edit_if_present(store, applied, &undo).await {
                    tracing::error!(key = %applied, error = %undo_err, "Could not undo partial edit");
                }
            }
            return Err(e);
        }
    }
    Ok(())
}

/// Apply `undo` to every stored record in `keys`, newest first. All are
/// attempted; the first error is returned.
pub(crate) async fn revert_each<T, U>(
    store: &dyn KeyedStore<T>,
    keys: &[String],
    undo: U,
) -> Result<(), DomainError>
where
    T: Clone + Send + Sync + 'static,
    U: Fn(&mut T) -> Result<bool, DomainError> + Sync,
{
    let mut first_error = None;
    for key in keys.iter().rev() {
        if let Err(e) = edit_if_present(store, key, &undo).await {
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Build a notification addressed to one participant.
pub(crate) fn notice(
    email: &str,
    name: &str,
    subject: impl Into<String>,
    body: impl Into<String>,
) -> Notification {
    Notification::new(email, name, subject, body)
}
