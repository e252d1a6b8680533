//! Raw key/value persistence trait.

use crate::error::Result;

/// A durable string key/value store.
///
/// This trait decouples the namespaced store from the storage mechanism
/// (memory, files on disk, a browser-like local storage bridge).
///
/// # Implementation Notes
///
/// - Each `set` must replace the whole value or leave the old one untouched.
/// - A store that is out of space must return
///   [`StudioError::StorageQuotaExceeded`](crate::error::StudioError::StorageQuotaExceeded)
///   so callers can recover locally.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
