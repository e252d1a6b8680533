//! In-memory key/value store, used for the guest session and in tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::key_value::KeyValueStore;
use crate::error::{Result, StudioError};

/// A [`KeyValueStore`] kept in process memory.
///
/// With a quota, the summed byte length of all keys and values may not exceed
/// it; a write that would cross it fails with `StorageQuotaExceeded` and leaves
/// the previous value in place.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn usage(&self) -> usize {
        self.values()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.values().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values();
        if let Some(quota) = self.quota_bytes {
            let current: usize = values.iter().map(|(k, v)| k.len() + v.len()).sum();
            let replaced = values.get(key).map_or(0, |old| key.len() + old.len());
            if current - replaced + key.len() + value.len() > quota {
                return Err(StudioError::quota_exceeded(key));
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values().remove(key);
        Ok(())
    }
}
