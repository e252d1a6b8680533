//! Identity-scoped view over a [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::key_value::KeyValueStore;
use super::notice::{NoticeBoard, StudioNotice};
use crate::error::{Result, StudioError};
use crate::user::{Identity, NamespaceToken};

/// Prefix shared by every key the studio writes.
pub const KEY_PREFIX: &str = "studio";

/// Outcome of a write that did not fail hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The value reached the backing store
    Stored,
    /// The store was full; the value was dropped and a notice raised
    Dropped,
}

/// Key/value access confined to one namespace token.
///
/// Two stores built for different identities never see each other's keys
/// (unless their tokens collide, see [`NamespaceToken`]).
#[derive(Clone)]
pub struct NamespacedStore {
    backend: Arc<dyn KeyValueStore>,
    namespace: NamespaceToken,
    notices: NoticeBoard,
}

impl NamespacedStore {
    pub fn new(
        backend: Arc<dyn KeyValueStore>,
        namespace: NamespaceToken,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            backend,
            namespace,
            notices,
        }
    }

    /// Store scoped to `identity`, or to the guest partition when `None`.
    pub fn for_identity(
        backend: Arc<dyn KeyValueStore>,
        identity: Option<&Identity>,
        notices: NoticeBoard,
    ) -> Self {
        let namespace = identity
            .map(Identity::namespace)
            .unwrap_or_else(NamespaceToken::guest);
        Self::new(backend, namespace, notices)
    }

    pub fn namespace(&self) -> &NamespaceToken {
        &self.namespace
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// The physical key for a logical key in this namespace.
    pub fn scoped_key(&self, key: &str) -> String {
        format!("{}_{}_{}", KEY_PREFIX, self.namespace, key)
    }

    pub fn read(&self, key: &str) -> Result<Option<String>> {
        let scoped = self.scoped_key(key);
        let value = self.backend.get(&scoped)?;
        tracing::debug!(key = %scoped, found = value.is_some(), "Namespaced read");
        Ok(value)
    }

    /// Writes `value` under `key`.
    ///
    /// A full store is not an error: the write is dropped, one
    /// [`StudioNotice::StorageFull`] is raised and `WriteStatus::Dropped` is
    /// returned. Any other backend failure propagates.
    pub fn write(&self, key: &str, value: &str) -> Result<WriteStatus> {
        let scoped = self.scoped_key(key);
        match self.backend.set(&scoped, value) {
            Ok(()) => {
                tracing::debug!(key = %scoped, bytes = value.len(), "Namespaced write");
                Ok(WriteStatus::Stored)
            }
            Err(StudioError::StorageQuotaExceeded { .. }) => {
                tracing::warn!(key = %scoped, bytes = value.len(), "Storage full, write dropped");
                self.notices.push(StudioNotice::StorageFull {
                    key: key.to_string(),
                });
                Ok(WriteStatus::Dropped)
            }
            Err(e) => Err(e),
        }
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(&self.scoped_key(key))
    }

    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<WriteStatus> {
        let raw = serde_json::to_string(value)?;
        self.write(key, &raw)
    }
}
