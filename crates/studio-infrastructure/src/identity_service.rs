//! Identity service backed by a key/value store.

use chrono::Utc;
use std::sync::Arc;
use studio_core::error::{Result, StudioError};
use studio_core::storage::KeyValueStore;
use studio_core::user::{IDENTITY_KEY, Identity, IdentityService};

/// Remembers the logged-in identity under the unprefixed identity key.
pub struct StoredIdentityService {
    backend: Arc<dyn KeyValueStore>,
}

impl StoredIdentityService {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }
}

impl IdentityService for StoredIdentityService {
    fn current(&self) -> Result<Option<Identity>> {
        let Some(raw) = self.backend.get(IDENTITY_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable identity");
                Ok(None)
            }
        }
    }

    fn login(&self, display_name: &str) -> Result<Identity> {
        let identity = Identity::login(display_name, Utc::now())?;
        let raw = serde_json::to_string(&identity)?;
        match self.backend.set(IDENTITY_KEY, &raw) {
            Ok(()) => {}
            // The session still starts; the login is just not remembered.
            Err(StudioError::StorageQuotaExceeded { .. }) => {
                tracing::warn!("Storage full, login not remembered");
            }
            Err(e) => return Err(e),
        }
        Ok(identity)
    }

    fn logout(&self) -> Result<()> {
        self.backend.remove(IDENTITY_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use tempfile::TempDir;

    #[test]
    fn test_login_is_remembered_across_service_instances() {
        let temp_dir = TempDir::new().unwrap();
        let backend: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::open(temp_dir.path(), None).unwrap());

        let first = StoredIdentityService::new(backend.clone());
        let identity = first.login("张伟").unwrap();
        assert_eq!(identity.id, "5byg5lyf");

        let second = StoredIdentityService::new(backend);
        assert_eq!(second.current().unwrap(), Some(identity));
    }

    #[test]
    fn test_logout_forgets_identity() {
        let service = StoredIdentityService::new(Arc::new(MemoryKeyValueStore::new()));
        service.login("Mei").unwrap();
        service.logout().unwrap();
        assert!(service.current().unwrap().is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        let service = StoredIdentityService::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(service.login("  ").unwrap_err().is_validation());
    }

    #[test]
    fn test_full_store_still_logs_in() {
        let service = StoredIdentityService::new(Arc::new(MemoryKeyValueStore::with_quota(4)));
        let identity = service.login("Mei").unwrap();
        assert_eq!(identity.display_name, "Mei");
        assert!(service.current().unwrap().is_none());
    }
}
