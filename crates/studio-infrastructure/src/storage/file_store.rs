//! File-backed key/value store: one document per key under a directory.

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use studio_core::error::{Result, StudioError};
use studio_core::storage::KeyValueStore;

use super::atomic_file::write_atomic;

const EXTENSION: &str = "json";

/// A [`KeyValueStore`] persisted as files.
///
/// Keys may contain `+`, `/` and `=` (namespace tokens are base64), so file
/// names are the URL-safe base64 of the key. Writes go through
/// [`write_atomic`]. With a quota, the total size of all documents may not
/// exceed it.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Opens (and creates if needed) a store in `dir`.
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: Option<u64>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), ?quota_bytes, "Opened file store");
        Ok(Self {
            dir,
            quota_bytes,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key.as_bytes()), EXTENSION))
    }

    /// Total size of stored documents, not counting `skip`.
    fn usage_excluding(&self, skip: &Path) -> anyhow::Result<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path == skip || path.extension().is_none_or(|ext| ext != EXTENSION) {
                continue;
            }
            total += fs::metadata(&path)
                .with_context(|| format!("Failed to stat {}", path.display()))?
                .len();
        }
        Ok(total)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let path = self.path_for(key);

        if let Some(quota) = self.quota_bytes {
            let used = self.usage_excluding(&path)?;
            if used + value.len() as u64 > quota {
                return Err(StudioError::quota_exceeded(key));
            }
        }

        write_atomic(&path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
