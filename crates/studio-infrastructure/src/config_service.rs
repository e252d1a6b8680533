//! Configuration service implementation.
//!
//! Loads the studio configuration from `config.toml`, creating the file with
//! defaults on first use, and applies environment overrides.

use crate::paths::StudioPaths;
use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use studio_core::config::StudioConfig;
use studio_core::error::Result;

/// Environment variable that overrides `gemini.api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration service that loads and caches the studio configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<StudioConfig>>,
    /// Cached configuration; loaded lazily on first access.
    config: Arc<RwLock<Option<StudioConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_paths(paths: &StudioPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    /// Gets the configuration, loading it from file if not cached.
    ///
    /// A missing file is created with defaults. The `GEMINI_API_KEY`
    /// environment variable, when set and non-blank, replaces the file's key.
    pub fn get_config(&self) -> Result<StudioConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = apply_api_key_override(self.load_or_create()?, std::env::var(API_KEY_ENV).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_or_create(&self) -> Result<StudioConfig> {
        match self.file.load()? {
            Some(config) => {
                tracing::debug!(path = %self.file.path().display(), "Loaded config");
                Ok(config)
            }
            None => {
                let config = StudioConfig::default();
                self.file.save(&config)?;
                tracing::info!(path = %self.file.path().display(), "Created default config");
                Ok(config)
            }
        }
    }
}

/// Replaces the configured API key with `env_value` when it is non-blank.
pub fn apply_api_key_override(mut config: StudioConfig, env_value: Option<String>) -> StudioConfig {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        config.gemini.api_key = key.trim().to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StudioPaths::new(Some(temp_dir.path().to_path_buf()));
        let service = ConfigService::from_paths(&paths).unwrap();

        let config = service.file.load().unwrap();
        assert!(config.is_none());

        let loaded = service.load_or_create().unwrap();
        assert_eq!(loaded.capacity.library, 30);
        assert!(paths.config_file().unwrap().exists());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[capacity]\nlibrary = 5\n\n[loading]\nconcept_min_wait_ms = 10\n").unwrap();

        let config = ConfigService::new(path).load_or_create().unwrap();
        assert_eq!(config.capacity.library, 5);
        assert_eq!(config.capacity.product_photos, 12);
        assert_eq!(config.loading.concept_min_wait_ms, 10);
        assert_eq!(config.loading.image_min_wait_ms, 4_000);
    }

    #[test]
    fn test_api_key_override() {
        let mut config = StudioConfig::default();
        config.gemini.api_key = "from-file".to_string();

        let kept = apply_api_key_override(config.clone(), Some("  ".to_string()));
        assert_eq!(kept.gemini.api_key, "from-file");

        let replaced = apply_api_key_override(config, Some("from-env".to_string()));
        assert_eq!(replaced.gemini.api_key, "from-env");
    }
}
