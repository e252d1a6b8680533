//! Unified path management for studio files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/studio/            # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/studio/       # Data directory
//! ├── store/                   # One JSON document per storage key
//! └── logs/                    # Daily rolling logs
//!     └── studio.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "studio";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for studio_core::StudioError {
    fn from(e: PathError) -> Self {
        studio_core::StudioError::config(e.to_string())
    }
}

/// Resolves where the studio keeps its files.
///
/// With a base directory (tests, portable installs) everything lives below it;
/// otherwise the platform config and data directories are used.
#[derive(Debug, Clone, Default)]
pub struct StudioPaths {
    base: Option<PathBuf>,
}

impl StudioPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory of the file-backed key/value store.
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }

    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let paths = StudioPaths::new(Some(PathBuf::from("/tmp/studio-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/studio-test/config/config.toml")
        );
        assert_eq!(
            paths.store_dir().unwrap(),
            PathBuf::from("/tmp/studio-test/data/store")
        );
    }
}
