//! Error types for the Studio application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Studio application.
///
/// Provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StudioError {
    /// Incomplete or malformed user input (blocks the operation locally)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backing store refused a write because it is full
    #[error("Storage quota exceeded while writing '{key}'")]
    StorageQuotaExceeded { key: String },

    /// A generative collaborator failed or returned unusable data
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A selection set references an id that is missing from its collection.
    ///
    /// Deletion prunes selections in the same step, so observing this is a defect.
    #[error("Selection '{selection}' references missing id '{id}'")]
    DanglingSelection { selection: &'static str, id: String },

    /// A workflow operation was requested from a step that does not allow it
    #[error("Cannot {action} while in step {step}")]
    InvalidTransition { action: &'static str, step: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudioError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a StorageQuotaExceeded error for the given key
    pub fn quota_exceeded(key: impl Into<String>) -> Self {
        Self::StorageQuotaExceeded { key: key.into() }
    }

    /// Creates a GenerationFailed error
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// Creates a DanglingSelection error
    pub fn dangling_selection(selection: &'static str, id: impl Into<String>) -> Self {
        Self::DanglingSelection {
            selection,
            id: id.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(action: &'static str, step: impl ToString) -> Self {
        Self::InvalidTransition {
            action,
            step: step.to_string(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a StorageQuotaExceeded error
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::StorageQuotaExceeded { .. })
    }

    /// Check if this is a GenerationFailed error
    pub fn is_generation_failed(&self) -> bool {
        matches!(self, Self::GenerationFailed(_))
    }

    /// Check if this is a DanglingSelection error
    pub fn is_dangling_selection(&self) -> bool {
        matches!(self, Self::DanglingSelection { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Returns the message shown to the user for failures that the user can act on.
    ///
    /// Storage and generation failures are non-fatal and get a short, retry-oriented
    /// message; everything else falls back to the `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            Self::StorageQuotaExceeded { .. } => {
                "Local storage is full. The latest change was kept for this session only."
                    .to_string()
            }
            Self::GenerationFailed(_) => "Generation failed, please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StudioError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StudioError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (infrastructure glue converts at the boundary)
impl From<anyhow::Error> for StudioError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, StudioError>`.
pub type Result<T> = std::result::Result<T, StudioError>;
