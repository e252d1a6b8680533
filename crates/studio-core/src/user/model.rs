//! Identity domain model.
//!
//! The login is a non-verified identity claim: anyone typing the same display
//! name gets the same identity and the same storage partition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::namespace::NamespaceToken;
use crate::error::{Result, StudioError};

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Deterministic id derived from the display name (the namespace token)
    pub id: String,
    /// Name typed at login, trimmed
    pub display_name: String,
    /// When this identity last logged in
    pub last_login_timestamp: DateTime<Utc>,
}

impl Identity {
    /// Creates an identity for a login attempt.
    ///
    /// Fails with a validation error when the name is blank.
    pub fn login(display_name: &str, now: DateTime<Utc>) -> Result<Self> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(StudioError::validation("Display name is required"));
        }
        Ok(Self {
            id: NamespaceToken::derive(display_name).to_string(),
            display_name: display_name.to_string(),
            last_login_timestamp: now,
        })
    }

    /// The storage namespace for this identity.
    pub fn namespace(&self) -> NamespaceToken {
        NamespaceToken::derive(&self.display_name)
    }
}
