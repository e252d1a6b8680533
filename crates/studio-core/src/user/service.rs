//! Identity service for login state.
//!
//! The current identity lives under a single unprefixed key so it can be read
//! before any namespace is known.

use super::model::Identity;
use crate::error::Result;

/// Unprefixed storage key holding the current identity.
pub const IDENTITY_KEY: &str = "studio_identity";

/// Service managing who is logged in.
///
/// Implementations decide where the identity is remembered; the rest of the
/// application only needs login, logout and a lookup of the current identity.
pub trait IdentityService: Send + Sync {
    /// Returns the remembered identity, if any.
    fn current(&self) -> Result<Option<Identity>>;

    /// Records a login for `display_name` and returns the new identity.
    fn login(&self, display_name: &str) -> Result<Identity>;

    /// Forgets the current identity. Namespaced data is kept.
    fn logout(&self) -> Result<()>;
}
