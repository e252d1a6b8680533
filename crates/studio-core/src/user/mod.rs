//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: Identity domain model
//! - `namespace`: Storage namespace token derivation
//! - `service`: Identity service trait
//!
//! # Usage
//!
//! ```ignore
//! use studio_core::user::{Identity, IdentityService, NamespaceToken};
//! ```

mod model;
mod namespace;
mod service;

// Re-export public API
pub use model::Identity;
pub use namespace::{GUEST_TOKEN, NamespaceToken, TOKEN_LENGTH, rolling_hash_token};
pub use service::{IDENTITY_KEY, IdentityService};
