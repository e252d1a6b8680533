//! Application layer for the studio.
//!
//! Wires the domain crate to its storage and Gemini collaborators and exposes
//! the per-identity [`StudioSession`] that front ends drive.

pub mod app;
pub mod logging;
pub mod session;

pub use app::StudioApp;
pub use logging::{LoggingGuard, init_logging};
pub use session::StudioSession;
