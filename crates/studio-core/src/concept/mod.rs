//! Concept and draft management.
//!
//! # Module Structure
//!
//! - `model`: `Draft`, `Concept` and `FinalResult`
//! - `settings`: image quality tier, aspect ratio and resolution
//! - `editor`: the selected draft, its edits and image request packaging

mod editor;
mod model;
mod settings;

pub use editor::ConceptEditor;
pub use model::{Concept, Draft, FinalResult};
pub use settings::{AspectRatio, ImageResolution, ImageSettings, QualityTier};
