//! Persona domain module.
//!
//! This module contains all persona-related domain models, the repository
//! interface, the built-in presets and the registry that ties them together.
//!
//! # Module Structure
//!
//! - `model`: Core persona domain model (`Persona`, `PersonaSource`)
//! - `repository`: Repository trait for persona persistence
//! - `preset`: Built-in personas
//! - `registry`: CRUD and active-persona tracking
//!
//! # Usage
//!
//! ```ignore
//! use studio_core::persona::{Persona, PersonaRegistry, PersonaRepository};
//! ```

mod model;
mod preset;
mod registry;
mod repository;

// Re-export public API
pub use model::{Persona, PersonaSource, parse_traits};
pub use preset::built_in_personas;
pub use registry::{PersonaDeletion, PersonaRegistry};
pub use repository::PersonaRepository;
