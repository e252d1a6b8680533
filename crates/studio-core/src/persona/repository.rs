//! Persona repository trait.
//!
//! Defines the interface for persona persistence operations.

use super::model::Persona;
use crate::error::Result;

/// An abstract repository for user-authored personas.
///
/// Built-ins are never stored; implementations only ever see user personas.
/// The whole list is read and written as one snapshot.
pub trait PersonaRepository: Send + Sync {
    /// Retrieves all saved personas in stored order.
    fn get_all(&self) -> Result<Vec<Persona>>;

    /// Saves all personas, replacing the stored list.
    ///
    /// A write dropped for lack of space is not an error.
    fn save_all(&self, personas: &[Persona]) -> Result<()>;
}
