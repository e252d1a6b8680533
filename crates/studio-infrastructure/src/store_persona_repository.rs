//! Persona repository over the namespaced store.

use studio_core::error::Result;
use studio_core::persona::{Persona, PersonaRepository};
use studio_core::storage::{NamespacedStore, WriteStatus};

/// Key of the custom persona list inside a namespace.
pub const PERSONAS_KEY: &str = "personas";

/// Stores the user's personas as one JSON array per namespace.
pub struct StorePersonaRepository {
    store: NamespacedStore,
}

impl StorePersonaRepository {
    pub fn new(store: NamespacedStore) -> Self {
        Self { store }
    }
}

impl PersonaRepository for StorePersonaRepository {
    fn get_all(&self) -> Result<Vec<Persona>> {
        match self.store.read_json::<Vec<Persona>>(PERSONAS_KEY) {
            Ok(personas) => Ok(personas.unwrap_or_default()),
            Err(e) if e.is_serialization() => {
                tracing::warn!(error = %e, "Discarding unreadable persona list");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save_all(&self, personas: &[Persona]) -> Result<()> {
        if self.store.write_json(PERSONAS_KEY, personas)? == WriteStatus::Dropped {
            tracing::warn!(count = personas.len(), "Persona list kept in memory only");
        }
        Ok(())
    }
}
