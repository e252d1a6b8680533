//! Persona registry: built-ins plus the user's saved personas, and which one is active.

use std::sync::Arc;
use uuid::Uuid;

use super::model::{Persona, PersonaSource};
use super::preset::built_in_personas;
use super::repository::PersonaRepository;
use crate::error::{Result, StudioError};

/// Result of deleting a saved persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDeletion {
    /// The persona was found and removed
    pub removed: bool,
    /// The deleted persona was active; the first built-in is active now
    pub active_reset: bool,
}

/// CRUD over persona profiles plus the active selection.
pub struct PersonaRegistry {
    repository: Arc<dyn PersonaRepository>,
    built_ins: Vec<Persona>,
    saved: Vec<Persona>,
    active: Persona,
}

impl PersonaRegistry {
    /// Loads saved personas and picks the initial active persona: the first
    /// saved one if any, otherwise the first built-in.
    pub fn load(repository: Arc<dyn PersonaRepository>) -> Result<Self> {
        let built_ins = built_in_personas();
        let saved = repository.get_all()?;
        let active = saved
            .first()
            .or_else(|| built_ins.first())
            .cloned()
            .ok_or_else(|| StudioError::internal("No built-in personas defined"))?;

        Ok(Self {
            repository,
            built_ins,
            saved,
            active,
        })
    }

    /// The fixed built-in personas, in picker order.
    pub fn list_built_ins(&self) -> &[Persona] {
        &self.built_ins
    }

    /// The user's saved personas, most recently created first.
    pub fn list_saved(&self) -> &[Persona] {
        &self.saved
    }

    /// Saved personas followed by built-ins, the picker order.
    pub fn list_all(&self) -> Vec<Persona> {
        self.saved.iter().chain(&self.built_ins).cloned().collect()
    }

    pub fn find(&self, id: &str) -> Option<&Persona> {
        self.saved.iter().find(|p| p.id.as_deref() == Some(id))
    }

    pub fn active(&self) -> &Persona {
        &self.active
    }

    /// Makes `persona` the active one. It does not have to be saved.
    pub fn select(&mut self, persona: Persona) {
        tracing::debug!(name = persona.display_name(), "Persona selected");
        self.active = persona;
    }

    /// Whether `candidate` is the active persona (see [`Persona::is_active`]).
    pub fn is_selected(&self, candidate: &Persona) -> bool {
        Persona::is_active(candidate, &self.active)
    }

    /// Saves a user persona and makes it active.
    ///
    /// Without an id a fresh one is generated and the persona is prepended;
    /// with an id the stored entry with that id is replaced in place (or
    /// prepended if it is gone). The result is always user-authored.
    pub fn save(&mut self, persona: Persona) -> Result<Persona> {
        Self::validate(&persona)?;

        let mut persona = persona;
        persona.name = persona.name.map(|n| n.trim().to_string());
        persona.source = PersonaSource::User;
        persona.icon = None;
        let id = persona
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();

        match self
            .saved
            .iter()
            .position(|p| p.id.as_deref() == Some(id.as_str()))
        {
            Some(index) => self.saved[index] = persona.clone(),
            None => self.saved.insert(0, persona.clone()),
        }

        self.repository.save_all(&self.saved)?;
        tracing::info!(persona_id = %id, "Persona saved");

        self.active = persona.clone();
        Ok(persona)
    }

    /// Deletes the saved persona with `id`.
    ///
    /// If it was active, the first built-in becomes active.
    pub fn delete(&mut self, id: &str) -> Result<PersonaDeletion> {
        let before = self.saved.len();
        self.saved.retain(|p| p.id.as_deref() != Some(id));
        let removed = self.saved.len() != before;
        if removed {
            self.repository.save_all(&self.saved)?;
            tracing::info!(persona_id = %id, "Persona deleted");
        }

        let active_reset = self.active.id.as_deref() == Some(id);
        if active_reset {
            self.active = self.built_ins[0].clone();
        }

        Ok(PersonaDeletion {
            removed,
            active_reset,
        })
    }

    fn validate(persona: &Persona) -> Result<()> {
        if persona.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(StudioError::validation("Persona name is required"));
        }
        if persona.identity.trim().is_empty() {
            return Err(StudioError::validation("Persona identity is required"));
        }
        if persona.background.trim().is_empty() {
            return Err(StudioError::validation("Persona background is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mock PersonaRepository for testing
    #[derive(Default)]
    struct MockPersonaRepository {
        personas: Mutex<Vec<Persona>>,
        writes: Mutex<usize>,
    }

    impl PersonaRepository for MockPersonaRepository {
        fn get_all(&self) -> Result<Vec<Persona>> {
            Ok(self.personas.lock().unwrap().clone())
        }

        fn save_all(&self, personas: &[Persona]) -> Result<()> {
            *self.personas.lock().unwrap() = personas.to_vec();
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn registry() -> (PersonaRegistry, Arc<MockPersonaRepository>) {
        let repo = Arc::new(MockPersonaRepository::default());
        let registry = PersonaRegistry::load(repo.clone()).unwrap();
        (registry, repo)
    }

    #[test]
    fn test_initial_active_is_first_built_in() {
        let (registry, _) = registry();
        assert_eq!(registry.active(), &registry.list_built_ins()[0]);
    }

    #[test]
    fn test_initial_active_prefers_saved() {
        let repo = Arc::new(MockPersonaRepository::default());
        let mut saved = Persona::draft("Mine", "me", vec![], "bg");
        saved.id = Some("p9".to_string());
        repo.save_all(&[saved.clone()]).unwrap();

        let registry = PersonaRegistry::load(repo).unwrap();
        assert_eq!(registry.active(), &saved);
    }

    #[test]
    fn test_save_twice_with_same_id_keeps_one_entry() {
        let (mut registry, repo) = registry();

        let first = registry
            .save(Persona::draft("Autumn", "A", vec!["x".to_string()], "b"))
            .unwrap();
        let id = first.id.clone().unwrap();

        let mut edited = first.clone();
        edited.identity = "A2".to_string();
        let second = registry.save(edited).unwrap();

        assert_eq!(second.id.as_deref(), Some(id.as_str()));
        assert_eq!(registry.list_saved().len(), 1);
        assert_eq!(registry.list_saved()[0].identity, "A2");
        assert_eq!(repo.get_all().unwrap()[0].identity, "A2");
    }

    #[test]
    fn test_save_prepends_new_personas_and_activates() {
        let (mut registry, _) = registry();
        registry.save(Persona::draft("One", "i", vec![], "b")).unwrap();
        let two = registry.save(Persona::draft(" Two ", "i", vec![], "b")).unwrap();

        assert_eq!(two.name.as_deref(), Some("Two"));
        assert_eq!(registry.list_saved()[0], two);
        assert_eq!(registry.active(), &two);
        assert_eq!(registry.list_all().len(), 2 + registry.list_built_ins().len());
    }

    #[test]
    fn test_saving_a_built_in_template_creates_user_copy() {
        let (mut registry, _) = registry();
        let template = registry.list_built_ins()[1].clone();

        let copy = registry.save(template).unwrap();
        assert!(copy.id.is_some());
        assert!(!copy.is_built_in());
        assert!(copy.icon.is_none());
    }

    #[test]
    fn test_validation_blocks_save() {
        let (mut registry, repo) = registry();
        for invalid in [
            Persona::draft("  ", "i", vec![], "b"),
            Persona::draft("n", " ", vec![], "b"),
            Persona::draft("n", "i", vec![], "\n"),
        ] {
            let err = registry.save(invalid).unwrap_err();
            assert!(err.is_validation());
        }
        assert!(registry.list_saved().is_empty());
        assert_eq!(*repo.writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_delete_active_falls_back_to_first_built_in() {
        let (mut registry, _) = registry();
        let saved = registry.save(Persona::draft("Mine", "i", vec![], "b")).unwrap();
        let id = saved.id.unwrap();

        let deletion = registry.delete(&id).unwrap();
        assert!(deletion.removed);
        assert!(deletion.active_reset);
        assert_eq!(registry.active(), &registry.list_built_ins()[0]);
        assert!(registry.find(&id).is_none());
    }

    #[test]
    fn test_delete_inactive_keeps_selection() {
        let (mut registry, _) = registry();
        let keep = registry.save(Persona::draft("Keep", "i", vec![], "b")).unwrap();
        let drop = registry.save(Persona::draft("Drop", "i", vec![], "b")).unwrap();
        registry.select(keep.clone());

        let deletion = registry.delete(drop.id.as_deref().unwrap()).unwrap();
        assert!(deletion.removed);
        assert!(!deletion.active_reset);
        assert_eq!(registry.active(), &keep);
    }

    #[test]
    fn test_is_selected_distinguishes_builtin_from_same_named_custom() {
        let (mut registry, _) = registry();
        let builtin = registry.list_built_ins()[0].clone();
        let mut custom = builtin.clone();
        custom.source = PersonaSource::User;
        let custom = registry.save(custom).unwrap();

        assert!(registry.is_selected(&custom));
        assert!(!registry.is_selected(&builtin));
    }
}
