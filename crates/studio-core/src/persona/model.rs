//! Persona domain model.
//!
//! A persona is the voice the copy is written in: who the author is, a few
//! character traits and a short background story.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Represents the source of a persona (system-provided or user-created).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersonaSource {
    /// Built-in personas shipped with the studio; never persisted, never edited
    System,
    /// User-authored personas
    #[default]
    User,
}

/// A persona profile.
///
/// Built-ins carry no `id` and are told apart by `name`. A user persona gets an
/// id on its first save and keeps it for every later save.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Stable identifier, assigned on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Template name shown in the picker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Core identity, e.g. "female founder with a design background"
    pub identity: String,
    /// Character traits, in display order
    #[serde(default)]
    pub traits: Vec<String>,
    /// Background story
    pub background: String,
    /// Source of the persona (System or User)
    #[serde(default)]
    pub source: PersonaSource,
    /// Picker icon for built-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Persona {
    /// A new, unsaved user persona.
    pub fn draft(
        name: impl Into<String>,
        identity: impl Into<String>,
        traits: Vec<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            identity: identity.into(),
            traits,
            background: background.into(),
            source: PersonaSource::User,
            icon: None,
        }
    }

    /// An empty user persona, the starting point of the "define" form.
    pub fn blank() -> Self {
        Self::draft("", "", Vec::new(), "")
    }

    pub fn is_built_in(&self) -> bool {
        self.source == PersonaSource::System
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identity)
    }

    /// Whether `candidate` is the persona `current` refers to.
    ///
    /// Entries with an id compare by id. Entries without one (built-ins)
    /// compare by name, and only against a `current` that has no id either, so
    /// a saved persona that happens to share a built-in's name never lights up
    /// the built-in.
    pub fn is_active(candidate: &Persona, current: &Persona) -> bool {
        match &candidate.id {
            Some(id) => current.id.as_ref() == Some(id),
            None => current.id.is_none() && current.name == candidate.name,
        }
    }
}

/// Splits free text into traits on `、 , ， ; ；`, dropping blank pieces.
pub fn parse_traits(text: &str) -> Vec<String> {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[、,，;；]").expect("static trait separator regex"));
    separators
        .split(text)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_in(name: &str) -> Persona {
        Persona {
            source: PersonaSource::System,
            ..Persona::draft(name, "identity", vec![], "background")
        }
    }

    #[test]
    fn test_built_in_active_only_when_current_has_no_id() {
        let candidate = built_in("Art Curator");

        let same_builtin = built_in("Art Curator");
        assert!(Persona::is_active(&candidate, &same_builtin));

        let mut saved_same_name = Persona::draft("Art Curator", "me", vec![], "bg");
        saved_same_name.id = Some("p1".to_string());
        assert!(!Persona::is_active(&candidate, &saved_same_name));

        let other_builtin = built_in("Easygoing Host");
        assert!(!Persona::is_active(&candidate, &other_builtin));
    }

    #[test]
    fn test_saved_persona_compares_by_id() {
        let mut saved = Persona::draft("Autumn", "me", vec![], "bg");
        saved.id = Some("p1".to_string());

        let mut renamed = saved.clone();
        renamed.name = Some("Winter".to_string());
        assert!(Persona::is_active(&saved, &renamed));

        let unsaved_same_name = Persona::draft("Autumn", "me", vec![], "bg");
        assert!(!Persona::is_active(&saved, &unsaved_same_name));
    }

    #[test]
    fn test_parse_traits_mixed_separators() {
        assert_eq!(
            parse_traits("warm、 direct,curious，;  ；patient"),
            vec!["warm", "direct", "curious", "patient"]
        );
        assert!(parse_traits(" , ").is_empty());
    }

    #[test]
    fn test_json_omits_missing_id() {
        let json = serde_json::to_value(Persona::blank()).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["source"], "User");
    }
}
