//! Built-in persona presets.
//!
//! Provides the fixed personas available to every user. They carry no id and
//! are never written to storage.

use super::model::{Persona, PersonaSource};

/// Returns the built-in personas in picker order.
///
/// - **Art Curator**: design-trained founder, detail-obsessed
/// - **Scholarly Merchant**: culture-minded entrepreneur, ritual and restraint
/// - **Easygoing Host**: community regular, humour and home cooking
pub fn built_in_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: None,
            name: Some("Art Curator".to_string()),
            identity: "Woman with an art and design background who founded a rice wine brand".to_string(),
            traits: vec![
                "Aesthetically sensitive".to_string(),
                "Cultured".to_string(),
                "Obsessed with detail".to_string(),
            ],
            background: "Spent years as a graphic designer in Shanghai before moving home to Shaoxing to give rice wine a modern look.".to_string(),
            source: PersonaSource::System,
            icon: Some("fa-palette".to_string()),
        },
        Persona {
            id: None,
            name: Some("Scholarly Merchant".to_string()),
            identity: "Man who moved into the trade out of love for traditional culture".to_string(),
            traits: vec![
                "Steady".to_string(),
                "Well read".to_string(),
                "Values ritual".to_string(),
            ],
            background: "Half a lifetime in business, collects old books, and believes rice wine is the poetry in Chinese blood.".to_string(),
            source: PersonaSource::System,
            icon: Some("fa-book".to_string()),
        },
        Persona {
            id: None,
            name: Some("Easygoing Host".to_string()),
            identity: "Community regular of any gender who loves a slow life".to_string(),
            traits: vec![
                "Relaxed".to_string(),
                "Funny".to_string(),
                "Down to earth".to_string(),
            ],
            background: "Loves tinkering with food, keeps a small cellar at home, and thinks good wine is the shortest way between two people.".to_string(),
            source: PersonaSource::System,
            icon: Some("fa-house-chimney-window".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_ins_have_no_id_and_unique_names() {
        let presets = built_in_personas();
        assert_eq!(presets.len(), 3);
        assert!(presets.iter().all(|p| p.id.is_none() && p.is_built_in()));

        let names: std::collections::HashSet<_> = presets.iter().map(|p| p.name.clone()).collect();
        assert_eq!(names.len(), presets.len());
    }
}
