use serde::{Deserialize, Serialize};
use strum::Display;

/// Screen the workflow is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStep {
    /// Describe the scenario, pick category, persona and material
    #[default]
    ScenarioInput,
    /// Choose and edit a draft, set up the visual
    ConceptReview,
    /// Finished copy (and image)
    FinalGeneration,
    /// Browse and curate the library; entered from and returns to `ScenarioInput`
    Library,
}

/// Which collaborator a loading phase waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoadingKind {
    Concept,
    Image,
}

impl LoadingKind {
    /// Status lines rotated while waiting.
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Self::Concept => &[
                "Reading the scenario",
                "Finding the persona's voice",
                "Weaving in the selling points",
                "Polishing the drafts",
            ],
            Self::Image => &[
                "Composing the frame",
                "Setting the light",
                "Placing the product",
                "Developing the image",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wire_names() {
        assert_eq!(WorkflowStep::default(), WorkflowStep::ScenarioInput);
        assert_eq!(WorkflowStep::ConceptReview.to_string(), "CONCEPT_REVIEW");
        assert_eq!(
            serde_json::to_string(&WorkflowStep::FinalGeneration).unwrap(),
            "\"FINAL_GENERATION\""
        );
    }

    #[test]
    fn test_message_lists_are_step_specific() {
        assert!(!LoadingKind::Concept.messages().is_empty());
        assert_ne!(LoadingKind::Concept.messages(), LoadingKind::Image.messages());
    }
}
