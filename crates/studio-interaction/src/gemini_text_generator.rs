//! Text collaborator backed by Gemini structured output.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use studio_core::concept::Draft;
use studio_core::error::{Result, StudioError};
use studio_core::generation::{ConceptRequest, ConceptResponse, TextGenerator};

use crate::gemini_client::{Content, GeminiClient, GenerateContentRequest, Part};
use crate::prompt;

/// Generates drafts with a Gemini text model.
#[derive(Clone)]
pub struct GeminiTextGenerator {
    client: GeminiClient,
    model: String,
}

impl GeminiTextGenerator {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Builds the request body: images first, then the prompt text.
    pub fn build_request(request: &ConceptRequest) -> Result<GenerateContentRequest> {
        let mut parts = Vec::new();
        if let Some(reference) = &request.reference_image {
            parts.push(Part::from_data_url(reference)?);
        }
        for photo in &request.product_photos {
            parts.push(Part::from_data_url(&photo.url)?);
        }
        parts.push(Part::Text {
            text: prompt::concept_prompt(request)?,
        });

        Ok(GenerateContentRequest {
            contents: vec![Content::user(parts)],
            system_instruction: Some(Content::system(prompt::system_instruction(request)?)),
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "drafts": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "label": { "type": "STRING" },
                                    "copy": { "type": "STRING" },
                                    "visualSuggestion": { "type": "STRING" },
                                    "commentScript": { "type": "STRING" }
                                },
                                "required": ["label", "copy", "visualSuggestion", "commentScript"]
                            }
                        }
                    },
                    "required": ["drafts"]
                }
            })),
        })
    }
}

#[derive(Deserialize)]
struct WireConcept {
    #[serde(default)]
    drafts: Vec<WireDraft>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDraft {
    #[serde(default)]
    label: String,
    copy: String,
    #[serde(default)]
    visual_suggestion: String,
    #[serde(default)]
    comment_script: String,
}

impl From<WireDraft> for Draft {
    fn from(wire: WireDraft) -> Self {
        Draft {
            label: wire.label,
            copy_text: wire.copy,
            visual_prompt: wire.visual_suggestion,
            interaction_script: wire.comment_script,
        }
    }
}

/// Parses the model's JSON text into drafts.
pub fn parse_concept(text: &str) -> Result<ConceptResponse> {
    let wire: WireConcept = serde_json::from_str(text.trim()).map_err(|e| {
        StudioError::generation_failed(format!("Malformed concept response: {e}"))
    })?;
    let response = ConceptResponse {
        drafts: wire.drafts.into_iter().map(Draft::from).collect(),
    };
    // Reject empty or copy-less output here so callers never see it.
    let drafts = response.into_drafts()?;
    Ok(ConceptResponse { drafts })
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate_concept(&self, request: &ConceptRequest) -> Result<ConceptResponse> {
        let body = Self::build_request(request)?;
        let text = self.client.generate_content(&self.model, &body).await?.text()?;
        let response = parse_concept(&text)?;
        tracing::info!(model = %self.model, drafts = response.drafts.len(), "Concept generated");
        Ok(response)
    }
}
