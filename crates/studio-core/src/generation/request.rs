//! Collaborator request and response payloads.

use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;
use crate::collection::{LibraryItem, MediaRef, SellingPoint};
use crate::concept::{AspectRatio, Draft, ImageResolution, ImageSettings, QualityTier};
use crate::error::{Result, StudioError};
use crate::persona::Persona;

/// Input of a text generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRequest {
    pub scenario_text: String,
    pub category: ContentCategory,
    pub persona: Persona,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<String>,
    /// Library items chosen as context
    #[serde(default)]
    pub context_items: Vec<LibraryItem>,
    #[serde(default)]
    pub selling_points: Vec<SellingPoint>,
    #[serde(default)]
    pub product_photos: Vec<MediaRef>,
}

impl ConceptRequest {
    pub fn validate(&self) -> Result<()> {
        if self.scenario_text.trim().is_empty() {
            return Err(StudioError::validation("Scenario description is required"));
        }
        Ok(())
    }
}

/// Output of a text generation, as parsed from the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptResponse {
    pub drafts: Vec<Draft>,
}

impl ConceptResponse {
    /// The drafts, or `GenerationFailed` if the response is unusable.
    pub fn into_drafts(self) -> Result<Vec<Draft>> {
        if self.drafts.is_empty() {
            return Err(StudioError::generation_failed("No drafts returned"));
        }
        if let Some(index) = self
            .drafts
            .iter()
            .position(|d| d.copy_text.trim().is_empty())
        {
            return Err(StudioError::generation_failed(format!(
                "Draft {} has no copy",
                index + 1
            )));
        }
        Ok(self.drafts)
    }
}

/// Input of an image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub prompt: String,
    pub copy_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_reference: Option<String>,
    #[serde(default)]
    pub product_images: Vec<String>,
    pub quality_tier: QualityTier,
    pub aspect_ratio: AspectRatio,
    pub image_resolution: ImageResolution,
}

impl ImageRequest {
    pub fn settings(&self) -> ImageSettings {
        ImageSettings {
            quality_tier: self.quality_tier,
            aspect_ratio: self.aspect_ratio,
            image_resolution: self.image_resolution,
        }
    }
}

/// Image returned by the image collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

impl GeneratedImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}
