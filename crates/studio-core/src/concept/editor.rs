//! Review-step state: which draft is being edited and the pending image settings.

use super::model::{Concept, Draft, FinalResult};
use super::settings::{AspectRatio, ImageResolution, ImageSettings, QualityTier};
use crate::error::{Result, StudioError};
use crate::generation::{GeneratedImage, ImageRequest};

/// Holds the active concept and the user's edits of the selected draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptEditor {
    concept: Concept,
    selected_index: usize,
    edited_copy: String,
    edited_prompt: String,
    reference_image: Option<String>,
    settings: ImageSettings,
}

impl ConceptEditor {
    /// Starts editing `concept` with its first draft selected.
    pub fn new(concept: Concept) -> Result<Self> {
        let first = concept
            .drafts
            .first()
            .ok_or_else(|| StudioError::generation_failed("Concept has no drafts"))?;
        let edited_copy = first.copy_text.clone();
        let edited_prompt = first.visual_prompt.clone();
        let reference_image = concept.reference_image.clone();

        Ok(Self {
            concept,
            selected_index: 0,
            edited_copy,
            edited_prompt,
            reference_image,
            settings: ImageSettings::default(),
        })
    }

    pub fn concept(&self) -> &Concept {
        &self.concept
    }

    pub fn drafts(&self) -> &[Draft] {
        &self.concept.drafts
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_draft(&self) -> &Draft {
        &self.concept.drafts[self.selected_index]
    }

    /// Switches to draft `index`, discarding edits made to the previous one.
    pub fn select_draft(&mut self, index: usize) -> Result<()> {
        let draft = self.concept.drafts.get(index).ok_or_else(|| {
            StudioError::validation(format!(
                "Draft index {} out of range ({} drafts)",
                index,
                self.concept.drafts.len()
            ))
        })?;
        self.edited_copy = draft.copy_text.clone();
        self.edited_prompt = draft.visual_prompt.clone();
        self.selected_index = index;
        Ok(())
    }

    pub fn edited_copy(&self) -> &str {
        &self.edited_copy
    }

    pub fn set_edited_copy(&mut self, copy: impl Into<String>) {
        self.edited_copy = copy.into();
    }

    pub fn edited_prompt(&self) -> &str {
        &self.edited_prompt
    }

    pub fn set_edited_prompt(&mut self, prompt: impl Into<String>) {
        self.edited_prompt = prompt.into();
    }

    pub fn reference_image(&self) -> Option<&str> {
        self.reference_image.as_deref()
    }

    /// Replaces (or clears) the reference image for the visual.
    pub fn set_reference_image(&mut self, image: Option<String>) {
        self.reference_image = image;
    }

    pub fn settings(&self) -> ImageSettings {
        self.settings
    }

    pub fn set_quality_tier(&mut self, tier: QualityTier) {
        self.settings.quality_tier = tier;
    }

    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.settings.aspect_ratio = ratio;
    }

    pub fn set_image_resolution(&mut self, resolution: ImageResolution) {
        self.settings.image_resolution = resolution;
    }

    /// Packages the edited draft, the reference media captured with the
    /// concept and the current settings into an image request.
    pub fn build_image_request(&self) -> Result<ImageRequest> {
        if self.edited_prompt.trim().is_empty() {
            return Err(StudioError::validation("Visual prompt is required"));
        }
        Ok(ImageRequest {
            prompt: self.edited_prompt.clone(),
            copy_text: self.edited_copy.clone(),
            reference_image: self.reference_image.clone(),
            style_reference: self
                .concept
                .style_references
                .first()
                .map(|s| s.url.clone()),
            product_images: self
                .concept
                .selected_products
                .iter()
                .map(|p| p.url.clone())
                .collect(),
            quality_tier: self.settings.quality_tier,
            aspect_ratio: self.settings.aspect_ratio,
            image_resolution: self.settings.image_resolution,
        })
    }

    /// Final result without a visual.
    pub fn finalize_text_only(&self) -> FinalResult {
        self.finalize(None)
    }

    /// Final result carrying the generated image.
    pub fn finalize_with_image(&self, image: &GeneratedImage) -> FinalResult {
        self.finalize(Some(image.data_url()))
    }

    fn finalize(&self, image_url: Option<String>) -> FinalResult {
        FinalResult {
            copy_text: self.edited_copy.clone(),
            image_url,
            interaction_script: self.selected_draft().interaction_script.clone(),
            category: self.concept.selected_category,
        }
    }
}
