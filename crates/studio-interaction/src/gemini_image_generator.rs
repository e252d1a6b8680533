//! Image collaborator backed by the Gemini image models.

use async_trait::async_trait;
use serde_json::json;
use studio_core::concept::QualityTier;
use studio_core::error::Result;
use studio_core::generation::{GeneratedImage, ImageGenerator, ImageRequest};

use crate::gemini_client::{Content, GeminiClient, GenerateContentRequest, Part};
use crate::prompt;

/// Generates visuals, choosing the model by quality tier.
#[derive(Clone)]
pub struct GeminiImageGenerator {
    client: GeminiClient,
    standard_model: String,
    high_quality_model: String,
}

impl GeminiImageGenerator {
    pub fn new(
        client: GeminiClient,
        standard_model: impl Into<String>,
        high_quality_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            standard_model: standard_model.into(),
            high_quality_model: high_quality_model.into(),
        }
    }

    pub fn model_for(&self, tier: QualityTier) -> &str {
        match tier {
            QualityTier::Standard => &self.standard_model,
            QualityTier::High => &self.high_quality_model,
        }
    }

    /// Style reference, product images and reference image as inline data,
    /// then the wrapped prompt.
    pub fn build_request(request: &ImageRequest) -> Result<GenerateContentRequest> {
        let mut parts = Vec::new();
        if let Some(style) = &request.style_reference {
            parts.push(Part::from_data_url(style)?);
        }
        for product in &request.product_images {
            parts.push(Part::from_data_url(product)?);
        }
        if let Some(reference) = &request.reference_image {
            parts.push(Part::from_data_url(reference)?);
        }
        parts.push(Part::Text {
            text: prompt::image_prompt(&request.prompt)?,
        });

        let mut image_config = json!({ "aspectRatio": request.aspect_ratio.to_string() });
        if let Some(resolution) = request.settings().requested_resolution() {
            image_config["imageSize"] = json!(resolution.to_string());
        }

        Ok(GenerateContentRequest {
            contents: vec![Content::user(parts)],
            system_instruction: None,
            generation_config: Some(json!({ "imageConfig": image_config })),
        })
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        let model = self.model_for(request.quality_tier);
        let body = Self::build_request(request)?;
        let data = self.client.generate_content(model, &body).await?.inline_data()?;
        tracing::info!(model, mime = %data.mime_type, "Image generated");
        Ok(GeneratedImage {
            mime_type: data.mime_type,
            data: data.data,
        })
    }
}
