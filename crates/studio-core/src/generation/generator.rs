//! Generative collaborator traits.
//!
//! Implementations live in `studio-interaction`; tests use in-memory fakes.

use async_trait::async_trait;

use super::request::{ConceptRequest, ConceptResponse, GeneratedImage, ImageRequest};
use crate::error::Result;

/// Produces labeled copy drafts from a scenario.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates drafts for `request`.
    ///
    /// Transport errors and unusable output are both `GenerationFailed`.
    async fn generate_concept(&self, request: &ConceptRequest) -> Result<ConceptResponse>;
}

/// Produces one image from a prompt and optional reference images.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage>;
}
