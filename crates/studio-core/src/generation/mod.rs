//! Contracts with the generative text and image services.

mod generator;
mod request;

pub use generator::{ImageGenerator, TextGenerator};
pub use request::{ConceptRequest, ConceptResponse, GeneratedImage, ImageRequest};
