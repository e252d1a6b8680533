//! Gemini-backed implementations of the generative collaborators.

pub mod gemini_client;
pub mod gemini_image_generator;
pub mod gemini_text_generator;
pub mod prompt;

pub use gemini_client::GeminiClient;
pub use gemini_image_generator::GeminiImageGenerator;
pub use gemini_text_generator::GeminiTextGenerator;
