//! Studio configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capacities of the persisted collections.
///
/// The defaults are also the ceilings: a file may lower a capacity, never
/// raise it (see [`CapacitySettings::clamped`]).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CapacitySettings {
    pub library: usize,
    pub selling_points: usize,
    pub product_photos: usize,
    pub style_references: usize,
}

impl Default for CapacitySettings {
    fn default() -> Self {
        Self {
            library: 30,
            selling_points: 50,
            product_photos: 12,
            style_references: 8,
        }
    }
}

impl CapacitySettings {
    /// Each capacity limited to its ceiling.
    pub fn clamped(&self) -> Self {
        let max = Self::default();
        let clamped = Self {
            library: self.library.min(max.library),
            selling_points: self.selling_points.min(max.selling_points),
            product_photos: self.product_photos.min(max.product_photos),
            style_references: self.style_references.min(max.style_references),
        };
        if clamped != *self {
            tracing::warn!(?self, "Configured capacities above the limits, clamped");
        }
        clamped
    }
}

/// Timing of the loading overlay shown while a collaborator call is outstanding.
///
/// All values are milliseconds in the file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoadingSettings {
    /// Minimum time the loading state stays visible for a text generation
    pub concept_min_wait_ms: u64,
    /// Minimum time the loading state stays visible for an image generation
    pub image_min_wait_ms: u64,
    /// Expected duration of a text generation, drives the progress bar
    pub concept_estimate_ms: u64,
    /// Expected duration of an image generation
    pub image_estimate_ms: u64,
    /// Period of the progress percentage ticker
    pub progress_tick_ms: u64,
    /// Period of the status message rotation
    pub message_rotate_ms: u64,
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            concept_min_wait_ms: 3_000,
            image_min_wait_ms: 4_000,
            concept_estimate_ms: 12_000,
            image_estimate_ms: 20_000,
            progress_tick_ms: 200,
            message_rotate_ms: 2_500,
        }
    }
}

impl LoadingSettings {
    pub fn concept_min_wait(&self) -> Duration {
        Duration::from_millis(self.concept_min_wait_ms)
    }

    pub fn image_min_wait(&self) -> Duration {
        Duration::from_millis(self.image_min_wait_ms)
    }

    pub fn concept_estimate(&self) -> Duration {
        Duration::from_millis(self.concept_estimate_ms)
    }

    pub fn image_estimate(&self) -> Duration {
        Duration::from_millis(self.image_estimate_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms.max(1))
    }

    pub fn message_rotate(&self) -> Duration {
        Duration::from_millis(self.message_rotate_ms.max(1))
    }
}

/// Gemini API settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key; the `GEMINI_API_KEY` environment variable takes precedence
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub high_quality_image_model: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            text_model: "gemini-3-flash-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            high_quality_image_model: "gemini-3-pro-image-preview".to_string(),
        }
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StudioConfig {
    pub capacity: CapacitySettings,
    pub loading: LoadingSettings,
    pub gemini: GeminiSettings,
    /// Byte quota applied to the local store, `None` for unlimited
    pub storage_quota_bytes: Option<usize>,
}
