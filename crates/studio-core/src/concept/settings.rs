//! Image generation settings chosen on the review screen.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which image model tier to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QualityTier {
    /// Fast model
    #[default]
    Standard,
    /// Slower model that honours an explicit resolution
    High,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    #[default]
    #[serde(rename = "3:4")]
    #[strum(serialize = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Story,
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Widescreen,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum ImageResolution {
    #[default]
    #[serde(rename = "1K")]
    #[strum(serialize = "1K")]
    OneK,
    #[serde(rename = "2K")]
    #[strum(serialize = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    #[strum(serialize = "4K")]
    FourK,
}

/// Tier, ratio and resolution together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    pub quality_tier: QualityTier,
    pub aspect_ratio: AspectRatio,
    pub image_resolution: ImageResolution,
}

impl ImageSettings {
    /// The resolution to request; only the high tier accepts one.
    pub fn requested_resolution(&self) -> Option<ImageResolution> {
        (self.quality_tier == QualityTier::High).then_some(self.image_resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults() {
        let settings = ImageSettings::default();
        assert_eq!(settings.aspect_ratio.to_string(), "3:4");
        assert_eq!(settings.image_resolution.to_string(), "1K");
        assert_eq!(settings.requested_resolution(), None);
    }

    #[test]
    fn test_resolution_only_for_high_tier() {
        let settings = ImageSettings {
            quality_tier: QualityTier::High,
            image_resolution: ImageResolution::FourK,
            ..Default::default()
        };
        assert_eq!(settings.requested_resolution(), Some(ImageResolution::FourK));
    }

    #[test]
    fn test_ratio_wire_form() {
        assert_eq!(AspectRatio::from_str("16:9").unwrap(), AspectRatio::Widescreen);
        assert_eq!(
            serde_json::to_string(&AspectRatio::Story).unwrap(),
            "\"9:16\""
        );
    }
}
