//! Generation results: drafts, the active concept and the finalized output.

use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;
use crate::collection::{LibraryOrigin, MediaRef, NewLibraryItem};
use crate::persona::Persona;

/// One labeled copy variant returned by the text collaborator. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub label: String,
    pub copy_text: String,
    /// Suggested visual, used as the default image prompt
    pub visual_prompt: String,
    /// Script for the first comment under the post
    pub interaction_script: String,
}

/// The result of the latest text generation, plus the inputs that produced it.
///
/// There is at most one concept at a time; a new generation replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub drafts: Vec<Draft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_category: Option<ContentCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    #[serde(default)]
    pub selected_products: Vec<MediaRef>,
    #[serde(default)]
    pub style_references: Vec<MediaRef>,
}

impl Concept {
    pub fn from_drafts(drafts: Vec<Draft>) -> Self {
        Self {
            drafts,
            reference_image: None,
            selected_category: None,
            persona: None,
            selected_products: Vec::new(),
            style_references: Vec::new(),
        }
    }
}

/// The finalized output of one workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResult {
    pub copy_text: String,
    /// `None` when the image step was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub interaction_script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ContentCategory>,
}

impl FinalResult {
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// The library entry recorded when the user keeps this result.
    pub fn to_library_item(&self) -> NewLibraryItem {
        NewLibraryItem {
            origin: LibraryOrigin::Generated,
            copy_text: self.copy_text.clone(),
            image_url: self.image_url.clone(),
            interaction_script: Some(self.interaction_script.clone())
                .filter(|s| !s.trim().is_empty()),
            category_label: self.category.map(|c| c.label().to_string()),
        }
    }
}
